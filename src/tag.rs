//! Tag capability contract.
//!
//! Every tag, built-in or user-supplied, is a [`TagDefinition`]: a name, a
//! [`TagRender`] implementation producing the opening and closing HTML, and
//! a handful of flags controlling how its content is treated.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;

/// Renders the HTML around a tag's content.
///
/// Both methods receive the raw parameter string (see [`param_value`]) and
/// the already processed content, even when the tag hides its content.
///
/// # Example
/// ```
/// use ferrobb::TagRender;
///
/// struct Kbd;
///
/// impl TagRender for Kbd {
///     fn render_open(&self, _params: &str, _content: &str) -> String {
///         "<kbd>".to_owned()
///     }
///
///     fn render_close(&self, _params: &str, _content: &str) -> String {
///         "</kbd>".to_owned()
///     }
/// }
/// ```
pub trait TagRender: Send + Sync {
    /// HTML emitted before the content.
    fn render_open(&self, params: &str, content: &str) -> String;

    /// HTML emitted after the content.
    fn render_close(&self, params: &str, content: &str) -> String;
}

/// Tag that wraps its content in fixed HTML.
#[derive(Debug, Clone)]
pub struct Wrap {
    open: Cow<'static, str>,
    close: Cow<'static, str>,
}

impl Wrap {
    /// Create a wrapper from static strings.
    pub const fn new(open: &'static str, close: &'static str) -> Self {
        Self {
            open: Cow::Borrowed(open),
            close: Cow::Borrowed(close),
        }
    }

    /// Create a wrapper from owned strings.
    pub fn owned(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: Cow::Owned(open.into()),
            close: Cow::Owned(close.into()),
        }
    }
}

impl TagRender for Wrap {
    fn render_open(&self, _params: &str, _content: &str) -> String {
        self.open.to_string()
    }

    fn render_close(&self, _params: &str, _content: &str) -> String {
        self.close.to_string()
    }
}

/// Tag rendered by a pair of closures.
pub struct FnTag<O, C> {
    open: O,
    close: C,
}

impl<O, C> FnTag<O, C>
where
    O: Fn(&str, &str) -> String + Send + Sync,
    C: Fn(&str, &str) -> String + Send + Sync,
{
    /// Create a tag from open/close closures.
    pub fn new(open: O, close: C) -> Self {
        Self { open, close }
    }
}

impl<O, C> TagRender for FnTag<O, C>
where
    O: Fn(&str, &str) -> String + Send + Sync,
    C: Fn(&str, &str) -> String + Send + Sync,
{
    fn render_open(&self, params: &str, content: &str) -> String {
        (self.open)(params, content)
    }

    fn render_close(&self, params: &str, content: &str) -> String {
        (self.close)(params, content)
    }
}

/// Value part of a raw parameter string.
///
/// Parameters are handed to renderers verbatim, including the delimiter
/// that separated them from the tag name: `[color=red]` yields `"=red"`,
/// `[quote author]` yields `" author"`.
///
/// ```
/// assert_eq!(ferrobb::tag::param_value("=red"), "red");
/// assert_eq!(ferrobb::tag::param_value(""), "");
/// ```
#[inline]
pub fn param_value(params: &str) -> &str {
    params.get(1..).unwrap_or("")
}

/// A registered tag.
#[derive(Clone)]
pub struct TagDefinition {
    name: String,
    renderer: Arc<dyn TagRender>,
    display_content: bool,
    no_parse: bool,
    restrict_children_to: Vec<String>,
    restrict_parents_to: Vec<String>,
    valid_children: FxHashSet<String>,
    valid_parents: FxHashSet<String>,
}

impl TagDefinition {
    /// Create a definition with default flags.
    ///
    /// The name is stored lowercased.
    pub fn new(name: impl AsRef<str>, renderer: impl TagRender + 'static) -> Self {
        Self::from_arc(name, Arc::new(renderer))
    }

    /// Create a definition sharing an existing renderer.
    pub fn from_arc(name: impl AsRef<str>, renderer: Arc<dyn TagRender>) -> Self {
        Self {
            name: name.as_ref().to_ascii_lowercase(),
            renderer,
            display_content: true,
            no_parse: false,
            restrict_children_to: Vec::new(),
            restrict_parents_to: Vec::new(),
            valid_children: FxHashSet::default(),
            valid_parents: FxHashSet::default(),
        }
    }

    /// Create a definition wrapping its content in fixed HTML.
    pub fn wrap(name: impl AsRef<str>, open: &'static str, close: &'static str) -> Self {
        Self::new(name, Wrap::new(open, close))
    }

    /// Create a definition from a pair of closures.
    pub fn from_fns<O, C>(name: impl AsRef<str>, open: O, close: C) -> Self
    where
        O: Fn(&str, &str) -> String + Send + Sync + 'static,
        C: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        Self::new(name, FnTag::new(open, close))
    }

    /// Whether processed content is written between open and close.
    #[must_use]
    pub fn with_display_content(mut self, display: bool) -> Self {
        self.display_content = display;
        self
    }

    /// Whether the content is kept literal instead of being parsed.
    #[must_use]
    pub fn with_no_parse(mut self, no_parse: bool) -> Self {
        self.no_parse = no_parse;
        self
    }

    /// Only allow these tags as direct children.
    #[must_use]
    pub fn restrict_children_to<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.restrict_children_to = lowercase_all(names);
        self.rebuild_lookups();
        self
    }

    /// Only allow these tags as direct parents.
    #[must_use]
    pub fn restrict_parents_to<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.restrict_parents_to = lowercase_all(names);
        self.rebuild_lookups();
        self
    }

    /// Canonical (lowercase) name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn display_content(&self) -> bool {
        self.display_content
    }

    #[inline]
    pub fn is_no_parse(&self) -> bool {
        self.no_parse
    }

    /// Allowed children, empty when unrestricted.
    #[inline]
    pub fn restricted_children(&self) -> &[String] {
        &self.restrict_children_to
    }

    /// Allowed parents, empty when unrestricted.
    #[inline]
    pub fn restricted_parents(&self) -> &[String] {
        &self.restrict_parents_to
    }

    /// Check whether `child` may appear directly inside this tag.
    #[inline]
    pub fn allows_child(&self, child: &str) -> bool {
        self.restrict_children_to.is_empty() || self.valid_children.contains(child)
    }

    /// Check whether this tag may appear directly inside `parent`.
    #[inline]
    pub fn allows_parent(&self, parent: &str) -> bool {
        self.restrict_parents_to.is_empty() || self.valid_parents.contains(parent)
    }

    #[inline]
    pub fn render_open(&self, params: &str, content: &str) -> String {
        self.renderer.render_open(params, content)
    }

    #[inline]
    pub fn render_close(&self, params: &str, content: &str) -> String {
        self.renderer.render_close(params, content)
    }

    pub(crate) fn rebuild_lookups(&mut self) {
        self.valid_children = self.restrict_children_to.iter().cloned().collect();
        self.valid_parents = self.restrict_parents_to.iter().cloned().collect();
    }
}

impl fmt::Debug for TagDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagDefinition")
            .field("name", &self.name)
            .field("display_content", &self.display_content)
            .field("no_parse", &self.no_parse)
            .field("restrict_children_to", &self.restrict_children_to)
            .field("restrict_parents_to", &self.restrict_parents_to)
            .finish_non_exhaustive()
    }
}

fn lowercase_all<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().to_ascii_lowercase())
        .collect()
}

//! ferrobb: Extendible BBCode to HTML converter
//!
//! Converts bracket-delimited tag markup (`[b]bold[/b]`, `[list][*]item[/list]`)
//! into HTML, checks parent/child restrictions between nested tags and never
//! lets raw HTML from the input through.
//!
//! # Design Principles
//! - Escape first: angle brackets become entities before markers are read
//! - Single forward passes with an explicit tag stack, no rewrite loops
//! - Malformed input is never fatal: problems become [`Diagnostic`]s
//! - Tags are data: every tag, built-in or custom, goes through [`TagRender`]
//!
//! # Pipeline
//! 1. [`escape::escape_angle_brackets`]
//! 2. [`lexer::tokenize`]: markers of honored tags, no-parse content cut out
//! 3. [`star::expand_stars`]: synthetic closes for `[*]` list items
//! 4. [`tree::build`]: occurrence tree with nesting depths
//! 5. [`validate::validate`]: parent/child diagnostics
//! 6. [`render::Renderer`]: post-order HTML rendering
//!
//! Output shaping ([`Options`]) is applied to the rendered HTML last.

use std::sync::LazyLock;

pub mod builtin;
pub mod error;
pub mod escape;
pub mod lexer;
pub mod limits;
pub mod range;
pub mod registry;
pub mod render;
pub mod star;
pub mod tag;
pub mod tree;
pub mod validate;

// Re-export primary types
pub use error::{Diagnostic, RegistryError};
pub use lexer::TagFilter;
pub use range::Range;
pub use registry::TagRegistry;
pub use render::HtmlWriter;
pub use tag::{FnTag, TagDefinition, TagRender, Wrap};

/// Per-call conversion options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Options {
    /// Only these tags are honored. Empty admits every registered tag.
    pub tag_whitelist: Vec<String>,
    /// These tags are never honored.
    pub tag_blacklist: Vec<String>,
    /// Wrap the output in a `white-space:pre-wrap` container.
    pub add_in_line_breaks: bool,
    /// Keep stray brackets as `&#91;` / `&#93;` instead of restoring them.
    pub escape_html: bool,
    /// Drop unmatched markers and leftover `[...]` runs from the output.
    pub remove_misaligned_tags: bool,
}

impl Options {
    fn filter(&self) -> TagFilter {
        TagFilter::new(&self.tag_whitelist, &self.tag_blacklist)
    }
}

/// Outcome of one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProcessResult {
    /// Rendered HTML, best effort even when `error` is set.
    pub html: String,
    /// Whether any diagnostic was produced.
    pub error: bool,
    /// Diagnostics in discovery order; `None` when `error` is false.
    pub diagnostics: Option<Vec<Diagnostic>>,
}

impl ProcessResult {
    fn new(html: String, diagnostics: Vec<Diagnostic>) -> Self {
        let error = !diagnostics.is_empty();
        Self {
            html,
            error,
            diagnostics: error.then_some(diagnostics),
        }
    }

    /// Diagnostics as a slice, empty when there are none.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.as_deref().unwrap_or_default()
    }
}

const LINE_BREAK_OPEN: &str = "<div style=\"white-space:pre-wrap;\" class=\"xbbcode\">";
const LINE_BREAK_CLOSE: &str = "</div>";

/// A tag registry plus the conversion pipeline over it.
///
/// # Example
/// ```
/// use ferrobb::{Converter, Options, TagDefinition};
///
/// let mut converter = Converter::new();
/// converter
///     .extend([TagDefinition::wrap("spoiler", "<details>", "</details>")])
///     .unwrap();
///
/// let result = converter.process("[spoiler]hidden[/spoiler]", &Options::default());
/// assert_eq!(result.html, "<details>hidden</details>");
/// assert!(!result.error);
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    registry: TagRegistry,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    /// Create a converter with the built-in tags.
    pub fn new() -> Self {
        Self::with_registry(TagRegistry::with_builtins())
    }

    /// Create a converter that knows no tags.
    pub fn empty() -> Self {
        Self::with_registry(TagRegistry::new())
    }

    pub fn with_registry(registry: TagRegistry) -> Self {
        Self { registry }
    }

    /// Add or override tags.
    ///
    /// On error no tag is added.
    pub fn extend<I>(&mut self, defs: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = TagDefinition>,
    {
        self.registry.extend(defs)
    }

    /// Read-only view of the registered tags.
    pub fn tags(&self) -> &TagRegistry {
        &self.registry
    }

    /// Convert markup to HTML.
    pub fn process(&self, text: &str, options: &Options) -> ProcessResult {
        let escaped = escape::escape_angle_brackets(text);
        let tokens = lexer::tokenize(&escaped, &self.registry, &options.filter());
        let tokens = star::expand_stars(tokens, &self.registry);
        let nodes = tree::build(tokens);

        let mut diagnostics = Vec::new();
        validate::validate(&nodes, &self.registry, &mut diagnostics);

        let misaligned_markers = tree::has_literals(&nodes);
        let mut html = render::Renderer::new(&escaped, &self.registry)
            .drop_literals(options.remove_misaligned_tags)
            .render(&nodes);

        if misaligned_markers || escape::contains_brackets(&html) {
            diagnostics.push(Diagnostic::Misaligned);
            if options.remove_misaligned_tags {
                // Brackets emitted by tag renderers themselves.
                html = escape::strip_bracket_runs(&html).into_owned();
            }
        }
        if options.add_in_line_breaks {
            html = format!("{LINE_BREAK_OPEN}{html}{LINE_BREAK_CLOSE}");
        }
        if !options.escape_html {
            html = escape::restore_brackets(&html).into_owned();
        }

        if !diagnostics.is_empty() {
            log::debug!("conversion produced {} diagnostic(s)", diagnostics.len());
        }
        ProcessResult::new(html, diagnostics)
    }

    /// Convert markup with default options, returning only the HTML.
    pub fn to_html(&self, text: &str) -> String {
        self.process(text, &Options::default()).html
    }
}

static DEFAULT_CONVERTER: LazyLock<Converter> = LazyLock::new(Converter::new);

/// Convert markup with the built-in tags.
///
/// # Example
/// ```
/// let result = ferrobb::process("[list][*]a[*]b[/list]", &ferrobb::Options::default());
/// assert_eq!(result.html, "<ul><li>a</li><li>b</li></ul>");
/// ```
pub fn process(text: &str, options: &Options) -> ProcessResult {
    DEFAULT_CONVERTER.process(text, options)
}

/// Convert markup with the built-in tags and default options.
///
/// This is the primary API for simple use cases.
///
/// # Example
/// ```
/// let html = ferrobb::to_html("[b]Hello[/b] world");
/// assert_eq!(html, "<span class=\"xbbcode-b\">Hello</span> world");
/// ```
pub fn to_html(text: &str) -> String {
    DEFAULT_CONVERTER.to_html(text)
}

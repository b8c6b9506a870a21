//! HTML rendering of the occurrence tree.
//!
//! Rendering is post-order: an occurrence's content is rendered before the
//! tag's own open/close HTML is requested, so renderers always see the
//! final HTML of their content.

use crate::escape;
use crate::range::Range;
use crate::registry::TagRegistry;
use crate::tree::{Node, Occurrence};

/// HTML output writer with a pre-allocated, reusable buffer.
///
/// # Example
/// ```
/// use ferrobb::HtmlWriter;
///
/// let mut writer = HtmlWriter::with_capacity_for(16);
/// writer.write_str("<p>");
/// writer.write_escaped_text("a [b]");
/// writer.write_str("</p>");
///
/// assert_eq!(writer.into_string(), "<p>a &#91;b&#93;</p>");
/// ```
#[derive(Debug, Default)]
pub struct HtmlWriter {
    out: String,
}

impl HtmlWriter {
    /// Create a new writer with default capacity.
    #[inline]
    pub fn new() -> Self {
        Self {
            out: String::with_capacity(1024),
        }
    }

    /// Create with capacity based on expected input size.
    ///
    /// Rendered tags add markup around the content; reserve a quarter extra.
    #[inline]
    pub fn with_capacity_for(input_len: usize) -> Self {
        Self {
            out: String::with_capacity(input_len + input_len / 4),
        }
    }

    /// Write HTML without escaping.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    /// Write text, turning stray brackets into character references.
    #[inline]
    pub fn write_escaped_text(&mut self, text: &str) {
        escape::escape_brackets_into(&mut self.out, text);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Clear the buffer for reuse (keeps capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.out.clear();
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.out
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.out
    }
}

/// Renders occurrence trees built over one escaped source buffer.
pub struct Renderer<'a> {
    source: &'a str,
    registry: &'a TagRegistry,
    drop_literals: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(source: &'a str, registry: &'a TagRegistry) -> Self {
        Self {
            source,
            registry,
            drop_literals: false,
        }
    }

    /// Leave unmatched markers out of the output.
    #[must_use]
    pub fn drop_literals(mut self, drop: bool) -> Self {
        self.drop_literals = drop;
        self
    }

    /// Render a node list to HTML.
    pub fn render(&self, nodes: &[Node]) -> String {
        let mut writer = HtmlWriter::with_capacity_for(self.source.len());
        self.render_nodes(nodes, &mut writer);
        writer.into_string()
    }

    fn render_nodes(&self, nodes: &[Node], writer: &mut HtmlWriter) {
        for node in nodes {
            match node {
                Node::Text(range) => writer.write_escaped_text(self.slice(*range)),
                Node::Literal(_) if self.drop_literals => {}
                Node::Literal(range) => writer.write_str(self.slice(*range)),
                Node::Tag(occ) => self.render_occurrence(occ, writer),
            }
        }
    }

    fn render_occurrence(&self, occ: &Occurrence, writer: &mut HtmlWriter) {
        let Some(def) = self.registry.get(&occ.name) else {
            self.render_nodes(&occ.children, writer);
            return;
        };

        let mut content = HtmlWriter::with_capacity_for(occ.inner.len());
        if def.is_no_parse() {
            content.write_escaped_text(self.slice(occ.inner));
        } else {
            self.render_nodes(&occ.children, &mut content);
        }
        let content = content.into_string();
        let params = self.slice(occ.params);

        writer.write_str(&def.render_open(params, &content));
        if def.display_content() {
            writer.write_str(&content);
        }
        writer.write_str(&def.render_close(params, &content));
    }

    #[inline]
    fn slice(&self, range: Range) -> &'a str {
        range.slice(self.source)
    }
}

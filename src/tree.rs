//! Occurrence tree with nesting depths.
//!
//! Built in one pass over the token stream with an explicit stack of open
//! tags. A close marker only matches the tag on top of the stack; anything
//! else stays literal, as do openers that are never closed. Sibling
//! occurrences therefore never overlap, and each occurrence's depth is the
//! number of recognized ancestors enclosing it.

use crate::lexer::Token;
use crate::limits;
use crate::range::Range;

/// A node of the occurrence tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Plain text; stray brackets are escaped when written.
    Text(Range),
    /// An unmatched marker, written back verbatim.
    Literal(Range),
    /// A matched tag.
    Tag(Occurrence),
}

/// A matched tag instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// Canonical tag name.
    pub name: String,
    /// Raw parameters including the leading delimiter.
    pub params: Range,
    /// Text between the open and close markers.
    pub inner: Range,
    /// Number of recognized ancestor occurrences.
    pub depth: usize,
    pub children: Vec<Node>,
}

impl Occurrence {
    /// Direct child occurrences, in document order.
    pub fn tags(&self) -> impl Iterator<Item = &Occurrence> {
        tags(&self.children)
    }
}

/// Occurrences among `nodes`, in document order.
pub fn tags(nodes: &[Node]) -> impl Iterator<Item = &Occurrence> {
    nodes.iter().filter_map(|node| match node {
        Node::Tag(occ) => Some(occ),
        _ => None,
    })
}

/// Check for unmatched markers anywhere in the tree.
///
/// Synthetic markers have an empty range and do not count.
pub fn has_literals(nodes: &[Node]) -> bool {
    nodes.iter().any(|node| match node {
        Node::Literal(range) => !range.is_empty(),
        Node::Tag(occ) => has_literals(&occ.children),
        Node::Text(_) => false,
    })
}

struct Frame {
    name: String,
    params: Range,
    marker: Range,
    children: Vec<Node>,
}

/// Match open and close markers into a tree.
pub fn build(tokens: Vec<Token>) -> Vec<Node> {
    let mut root = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for token in tokens {
        match token {
            Token::Text(range) => current(&mut stack, &mut root).push(Node::Text(range)),
            Token::Open {
                name,
                params,
                marker,
            } => {
                if stack.len() >= limits::MAX_TAG_NESTING {
                    log::trace!("nesting limit reached, [{name}] kept literal");
                    current(&mut stack, &mut root).push(Node::Literal(marker));
                    continue;
                }
                stack.push(Frame {
                    name,
                    params,
                    marker,
                    children: Vec::new(),
                });
            }
            Token::Close { name, marker } => {
                let matches_top = stack.last().is_some_and(|frame| frame.name == name);
                let frame = if matches_top { stack.pop() } else { None };
                if let Some(frame) = frame {
                    let occ = Occurrence {
                        name: frame.name,
                        params: frame.params,
                        inner: frame.marker.between(marker),
                        depth: 0,
                        children: frame.children,
                    };
                    current(&mut stack, &mut root).push(Node::Tag(occ));
                } else {
                    current(&mut stack, &mut root).push(Node::Literal(marker));
                }
            }
        }
    }

    // Unclosed openers become literal; their content moves up a level.
    while let Some(frame) = stack.pop() {
        let parent = current(&mut stack, &mut root);
        parent.push(Node::Literal(frame.marker));
        parent.extend(frame.children);
    }

    assign_depths(&mut root, 0);
    root
}

#[inline]
fn current<'a>(stack: &'a mut [Frame], root: &'a mut Vec<Node>) -> &'a mut Vec<Node> {
    match stack.last_mut() {
        Some(frame) => &mut frame.children,
        None => root,
    }
}

fn assign_depths(nodes: &mut [Node], depth: usize) {
    for node in nodes {
        if let Node::Tag(occ) = node {
            occ.depth = depth;
            assign_depths(&mut occ.children, depth + 1);
        }
    }
}

//! `[*]` expansion.
//!
//! The list-item shorthand has no author-written close form. Inside a list
//! tag, each `[*]` is closed right before the next `[*]` of the same list or
//! before the list's own close marker, whichever comes first. A `[*]` outside
//! any list is left alone and ends up as literal text.

use rustc_hash::FxHashMap;

use crate::lexer::Token;
use crate::registry::{STAR_TAG, TagRegistry};

struct ListFrame {
    name: String,
    item_open: bool,
}

/// Insert synthetic `[/*]` closes into a token stream.
///
/// One pass over the tokens; nested lists get their own frame so their
/// items are closed before the enclosing list resumes. Frames are only
/// searched for names known to be open, and a search pops every frame it
/// walks past, so the pass stays linear.
pub fn expand_stars(tokens: Vec<Token>, registry: &TagRegistry) -> Vec<Token> {
    if registry.list_tags().is_empty() {
        return tokens;
    }

    let mut out = Vec::with_capacity(tokens.len() + tokens.len() / 4);
    let mut frames: Vec<ListFrame> = Vec::new();
    let mut open_counts: FxHashMap<String, usize> = FxHashMap::default();

    for token in tokens {
        match &token {
            Token::Open { name, marker, .. } if name == STAR_TAG => {
                if let Some(frame) = frames.last_mut() {
                    if frame.item_open {
                        out.push(Token::synthetic_close(STAR_TAG, marker.start));
                    }
                    frame.item_open = true;
                }
            }
            Token::Open { name, .. } if registry.is_list_tag(name) => {
                *open_counts.entry(name.clone()).or_default() += 1;
                frames.push(ListFrame {
                    name: name.clone(),
                    item_open: false,
                });
            }
            Token::Close { name, marker }
                if open_counts.get(name).is_some_and(|&count| count > 0) =>
            {
                if let Some(idx) = frames.iter().rposition(|f| f.name == *name) {
                    for frame in frames.drain(idx..).rev() {
                        if let Some(count) = open_counts.get_mut(&frame.name) {
                            *count -= 1;
                        }
                        if frame.item_open {
                            out.push(Token::synthetic_close(STAR_TAG, marker.start));
                        }
                    }
                }
            }
            _ => {}
        }
        out.push(token);
    }

    out
}

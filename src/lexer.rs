//! Marker recognition.
//!
//! Splits entity-escaped text into text runs and tag markers. Only bracket
//! runs naming an honored tag become markers; everything else stays text
//! and has its brackets escaped when written out.
//!
//! Content of no-parse tags is cut out here: the first matching close
//! marker ends it, and nothing between the two markers is recognized.

use memchr::{memchr, memmem};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::limits;
use crate::range::Range;
use crate::registry::{STAR_TAG, TagRegistry};
use crate::tag::TagDefinition;

/// A lexical unit of the escaped input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Plain text.
    Text(Range),
    /// `[name]`, `[name=params]` or `[name params]`.
    Open {
        /// Canonical tag name.
        name: String,
        /// Raw parameters including the leading delimiter.
        params: Range,
        /// The whole marker.
        marker: Range,
    },
    /// `[/name]`. Synthetic closes inserted for `[*]` have an empty marker.
    Close {
        /// Canonical tag name.
        name: String,
        /// The whole marker.
        marker: Range,
    },
}

impl Token {
    /// Synthetic close marker inserted at `pos`.
    pub(crate) fn synthetic_close(name: &str, pos: usize) -> Self {
        Token::Close {
            name: name.to_owned(),
            marker: Range::empty_at(pos),
        }
    }
}

/// Per-call restriction of which registered tags are honored.
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    whitelist: FxHashSet<String>,
    blacklist: FxHashSet<String>,
}

impl TagFilter {
    /// Build a filter; an empty whitelist admits every tag.
    pub fn new<S: AsRef<str>>(whitelist: &[S], blacklist: &[S]) -> Self {
        let lower = |names: &[S]| {
            names
                .iter()
                .map(|n| n.as_ref().to_ascii_lowercase())
                .collect::<FxHashSet<_>>()
        };
        Self {
            whitelist: lower(whitelist),
            blacklist: lower(blacklist),
        }
    }

    /// Check whether a canonical tag name is honored.
    #[inline]
    pub fn honors(&self, name: &str) -> bool {
        (self.whitelist.is_empty() || self.whitelist.contains(name))
            && !self.blacklist.contains(name)
    }
}

struct Marker<'r> {
    def: &'r TagDefinition,
    closing: bool,
    params: Range,
    range: Range,
}

/// Answers to forward searches, kept so that no region is scanned twice.
#[derive(Default)]
struct Lookahead {
    /// `(from, found)`: the first `]` at or after `from`.
    bracket: Option<(usize, Option<usize>)>,
    /// Offset from which no close marker of the named tag exists.
    missing_close: FxHashMap<String, usize>,
    /// Same byte offsets as the input; used for case-insensitive close search.
    lowered: Option<String>,
}

impl Lookahead {
    fn next_bracket(&mut self, bytes: &[u8], at: usize) -> Option<usize> {
        match self.bracket {
            Some((from, found)) if from <= at && found.is_none_or(|f| f >= at) => found,
            _ => {
                let found = memchr(b']', &bytes[at..]).map(|offset| at + offset);
                self.bracket = Some((at, found));
                found
            }
        }
    }

    fn find_close(&mut self, input: &str, name: &str, from: usize) -> Option<Range> {
        if self
            .missing_close
            .get(name)
            .is_some_and(|&failed_from| from >= failed_from)
        {
            return None;
        }
        let lowered = self
            .lowered
            .get_or_insert_with(|| input.to_ascii_lowercase());
        let needle = format!("[/{name}]");
        let found = memmem::find(&lowered.as_bytes()[from..], needle.as_bytes())
            .map(|offset| Range::new(from + offset, from + offset + needle.len()));
        if found.is_none() {
            self.missing_close.insert(name.to_owned(), from);
        }
        found
    }
}

/// Tokenize entity-escaped text.
///
/// Runs in time linear in the input: every failed search is remembered and
/// successful ones consume what they scanned.
pub fn tokenize(input: &str, registry: &TagRegistry, filter: &TagFilter) -> Vec<Token> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::with_capacity((input.len() / 16).max(4));
    let mut lookahead = Lookahead::default();
    let mut text_start = 0;
    let mut pos = 0;

    while let Some(offset) = memchr(b'[', &bytes[pos..]) {
        let start = pos + offset;
        let Some(marker) = scan_marker(input, start, registry, filter, &mut lookahead) else {
            pos = start + 1;
            continue;
        };

        if text_start < start {
            tokens.push(Token::Text(Range::new(text_start, start)));
        }
        let name = marker.def.name();
        pos = marker.range.end;

        if marker.closing {
            tokens.push(Token::Close {
                name: name.to_owned(),
                marker: marker.range,
            });
        } else {
            tokens.push(Token::Open {
                name: name.to_owned(),
                params: marker.params,
                marker: marker.range,
            });

            if marker.def.is_no_parse() {
                if let Some(close) = lookahead.find_close(input, name, pos) {
                    if pos < close.start {
                        tokens.push(Token::Text(Range::new(pos, close.start)));
                    }
                    tokens.push(Token::Close {
                        name: name.to_owned(),
                        marker: close,
                    });
                    pos = close.end;
                }
            }
        }
        text_start = pos;
    }

    if text_start < input.len() {
        tokens.push(Token::Text(Range::new(text_start, input.len())));
    }
    tokens
}

fn scan_marker<'r>(
    input: &str,
    start: usize,
    registry: &'r TagRegistry,
    filter: &TagFilter,
    lookahead: &mut Lookahead,
) -> Option<Marker<'r>> {
    let bytes = input.as_bytes();
    let mut name_start = start + 1;
    let closing = bytes.get(name_start) == Some(&b'/');
    if closing {
        name_start += 1;
    }

    let name_end = bytes[name_start..]
        .iter()
        .take(limits::MAX_TAG_NAME_LEN + 1)
        .position(|&b| matches!(b, b']' | b' ' | b'=' | b'['))
        .map(|len| name_start + len)?;
    if name_end == name_start || bytes[name_end] == b'[' {
        return None;
    }

    let mut lower: SmallVec<[u8; limits::TAG_NAME_INLINE]> =
        SmallVec::from_slice(&bytes[name_start..name_end]);
    lower.make_ascii_lowercase();
    let name = std::str::from_utf8(&lower).ok()?;
    if !filter.honors(name) {
        return None;
    }
    let def = registry.get(name)?;

    if closing {
        // `[*]` has no author-written close form.
        if bytes[name_end] != b']' || def.name() == STAR_TAG {
            return None;
        }
        return Some(Marker {
            def,
            closing,
            params: Range::empty_at(name_end),
            range: Range::new(start, name_end + 1),
        });
    }

    let params_end = if bytes[name_end] == b']' {
        name_end
    } else {
        lookahead.next_bracket(bytes, name_end)?
    };
    Some(Marker {
        def,
        closing,
        params: Range::new(name_end, params_end),
        range: Range::new(start, params_end + 1),
    })
}

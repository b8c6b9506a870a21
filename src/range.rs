//! Compact, `Copy` range into the escaped text buffer.
//!
//! Tokens and occurrences refer back into the buffer instead of owning
//! their text; slicing only ever happens at ASCII bracket boundaries, so
//! every range is a valid `str` boundary pair.

/// Byte range into an input buffer.
///
/// # Example
/// ```
/// use ferrobb::Range;
///
/// let input = "[b]Hello[/b]";
/// let range = Range::new(3, 8);
/// assert_eq!(range.slice(input), "Hello");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    /// Create a new range.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Create an empty range at a position.
    #[inline]
    pub const fn empty_at(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Get the text this range refers to.
    #[inline]
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start..self.end]
    }

    /// Length of the range in bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the range is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Range spanning from the start of `self` to the end of `other`.
    #[inline]
    pub const fn cover(&self, other: Range) -> Self {
        Self {
            start: self.start,
            end: other.end,
        }
    }

    /// Range strictly between `self` and `other`.
    #[inline]
    pub const fn between(&self, other: Range) -> Self {
        Self {
            start: self.end,
            end: other.start,
        }
    }
}

impl From<std::ops::Range<usize>> for Range {
    #[inline]
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

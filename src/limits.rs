//! DoS prevention constants.
//!
//! These limits keep pathological inputs (deeply nested tags, huge
//! tag names) from blowing up recursion depth or lookup cost.

/// Maximum number of simultaneously open tags.
///
/// Openers past this depth are kept as literal text, so the tree walkers
/// in `validate` and `render` never recurse deeper than this.
pub const MAX_TAG_NESTING: usize = 64;

/// Maximum length of a tag name inside a marker.
///
/// Longer bracket runs can never name a registered tag and are skipped
/// without a registry lookup.
pub const MAX_TAG_NAME_LEN: usize = 32;

/// Inline capacity for lowercased tag names before spilling to the heap.
pub const TAG_NAME_INLINE: usize = 16;

//! Escaping passes.
//!
//! The converter runs three order-sensitive passes:
//! 1. [`escape_angle_brackets`]: every `<` / `>` in the input becomes an
//!    entity before anything else looks at the text.
//! 2. Marker recognition (see `lexer`), which only ever sees entity-escaped
//!    text and therefore can never be fed raw HTML.
//! 3. [`escape_brackets_into`]: brackets left in plain text become numeric
//!    character references when the text is written out.
//!
//! Fast-path optimized: scans for the first escapable byte with memchr,
//! then bulk-copies the segments between escapes.

use std::borrow::Cow;

use memchr::{memchr, memchr2};

/// Numeric character reference for a stray `[`.
pub const OPEN_BRACKET_REF: &str = "&#91;";

/// Numeric character reference for a stray `]`.
pub const CLOSE_BRACKET_REF: &str = "&#93;";

/// Escape `<` and `>` into `out`.
///
/// `&` is left alone on purpose: authors may write entities themselves and
/// they are harmless once angle brackets cannot open elements.
///
/// # Example
/// ```
/// use ferrobb::escape::escape_angle_into;
///
/// let mut out = String::new();
/// escape_angle_into(&mut out, "<script>");
/// assert_eq!(out, "&lt;script&gt;");
/// ```
#[inline]
pub fn escape_angle_into(out: &mut String, input: &str) {
    escape_pair_into(out, input, (b'<', "&lt;"), (b'>', "&gt;"));
}

/// Escape `<` and `>`, returning a new `String`.
pub fn escape_angle_brackets(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    escape_angle_into(&mut out, input);
    out
}

/// Escape `[` and `]` into their numeric character references.
///
/// # Example
/// ```
/// use ferrobb::escape::escape_brackets_into;
///
/// let mut out = String::new();
/// escape_brackets_into(&mut out, "[x]");
/// assert_eq!(out, "&#91;x&#93;");
/// ```
#[inline]
pub fn escape_brackets_into(out: &mut String, input: &str) {
    escape_pair_into(
        out,
        input,
        (b'[', OPEN_BRACKET_REF),
        (b']', CLOSE_BRACKET_REF),
    );
}

#[inline]
fn escape_pair_into(out: &mut String, input: &str, a: (u8, &str), b: (u8, &str)) {
    let bytes = input.as_bytes();
    let mut copied = 0;

    while let Some(offset) = memchr2(a.0, b.0, &bytes[copied..]) {
        let pos = copied + offset;
        out.push_str(&input[copied..pos]);
        out.push_str(if bytes[pos] == a.0 { a.1 } else { b.1 });
        copied = pos + 1;
    }

    out.push_str(&input[copied..]);
}

/// Check if any raw bracket survived into the text.
#[inline]
pub fn contains_brackets(input: &str) -> bool {
    memchr2(b'[', b']', input.as_bytes()).is_some()
}

/// Turn `&#91;` / `&#93;` back into literal brackets.
pub fn restore_brackets(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    let Some(first) = find_bracket_ref(bytes, 0) else {
        return Cow::Borrowed(input);
    };

    let mut out = String::with_capacity(input.len());
    let mut copied = 0;
    let mut next = Some(first);

    while let Some((pos, ch)) = next {
        out.push_str(&input[copied..pos]);
        out.push(ch);
        copied = pos + OPEN_BRACKET_REF.len();
        next = find_bracket_ref(bytes, copied);
    }

    out.push_str(&input[copied..]);
    Cow::Owned(out)
}

#[inline]
fn find_bracket_ref(bytes: &[u8], mut from: usize) -> Option<(usize, char)> {
    while let Some(offset) = memchr(b'&', &bytes[from..]) {
        let pos = from + offset;
        let tail = &bytes[pos..];
        if tail.starts_with(OPEN_BRACKET_REF.as_bytes()) {
            return Some((pos, '['));
        }
        if tail.starts_with(CLOSE_BRACKET_REF.as_bytes()) {
            return Some((pos, ']'));
        }
        from = pos + 1;
    }
    None
}

/// Remove every `[...]` run that does not span a line break.
///
/// Used to drop leftover unmatched markers from rendered output.
pub fn strip_bracket_runs(input: &str) -> Cow<'_, str> {
    strip_delimited(input, b'[', b']')
}

/// Remove every `<...>` run that does not span a line break.
///
/// Tags whose content doubles as an attribute value (`[url]`, `[email]`)
/// use this to drop markup produced by nested tags.
pub fn strip_html_tags(input: &str) -> Cow<'_, str> {
    strip_delimited(input, b'<', b'>')
}

fn strip_delimited(input: &str, open: u8, close: u8) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    if memchr(open, bytes).is_none() {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut copied = 0;
    let mut from = 0;

    while let Some(offset) = memchr(open, &bytes[from..]) {
        let start = from + offset;
        match memchr2(close, b'\n', &bytes[start + 1..]) {
            Some(len) if bytes[start + 1 + len] == close => {
                out.push_str(&input[copied..start]);
                copied = start + len + 2;
                from = copied;
            }
            // Every opener before the line break would stop at it too.
            Some(len) => from = start + len + 2,
            None => break,
        }
    }

    if copied == 0 {
        return Cow::Borrowed(input);
    }
    out.push_str(&input[copied..]);
    Cow::Owned(out)
}

/// Encode a value for use inside a double-quoted HTML attribute.
#[inline]
pub fn encode_attr(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_angle_basic() {
        assert_eq!(escape_angle_brackets("Hello, World!"), "Hello, World!");
        assert_eq!(escape_angle_brackets("<b>"), "&lt;b&gt;");
        assert_eq!(escape_angle_brackets("1 > 0 & 0 < 1"), "1 &gt; 0 & 0 &lt; 1");
    }

    #[test]
    fn test_escape_angle_consecutive() {
        assert_eq!(escape_angle_brackets("<<<"), "&lt;&lt;&lt;");
        assert_eq!(escape_angle_brackets(""), "");
    }

    #[test]
    fn test_escape_brackets_boundaries() {
        let mut out = String::new();
        escape_brackets_into(&mut out, "[");
        assert_eq!(out, "&#91;");

        out.clear();
        escape_brackets_into(&mut out, "a]b[");
        assert_eq!(out, "a&#93;b&#91;");
    }

    #[test]
    fn test_escape_brackets_unicode() {
        let mut out = String::new();
        escape_brackets_into(&mut out, "Grüße [Welt]");
        assert_eq!(out, "Grüße &#91;Welt&#93;");
    }

    #[test]
    fn test_restore_brackets() {
        assert_eq!(restore_brackets("&#91;b&#93;x&#91;/b&#93;"), "[b]x[/b]");
        assert_eq!(restore_brackets("a &amp; b"), "a &amp; b");
        assert!(matches!(restore_brackets("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_bracket_runs() {
        assert_eq!(strip_bracket_runs("a[b]c[/i]d"), "acd");
        assert_eq!(strip_bracket_runs("keep [ this"), "keep [ this");
        assert_eq!(strip_bracket_runs("[multi\nline]"), "[multi\nline]");
        assert_eq!(strip_bracket_runs("[[x]"), "");
    }

    #[test]
    fn test_strip_html_tags() {
        assert_eq!(
            strip_html_tags("<span class=\"xbbcode-b\">a@b.c</span>"),
            "a@b.c"
        );
        assert_eq!(strip_html_tags("no tags"), "no tags");
    }

    #[test]
    fn test_contains_brackets() {
        assert!(contains_brackets("x]"));
        assert!(!contains_brackets("&#91;x&#93;"));
    }

    #[test]
    fn test_encode_attr_quotes() {
        assert_eq!(encode_attr("a\"b"), "a&quot;b");
        assert_eq!(encode_attr("https://x.y/?a=1"), "https://x.y/?a=1");
    }
}

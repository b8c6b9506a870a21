//! Built-in tag catalog.
//!
//! Parameterized tags validate their values against an allow-pattern and
//! fall back to a safe default instead of embedding untrusted input. Values
//! that pass are still attribute-encoded before they reach the output.

use std::sync::LazyLock;

use regex::Regex;

use crate::escape::{encode_attr, strip_html_tags};
use crate::tag::{TagDefinition, TagRender, param_value};

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?|file|c):(?:/{1,3}|\\)[-a-zA-Z0-9:;,@#%&()~_?+=/\\.]*$")
        .expect("URL_PATTERN: hardcoded regex is valid")
});

static COLOR_CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?[a-fA-F0-9]{6}$").expect("COLOR_CODE_PATTERN: hardcoded regex is valid")
});

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\s@]+@[^\s@]+\.[^\s@]+").expect("EMAIL_PATTERN: hardcoded regex is valid")
});

static FONT_FACE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^([a-z][a-z0-9_]+|"[a-z][a-z0-9_\s]+")$"#)
        .expect("FONT_FACE_PATTERN: hardcoded regex is valid")
});

/// CSS named colors, sorted for binary search.
const COLOR_NAMES: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue", "darkcyan",
    "darkgoldenrod", "darkgray", "darkgreen", "darkkhaki", "darkmagenta", "darkolivegreen",
    "darkorange", "darkorchid", "darkred", "darksalmon", "darkseagreen", "darkslateblue",
    "darkslategray", "darkturquoise", "darkviolet", "deeppink", "deepskyblue", "dimgray",
    "dodgerblue", "firebrick", "floralwhite", "forestgreen", "fuchsia", "gainsboro",
    "ghostwhite", "gold", "goldenrod", "gray", "green", "greenyellow", "honeydew", "hotpink",
    "indianred", "indigo", "ivory", "khaki", "lavender", "lavenderblush", "lawngreen",
    "lemonchiffon", "lightblue", "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray",
    "lightgreen", "lightpink", "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray",
    "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta", "maroon",
    "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple", "mediumseagreen",
    "mediumslateblue", "mediumspringgreen", "mediumturquoise", "mediumvioletred", "midnightblue",
    "mintcream", "mistyrose", "moccasin", "navajowhite", "navy", "oldlace", "olive", "olivedrab",
    "orange", "orangered", "orchid", "palegoldenrod", "palegreen", "paleturquoise",
    "palevioletred", "papayawhip", "peachpuff", "peru", "pink", "plum", "powderblue", "purple",
    "red", "rosybrown", "royalblue", "saddlebrown", "salmon", "sandybrown", "seagreen",
    "seashell", "sienna", "silver", "skyblue", "slateblue", "slategray", "snow", "springgreen",
    "steelblue", "tan", "teal", "thistle", "tomato", "turquoise", "violet", "wheat", "white",
    "whitesmoke", "yellow", "yellowgreen",
];

const LIST_TAGS: [&str; 3] = ["list", "ul", "ol"];
const TABLE_SECTIONS: [&str; 4] = ["table", "tbody", "tfoot", "thead"];

/// Default font size when `[size]` is missing or out of range.
const DEFAULT_SIZE: i64 = 14;

/// Validate a color value: a CSS color name or a six-digit hex code.
///
/// Hex codes are normalized to carry a leading `#`.
pub fn sanitize_color(value: &str) -> Option<String> {
    let value = value.to_ascii_lowercase();
    if COLOR_NAMES.binary_search(&value.as_str()).is_ok() {
        return Some(value);
    }
    if COLOR_CODE_PATTERN.is_match(&value) {
        return Some(if value.starts_with('#') {
            value
        } else {
            format!("#{value}")
        });
    }
    None
}

/// Validate a link or image target.
pub fn sanitize_url(value: &str) -> Option<&str> {
    URL_PATTERN.is_match(value).then_some(value)
}

/// `[color]`, `[large]`, `[small]`: a span with a validated text color.
struct ColorSpan {
    class: Option<&'static str>,
    fallback: &'static str,
}

impl TagRender for ColorSpan {
    fn render_open(&self, params: &str, _content: &str) -> String {
        let color = sanitize_color(param_value(params)).unwrap_or_else(|| self.fallback.to_owned());
        match self.class {
            Some(class) => format!("<span class=\"{class}\" style=\"color:{color}\">"),
            None => format!("<span style=\"color:{color}\">"),
        }
    }

    fn render_close(&self, _params: &str, _content: &str) -> String {
        "</span>".to_owned()
    }
}

/// `[face]`, `[font]`: a span with a validated font family.
struct FontFace;

impl TagRender for FontFace {
    fn render_open(&self, params: &str, _content: &str) -> String {
        let value = param_value(params);
        let face = if FONT_FACE_PATTERN.is_match(value) {
            encode_attr(value)
        } else {
            "inherit".into()
        };
        format!("<span style=\"font-family:{face}\">")
    }

    fn render_close(&self, _params: &str, _content: &str) -> String {
        "</span>".to_owned()
    }
}

/// `[size=N]`: a size class, N clamped to 4..=40.
struct FontSize;

impl TagRender for FontSize {
    fn render_open(&self, params: &str, _content: &str) -> String {
        let size = leading_int(param_value(params))
            .filter(|size| (4..=40).contains(size))
            .unwrap_or(DEFAULT_SIZE);
        format!("<span class=\"xbbcode-size-{size}\">")
    }

    fn render_close(&self, _params: &str, _content: &str) -> String {
        "</span>".to_owned()
    }
}

/// Integer prefix of a value, ignoring leading whitespace (`"12px"` is 12).
fn leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let sign_len = usize::from(value.starts_with(['+', '-']));
    let digits = value[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    value[..sign_len + digits].parse().ok()
}

/// Value of a tag that takes it either as parameter or as content.
fn param_or_content<'a>(params: &'a str, content: &'a str) -> std::borrow::Cow<'a, str> {
    if params.is_empty() {
        strip_html_tags(content)
    } else {
        param_value(params).into()
    }
}

/// `[url]` / `[url=target]`.
struct Link;

impl TagRender for Link {
    fn render_open(&self, params: &str, content: &str) -> String {
        let target = param_or_content(params, content);
        let href = sanitize_url(&target).map_or_else(|| "#".into(), encode_attr);
        format!("<a href=\"{href}\" target=\"_blank\" rel=\"noopener noreferrer\">")
    }

    fn render_close(&self, _params: &str, _content: &str) -> String {
        "</a>".to_owned()
    }
}

/// `[email]` / `[email=address]`.
struct Email;

impl TagRender for Email {
    fn render_open(&self, params: &str, content: &str) -> String {
        let address = param_or_content(params, content);
        if EMAIL_PATTERN.is_match(&address) {
            format!("<a href=\"mailto:{}\">", encode_attr(&address))
        } else {
            "<a>".to_owned()
        }
    }

    fn render_close(&self, _params: &str, _content: &str) -> String {
        "</a>".to_owned()
    }
}

/// `[img]source[/img]`; the content is the source, not visible text.
struct Image;

impl TagRender for Image {
    fn render_open(&self, _params: &str, content: &str) -> String {
        let src = sanitize_url(content).map(encode_attr).unwrap_or_default();
        format!("<img src=\"{src}\" />")
    }

    fn render_close(&self, _params: &str, _content: &str) -> String {
        String::new()
    }
}

fn span(name: &str, class: &'static str) -> TagDefinition {
    TagDefinition::wrap(name, class, "</span>")
}

/// The built-in catalog, in registration order.
pub fn definitions() -> Vec<TagDefinition> {
    vec![
        span("b", "<span class=\"xbbcode-b\">"),
        // Classification only: the document root takes this tag's rules.
        TagDefinition::wrap("bbcode", "", ""),
        span("center", "<span class=\"xbbcode-center\">"),
        span("code", "<span class=\"xbbcode-code\">").with_no_parse(true),
        TagDefinition::new(
            "color",
            ColorSpan {
                class: None,
                fallback: "black",
            },
        ),
        TagDefinition::new("email", Email),
        TagDefinition::new("face", FontFace),
        TagDefinition::new("font", FontFace),
        span("i", "<span class=\"xbbcode-i\">"),
        TagDefinition::new("img", Image).with_display_content(false),
        span("justify", "<span class=\"xbbcode-justify\">"),
        TagDefinition::new(
            "large",
            ColorSpan {
                class: Some("xbbcode-size-36"),
                fallback: "inherit",
            },
        ),
        span("left", "<span class=\"xbbcode-left\">"),
        TagDefinition::wrap("li", "<li>", "</li>").restrict_parents_to(LIST_TAGS),
        TagDefinition::wrap("list", "<ul>", "</ul>").restrict_children_to(["*", "li"]),
        TagDefinition::wrap("noparse", "", "").with_no_parse(true),
        TagDefinition::wrap("ol", "<ol>", "</ol>").restrict_children_to(["*", "li"]),
        span("php", "<span class=\"xbbcode-code\">").with_no_parse(true),
        TagDefinition::wrap("quote", "<blockquote class=\"xbbcode-blockquote\">", "</blockquote>"),
        span("right", "<span class=\"xbbcode-right\">"),
        span("s", "<span class=\"xbbcode-s\">"),
        TagDefinition::new("size", FontSize),
        TagDefinition::new(
            "small",
            ColorSpan {
                class: Some("xbbcode-size-10"),
                fallback: "inherit",
            },
        ),
        TagDefinition::wrap("sub", "<sub>", "</sub>"),
        TagDefinition::wrap("sup", "<sup>", "</sup>"),
        TagDefinition::wrap("table", "<table class=\"xbbcode-table\">", "</table>")
            .restrict_children_to(["tbody", "thead", "tfoot", "tr"]),
        TagDefinition::wrap("tbody", "<tbody>", "</tbody>")
            .restrict_children_to(["tr"])
            .restrict_parents_to(["table"]),
        TagDefinition::wrap("tfoot", "<tfoot>", "</tfoot>")
            .restrict_children_to(["tr"])
            .restrict_parents_to(["table"]),
        TagDefinition::wrap("thead", "<thead class=\"xbbcode-thead\">", "</thead>")
            .restrict_children_to(["tr"])
            .restrict_parents_to(["table"]),
        TagDefinition::wrap("td", "<td class=\"xbbcode-td\">", "</td>").restrict_parents_to(["tr"]),
        TagDefinition::wrap("th", "<th class=\"xbbcode-th\">", "</th>").restrict_parents_to(["tr"]),
        TagDefinition::wrap("tr", "<tr class=\"xbbcode-tr\">", "</tr>")
            .restrict_children_to(["td", "th"])
            .restrict_parents_to(TABLE_SECTIONS),
        span("u", "<span class=\"xbbcode-u\">"),
        TagDefinition::wrap("ul", "<ul>", "</ul>").restrict_children_to(["*", "li"]),
        TagDefinition::new("url", Link),
        // Closed by the converter, never by the author.
        TagDefinition::wrap("*", "<li>", "</li>").restrict_parents_to(LIST_TAGS),
    ]
}

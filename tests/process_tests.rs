use ferrobb::{Converter, Diagnostic, Options, TagDefinition, process, to_html};

fn opts() -> Options {
    Options::default()
}

#[test]
fn simple_tag_leaves_no_brackets() {
    let result = process("[b]x[/b]", &opts());
    assert_eq!(result.html, "<span class=\"xbbcode-b\">x</span>");
    assert!(!result.error);
    assert!(result.diagnostics.is_none());
}

#[test]
fn tag_names_are_case_insensitive() {
    assert_eq!(to_html("[B]x[/b]"), "<span class=\"xbbcode-b\">x</span>");
    assert_eq!(to_html("[QuOtE]x[/quote]"), "<blockquote class=\"xbbcode-blockquote\">x</blockquote>");
}

#[test]
fn star_items_become_list_items() {
    let result = process("[list][*]a[*]b[/list]", &opts());
    assert_eq!(result.html, "<ul><li>a</li><li>b</li></ul>");
    assert!(!result.error);
}

#[test]
fn star_items_in_nested_lists() {
    assert_eq!(
        to_html("[ul][*]a[ol][*]b[*]c[/ol][*]d[/ul]"),
        "<ul><li>a<ol><li>b</li><li>c</li></ol></li><li>d</li></ul>"
    );
}

#[test]
fn restricted_child_is_rendered_and_reported() {
    let mut converter = Converter::new();
    converter
        .extend([TagDefinition::wrap("list", "<ul>", "</ul>").restrict_children_to(["*"])])
        .unwrap();

    let result = converter.process("[list][b]x[/b][/list]", &opts());
    assert_eq!(result.html, "<ul><span class=\"xbbcode-b\">x</span></ul>");
    assert!(result.error);
    assert_eq!(result.diagnostics(), [Diagnostic::child_not_allowed("list", "b")]);
    assert_eq!(
        result.diagnostics()[0].to_string(),
        "The tag \"b\" is not allowed as a child of the tag \"list\"."
    );
}

#[test]
fn no_parse_content_shows_literal_markup() {
    let result = process("[noparse][b]x[/b][/noparse]", &opts());
    assert_eq!(result.html, "[b]x[/b]");
    assert!(!result.error);

    assert_eq!(
        to_html("[code][b]x[/b][/code]"),
        "<span class=\"xbbcode-code\">[b]x[/b]</span>"
    );
}

#[test]
fn no_parse_close_is_case_insensitive() {
    assert_eq!(
        to_html("[CODE][i]x[/i][/Code] [i]y[/i]"),
        "<span class=\"xbbcode-code\">[i]x[/i]</span> <span class=\"xbbcode-i\">y</span>"
    );
}

#[test]
fn no_parse_content_keeps_references_when_escaping() {
    let options = Options {
        escape_html: true,
        ..opts()
    };
    assert_eq!(
        process("[code][b][/code]", &options).html,
        "<span class=\"xbbcode-code\">&#91;b&#93;</span>"
    );
}

#[test]
fn unsafe_color_falls_back() {
    assert_eq!(
        to_html("[color=red;background:url(x)]t[/color]"),
        "<span style=\"color:black\">t</span>"
    );
    assert_eq!(
        to_html("[color=#00FF00]t[/color]"),
        "<span style=\"color:#00ff00\">t</span>"
    );
}

#[test]
fn unsafe_url_falls_back_to_hash() {
    assert_eq!(
        to_html("[url=javascript:alert(1)]x[/url]"),
        "<a href=\"#\" target=\"_blank\" rel=\"noopener noreferrer\">x</a>"
    );
}

#[test]
fn rendered_output_does_not_render_again() {
    let options = Options {
        escape_html: true,
        ..opts()
    };
    let first = process("[b]x[/b] [y] [url]http://a.b[/url]", &options);
    assert!(!first.error);

    let second = process(&first.html, &options);
    assert!(!second.error);
    assert_eq!(second.html, ferrobb::escape::escape_angle_brackets(&first.html));
}

#[test]
fn unmatched_markers_are_misaligned() {
    let result = process("[b]x", &opts());
    assert_eq!(result.html, "[b]x");
    assert!(result.error);
    assert_eq!(result.diagnostics(), [Diagnostic::Misaligned]);

    let result = process("x[/i]", &opts());
    assert_eq!(result.diagnostics(), [Diagnostic::Misaligned]);
}

#[test]
fn remove_misaligned_drops_marker_text() {
    let options = Options {
        remove_misaligned_tags: true,
        ..opts()
    };
    let result = process("[b]x [i]y[/i]", &options);
    assert_eq!(result.html, "x <span class=\"xbbcode-i\">y</span>");
    assert!(result.error);
    assert_eq!(result.diagnostics(), [Diagnostic::Misaligned]);
}

#[test]
fn remove_misaligned_drops_multi_line_markers() {
    let options = Options {
        remove_misaligned_tags: true,
        ..opts()
    };
    let result = process("[color=red\nblue]y", &options);
    assert_eq!(result.html, "y");
    assert!(result.error);
    assert_eq!(result.diagnostics(), [Diagnostic::Misaligned]);

    let result = process("[color=red\nblue]y", &opts());
    assert_eq!(result.html, "[color=red\nblue]y");
    assert_eq!(result.diagnostics(), [Diagnostic::Misaligned]);
}

#[test]
fn crossing_tags_leave_outer_markers_literal() {
    let result = process("[b][i]x[/b][/i]", &opts());
    assert_eq!(result.html, "[b]<span class=\"xbbcode-i\">x[/b]</span>");
    assert!(result.error);
}

#[test]
fn star_outside_list_is_misaligned() {
    let result = process("[*]x", &opts());
    assert_eq!(result.html, "[*]x");
    assert_eq!(result.diagnostics(), [Diagnostic::Misaligned]);
}

#[test]
fn angle_brackets_never_survive() {
    assert_eq!(
        to_html("[b]<img src=x onerror=alert(1)>[/b]"),
        "<span class=\"xbbcode-b\">&lt;img src=x onerror=alert(1)&gt;</span>"
    );
}

#[test]
fn deep_nesting_terminates_and_is_misaligned() {
    let depth = ferrobb::limits::MAX_TAG_NESTING + 36;
    let input = format!("{}x{}", "[b]".repeat(depth), "[/b]".repeat(depth));
    let result = process(&input, &opts());
    assert!(result.error);
    assert_eq!(result.diagnostics(), [Diagnostic::Misaligned]);
}

#[test]
fn nesting_at_limit_is_fine() {
    let depth = ferrobb::limits::MAX_TAG_NESTING;
    let input = format!("{}x{}", "[i]".repeat(depth), "[/i]".repeat(depth));
    let result = process(&input, &opts());
    assert!(!result.error);
    assert_eq!(result.html.matches("<span").count(), depth);
}

#[test]
fn line_break_wrapper_surrounds_output() {
    let options = Options {
        add_in_line_breaks: true,
        ..opts()
    };
    assert_eq!(
        process("[b]a[/b]\nb", &options).html,
        "<div style=\"white-space:pre-wrap;\" class=\"xbbcode\"><span class=\"xbbcode-b\">a</span>\nb</div>"
    );
}

#[test]
fn stray_brackets_restored_unless_escaping() {
    assert_eq!(to_html("a[1] b]"), "a[1] b]");

    let options = Options {
        escape_html: true,
        ..opts()
    };
    let result = process("a[1] b]", &options);
    assert_eq!(result.html, "a&#91;1&#93; b&#93;");
    assert!(!result.error);
}

#[test]
fn whitelist_limits_honored_tags() {
    let options = Options {
        tag_whitelist: vec!["b".into()],
        ..opts()
    };
    let result = process("[b]x[/b][i]y[/i]", &options);
    assert_eq!(result.html, "<span class=\"xbbcode-b\">x</span>[i]y[/i]");
    assert!(!result.error);
}

#[test]
fn blacklist_excludes_tags() {
    let options = Options {
        tag_blacklist: vec!["B".into()],
        ..opts()
    };
    let result = process("[b]x[/b][i]y[/i]", &options);
    assert_eq!(result.html, "[b]x[/b]<span class=\"xbbcode-i\">y</span>");
    assert!(!result.error);
}

#[test]
fn blacklisted_no_parse_tag_is_parsed_through() {
    let options = Options {
        tag_blacklist: vec!["code".into()],
        ..opts()
    };
    assert_eq!(
        process("[code][b]x[/b][/code]", &options).html,
        "[code]<span class=\"xbbcode-b\">x</span>[/code]"
    );
}

#[test]
fn diagnostics_follow_discovery_order() {
    let result = process("[li]a[/li][table][td]b[/td][/table] [c", &opts());
    let messages: Vec<String> = result.diagnostics().iter().map(ToString::to_string).collect();
    assert_eq!(
        messages,
        [
            "The tag \"bbcode\" is not allowed as a parent of the tag \"li\".",
            "The tag \"td\" is not allowed as a child of the tag \"table\".",
            "The tag \"table\" is not allowed as a parent of the tag \"td\".",
        ]
    );
}

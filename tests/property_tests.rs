use ferrobb::escape::{contains_brackets, escape_angle_brackets};
use ferrobb::{Diagnostic, Options, process};
use proptest::prelude::*;
use std::time::{Duration, Instant};

const FRAGMENTS: &[&str] = &[
    "[b]", "[/b]", "[i]", "[/i]", "[list]", "[/list]", "[ul]", "[/ul]", "[*]", "[li]", "[/li]",
    "[code]", "[/code]", "[noparse]", "[/noparse]", "[url=http://a.b]", "[url=javascript:x]",
    "[url]", "[/url]", "[img]", "[/img]", "[color=red]", "[color=\"x]", "[/color]", "[table]",
    "[/table]", "[tr]", "[/tr]", "[td]", "[/td]", "[quote author]", "[/quote]", "[size=99]",
    "[/size]", "[", "]", "[/", "<script>", "</script>", "<img src=x onerror=y>",
];

fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(FRAGMENTS).prop_map(str::to_owned),
        "[a-z<>&\"' =/]{0,6}",
    ]
}

fn markup() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..32).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn input_html_never_survives(input in markup()) {
        for options in [
            Options::default(),
            Options { escape_html: true, remove_misaligned_tags: true, ..Options::default() },
        ] {
            let html = process(&input, &options).html;
            prop_assert!(!html.contains("<script"), "{html}");
            prop_assert!(!html.contains("<img src=x"), "{html}");
            prop_assert!(!html.contains("href=\"javascript"), "{html}");
        }
    }

    #[test]
    fn text_without_brackets_is_only_angle_escaped(input in "[a-z<>&\"' \n]{0,64}") {
        let result = process(&input, &Options::default());
        prop_assert_eq!(result.html, escape_angle_brackets(&input));
        prop_assert!(!result.error);
    }

    #[test]
    fn reprocessing_renders_nothing_new(input in markup()) {
        let options = Options {
            escape_html: true,
            remove_misaligned_tags: true,
            ..Options::default()
        };
        let first = process(&input, &options).html;
        prop_assert!(!contains_brackets(&first), "{first}");

        let second = process(&first, &options);
        prop_assert!(!second.error);
        prop_assert_eq!(second.html, escape_angle_brackets(&first));
    }

    #[test]
    fn error_iff_diagnostics(input in markup()) {
        let result = process(&input, &Options::default());
        prop_assert_eq!(result.error, !result.diagnostics().is_empty());
        prop_assert_eq!(result.error, result.diagnostics.is_some());
    }

    #[test]
    fn nesting_depth_bound(depth in 0usize..160) {
        let input = format!("{}x{}", "[b]".repeat(depth), "[/b]".repeat(depth));
        let result = process(&input, &Options::default());
        if depth <= ferrobb::limits::MAX_TAG_NESTING {
            prop_assert!(!result.error);
        } else {
            prop_assert_eq!(result.diagnostics(), [Diagnostic::Misaligned].as_slice());
        }
    }
}

fn elapsed(input: &str) -> Duration {
    let start = Instant::now();
    let result = process(input, &Options::default());
    let took = start.elapsed();
    assert_eq!(result.html, input);
    took
}

/// Quadrupling the input must not take anywhere near sixteen times as long.
fn assert_scales_linearly(unit: &str) {
    let small = unit.repeat(4_000);
    let large = unit.repeat(16_000);
    // Warm up allocator and lazy statics.
    elapsed(&small);
    let small_time = (0..3).map(|_| elapsed(&small)).min().unwrap_or_default();
    let large_time = (0..3).map(|_| elapsed(&large)).min().unwrap_or_default();
    let bound = small_time * 10 + Duration::from_millis(20);
    assert!(
        large_time < bound,
        "{unit:?}: {small_time:?} for 4k units, {large_time:?} for 16k units"
    );
}

#[test]
fn unclosed_no_parse_openers_scale_linearly() {
    assert_scales_linearly("[code]");
}

#[test]
fn openers_without_close_bracket_scale_linearly() {
    assert_scales_linearly("[color=");
}

#[test]
fn closes_of_unopened_lists_scale_linearly() {
    assert_scales_linearly("[list][/ol]");
}

use between_lib::{Between, Options, ParseError, MAX_NESTING_DEPTH};
use pretty_assertions::assert_eq;

fn run(input: &str, output: &str, options: Options) {
    let _ = env_logger::builder().is_test(true).try_init();
    let between = Between::new(options).expect("valid options");
    let result = between.process_str(input).expect("parsable css");
    assert_eq!(result, output);
}

fn run_default(input: &str, output: &str) {
    run(input, output, Options::default());
}

/*
 * barebones functionality
 * -----------------------
 */

#[test]
fn test_runs() {
    run_default("a { }", "a { }");
}

#[test]
fn test_does_not_meddle_with_inner_formatting() {
    let css = r#"
.foo { font-weight:700;text-decoration:none }

.bar {
    font-weight:700;
  text-decoration:none;
}
"#;
    run_default(css, css);
}

/*
 * selector rule spacing
 * ---------------------
 */

#[test]
fn test_spaces_general_rules() {
    run_default(
        r#"
a { }
strong { }
em { }
"#,
        r#"
a { }

strong { }

em { }
"#,
    );
}

#[test]
fn test_avoids_spacing_related_selectors() {
    let css = r#"
.foo { }
.foo li { }
"#;
    run_default(css, css);
}

#[test]
fn test_avoids_spacing_bem_elements() {
    let css = r#"
.block { }
.block--modifier {}
.block__element { }
.block__element--modifier { }
"#;
    run_default(css, css);
}

#[test]
fn test_collapses_spacing_on_bem_element() {
    run_default(
        r#"
.block { }

.block__element { }
"#,
        r#"
.block { }
.block__element { }
"#,
    );
}

#[test]
fn test_finds_nested_bem_blocks() {
    run_default(
        r#"
.no-js .block__foo { }

.block__bar--baz strong { }
"#,
        r#"
.no-js .block__foo { }
.block__bar--baz strong { }
"#,
    );
}

#[test]
fn test_handles_conglomerate_bem_blocks() {
    run_default(
        r#"
.block,
.another-block { }

.block__foo { }

.another-block__bar { }
"#,
        r#"
.block,
.another-block { }
.block__foo { }
.another-block__bar { }
"#,
    );
}

#[test]
fn test_numbered_elements_are_separate_blocks() {
    run_default("h1 {}\nh2 {}\nh2 small {}\n", "h1 {}\n\nh2 {}\nh2 small {}\n");
}

#[test]
fn test_only_first_occurrence_of_a_class_counts() {
    run_default(".block {}\n.blockish .block {}\n", ".block {}\n\n.blockish .block {}\n");
}

/*
 * comments
 * --------
 */

#[test]
fn test_leaves_standard_comments_alone() {
    let css = r#"
.foo {
  /* comment */
  display: block;
}

/* another comment */
.bar {
  color: #f00;  /* yet another comment */
}
"#;
    run_default(css, css);
}

#[test]
fn test_spaces_section_comments() {
    run_default(
        r#"
.foo { }
/* ---------- major section ---------- */
.bar { }
"#,
        r#"
.foo { }


/* ---------- major section ---------- */

.bar { }
"#,
    );
}

#[test]
fn test_handles_multiline_comments() {
    run_default(
        r#"
/*
 * thing
 */
.foo { }
/*
 * ---------- major thing ----------
 */
.bar { }
"#,
        r#"
/*
 * thing
 */
.foo { }


/*
 * ---------- major thing ----------
 */

.bar { }
"#,
    );
}

#[test]
fn test_heading_detection_can_be_disabled() {
    let css = ".foo { }\n/* --- */\n.bar { }\n";
    run(
        css,
        css,
        Options {
            heading_comment_identifiers: Vec::new(),
            ..Options::default()
        },
    );
}

#[test]
fn test_custom_heading_identifiers() {
    run(
        ".foo { }\n/* ## Forms ## */\n.bar { }\n/* === not a heading === */\n.baz { }\n",
        ".foo { }\n\n\n/* ## Forms ## */\n\n.bar { }\n/* === not a heading === */\n.baz { }\n",
        Options {
            heading_comment_identifiers: vec!["##".to_string()],
            ..Options::default()
        },
    );
}

/*
 * @rules
 * ------
 */

#[test]
fn test_spaces_unrelated_media_queries_before() {
    run_default(
        r#"
.foo { }
@media print {
  .bar { }
}
"#,
        r#"
.foo { }


@media print {
  .bar { }
}
"#,
    );
}

#[test]
fn test_spaces_bem_block_media_queries_before() {
    run_default(
        r#"
.foo { }
@media print {
  .foo__element { }
}
"#,
        r#"
.foo { }

@media print {
  .foo__element { }
}
"#,
    );
}

#[test]
fn test_spaces_multiple_bem_block_media_queries_before() {
    run_default(
        r#"
.foo { }
@media print {
  .foo__element { }
}
@media (min-width: 720px) {
  .foo { }
}
"#,
        r#"
.foo { }

@media print {
  .foo__element { }
}

@media (min-width: 720px) {
  .foo { }
}
"#,
    );
}

#[test]
fn test_spaces_unrelated_media_queries_after() {
    run_default(
        r#"
@media print {
  .foo { }
}
.bar { }
"#,
        r#"
@media print {
  .foo { }
}


.bar { }
"#,
    );
}

#[test]
fn test_spaces_related_media_queries_after() {
    run_default(
        r#"
.block {}
.block__element {}
@media print {
  .block__element {}
}
.block {}
.block__element {}
"#,
        r#"
.block {}
.block__element {}

@media print {
  .block__element {}
}

.block {}
.block__element {}
"#,
    );
}

#[test]
fn test_isolates_empty_at_rules() {
    run_default(
        r#"
.foo {}
@media print { }
.bar {}
"#,
        r#"
.foo {}


@media print { }


.bar {}
"#,
    );
}

#[test]
fn test_unrelated_media_query_after_heading() {
    run_default(
        r#"
.foo { }
/* ---------- print ---------- */
@media print {
  .bar { }
}
"#,
        r#"
.foo { }


/* ---------- print ---------- */


@media print {
  .bar { }
}
"#,
    );
}

fn nested_media(depth: usize) -> String {
    let mut css = String::new();
    for _ in 0..depth {
        css.push_str("@media screen {\n");
    }
    css.push_str(".a {}\n");
    for _ in 0..depth {
        css.push_str("}\n");
    }
    css
}

#[test]
fn test_nesting_at_the_limit_is_processed() {
    let css = nested_media(MAX_NESTING_DEPTH);
    run_default(&css, &css);
}

#[test]
fn test_deep_nesting_is_rejected() {
    let between = Between::new(Options::default()).unwrap();
    for depth in [MAX_NESTING_DEPTH + 1, 1_000, 20_000] {
        let err = between.process_str(&nested_media(depth)).unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep(_)), "{}", depth);
    }
}

/*
 * selector breaking
 * -----------------
 */

#[test]
fn test_breaks_multiple_selectors() {
    run(
        "a { }\na:hover, a:focus { }\n",
        "a { }\na:hover,\na:focus { }\n",
        Options {
            break_multiple_selectors: true,
            ..Options::default()
        },
    );
}

#[test]
fn test_selector_breaking_is_off_by_default() {
    let css = "a:hover, a:focus { }\n";
    run_default(css, css);
}

#[test]
fn test_full_stylesheet() {
    run(
        r#"@import "base.css";
/* === Navigation === */
.nav, .nav--open { display: flex }

.nav__item { margin: 0 }
.nav__item:hover { color: red }
@media (max-width: 600px) {
  .nav { display: block }
  .nav__item,.nav__link { margin: 1em }
}
/* === Footer === */
footer { padding: 0 }
footer p { margin: 0 }
a { color: inherit }
"#,
        r#"@import "base.css";


/* === Navigation === */

.nav,
.nav--open { display: flex }
.nav__item { margin: 0 }
.nav__item:hover { color: red }

@media (max-width: 600px) {
  .nav { display: block }
  .nav__item,
  .nav__link { margin: 1em }
}


/* === Footer === */

footer { padding: 0 }
footer p { margin: 0 }

a { color: inherit }
"#,
        Options {
            break_multiple_selectors: true,
            ..Options::default()
        },
    );
}

#[test]
fn test_batch_matches_single_runs() {
    let between = Between::new(Options::default()).unwrap();
    let sources: Vec<String> = (0..16)
        .map(|i| format!(".block{i} {{}}\n\n.block{i}__el {{}}\nstrong {{}}\n"))
        .collect();
    let results = between.process_batch(&sources);
    for (source, result) in sources.iter().zip(results) {
        assert_eq!(result.unwrap(), between.process_str(source).unwrap());
    }
}

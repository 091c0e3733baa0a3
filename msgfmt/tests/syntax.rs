use msgfmt::{
    Checker, ConstructKind, Keyword, ParseError, construct_at, constructs, find_construct,
    parse_options,
};

fn check(source: &str) -> Result<Vec<ParseError>, Vec<ParseError>> {
    Checker::new(source.to_string(), 0).check()
}

fn messages(diagnostics: &[ParseError]) -> Vec<String> {
    diagnostics.iter().map(|d| d.message.clone()).collect()
}

#[test]
fn finds_construct_with_nested_body() {
    let msg = "You have {n, plural, one {# {kind}} other {# {kind}s}} left";
    let c = find_construct(msg, 0).expect("construct");
    assert_eq!(c.name, "n");
    assert_eq!(c.kind(), Some(ConstructKind::Plural));
    assert_eq!(c.body, " one {# {kind}} other {# {kind}s}");
    assert_eq!(&msg[c.span.clone()], "{n, plural, one {# {kind}} other {# {kind}s}}");
    assert_eq!(&msg[c.body_span.clone()], c.body);
}

#[test]
fn skips_plain_placeholders() {
    let msg = "{name} is {age, select, other {old}}";
    let c = find_construct(msg, 0).expect("construct");
    assert_eq!(c.name, "age");
    assert_eq!(c.span.start, 10);
}

#[test]
fn keyword_only_form() {
    let c = find_construct("{n, number}", 0).expect("construct");
    assert_eq!(c.keyword, Keyword::Unknown("number"));
    assert_eq!(c.body, "");
    assert_eq!(c.span, 0..11);
}

#[test]
fn known_keyword_needs_a_body() {
    assert!(find_construct("[{n, plural}]", 0).is_none());
    assert!(construct_at("{g, select }", 0).is_none());
    let c = find_construct("{n, plural,}", 0).expect("construct");
    assert_eq!(c.kind(), Some(ConstructKind::Plural));
    assert_eq!(c.body, "");
}

#[test]
fn construct_at_requires_exact_position() {
    let msg = "x {n, select, other {y}}";
    assert!(construct_at(msg, 0).is_none());
    assert_eq!(construct_at(msg, 2).map(|c| c.name), Some("n"));
    assert!(construct_at(msg, 100).is_none());
}

#[test]
fn unterminated_construct_is_not_matched() {
    assert!(find_construct("{n, plural, one {x}", 0).is_none());
}

#[test]
fn iterates_top_level_constructs_only() {
    let msg = "{a, select, x {{b, select, other {y}}} other {z}} and {c, plural, other {#}}";
    let found: Vec<&str> = constructs(msg).map(|c| c.name).collect();
    assert_eq!(found, vec!["a", "c"]);
}

#[test]
fn unicode_identifiers_and_text() {
    let msg = "¡Hola! {número, plural, one {# año} other {# años}}";
    let c = find_construct(msg, 0).expect("construct");
    assert_eq!(c.name, "número");
    assert_eq!(&msg[c.span.clone()], "{número, plural, one {# año} other {# años}}");
}

#[test]
fn parses_options_in_order() {
    let table = parse_options(" =0 {none} one {# item}  other { # items } ");
    let labels: Vec<&str> = table.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["=0", "one", "other"]);
    assert_eq!(table.get("other"), Some("# items"));
    assert!(table.truncated_at().is_none());
}

#[test]
fn option_messages_track_nested_braces() {
    let table = parse_options("male {{n, plural, one {# son} other {# sons}}} other {kids}");
    assert_eq!(table.get("male"), Some("{n, plural, one {# son} other {# sons}}"));
    assert_eq!(table.get("other"), Some("kids"));
}

#[test]
fn option_spans_point_into_body() {
    let body = " one {  first } other {second}";
    let table = parse_options(body);
    let case = table.iter().next().expect("case");
    assert_eq!(&body[case.label_span.clone()], "one");
    assert_eq!(&body[case.message_span.clone()], "first");
}

#[test]
fn label_without_message_stops_parsing() {
    let body = "one {a} two three {c}";
    let table = parse_options(body);
    assert_eq!(table.len(), 1);
    assert!(!table.contains("three"));
    let span = table.truncated_at().expect("truncated").clone();
    assert_eq!(&body[span], "two");
}

#[test]
fn unbalanced_option_message_runs_to_end() {
    let table = parse_options("one {a {b}");
    assert_eq!(table.get("one"), Some("a {b}"));
}

#[test]
fn duplicate_labels_are_shadowed() {
    let table = parse_options("a {1} b {2} a {3}");
    assert_eq!(table.len(), 2);
    assert_eq!(table.get("a"), Some("3"));
    assert_eq!(table.shadowed().len(), 1);
    assert_eq!(table.shadowed()[0].message, "1");
}

#[test]
fn empty_body_has_no_cases() {
    assert!(parse_options("").is_empty());
    assert!(parse_options("   \n ").is_empty());
}

#[test]
fn clean_template_passes() {
    let warnings = check("Hi {name}, {n, plural, =0 {none} one {# item} other {# items}}")
        .expect("no errors");
    assert!(warnings.is_empty(), "{:?}", messages(&warnings));
}

#[test]
fn missing_other_is_a_warning() {
    let warnings = check("{g, select, male {He}}").expect("only warnings");
    assert_eq!(messages(&warnings), vec!["`select` construct for `g` has no `other` case"]);
    assert!(warnings[0].is_warning());
    assert_eq!(warnings[0].span, 0..22);
}

#[test]
fn unterminated_construct_is_an_error() {
    let errors = check("ok\n{n, plural, one {x} other {y}").expect_err("error");
    assert_eq!(messages(&errors), vec!["unterminated `plural` construct"]);
    assert_eq!(errors[0].span.start, 3);
}

#[test]
fn stray_braces_are_errors() {
    let errors = check("a } b").expect_err("error");
    assert_eq!(messages(&errors), vec!["unmatched closing brace"]);
    assert_eq!(errors[0].span, 2..3);

    let errors = check("a { b").expect_err("error");
    assert_eq!(messages(&errors), vec!["unclosed brace"]);
}

#[test]
fn dangling_label_is_an_error() {
    let src = "{n, plural, one {x} oops}";
    let errors = check(src).expect_err("error");
    let dangling = errors
        .iter()
        .find(|e| e.message.contains("expected `{`"))
        .expect("dangling label error");
    assert_eq!(&src[dangling.span.clone()], "oops");
}

#[test]
fn invalid_exact_label_is_an_error() {
    let src = "{n, plural, =x {a} other {b}}";
    let errors = check(src).expect_err("error");
    assert_eq!(messages(&errors), vec!["invalid exact-match label `=x`"]);
    assert_eq!(&src[errors[0].span.clone()], "=x");
}

#[test]
fn unreachable_labels_are_warnings() {
    let warnings = check("{n, plural, few {a} other {b}}").expect("only warnings");
    assert_eq!(messages(&warnings), vec!["case `few` is never selected by `plural`"]);

    let warnings = check("{n, selectordinal, =1 {a} other {b}}").expect("only warnings");
    assert_eq!(messages(&warnings), vec!["case `=1` is never selected by `selectordinal`"]);
}

#[test]
fn duplicate_label_is_a_warning() {
    let src = "{g, select, a {1} a {2} other {3}}";
    let warnings = check(src).expect("only warnings");
    assert_eq!(messages(&warnings), vec!["duplicate case label `a`"]);
    assert_eq!(warnings[0].span, 12..13);
    assert_eq!(warnings[0].related[0].0, 18..19);
}

#[test]
fn unknown_keyword_is_a_warning() {
    let src = "{n, number}";
    let warnings = check(src).expect("only warnings");
    assert_eq!(messages(&warnings), vec!["unrecognised construct type `number`"]);
    assert_eq!(&src[warnings[0].span.clone()], "number");
}

#[test]
fn nested_diagnostics_map_to_template_offsets() {
    let src = "{n, plural, other {{g, select, a {x}}}}";
    let warnings = check(src).expect("only warnings");
    assert_eq!(messages(&warnings), vec!["`select` construct for `g` has no `other` case"]);
    assert_eq!(&src[warnings[0].span.clone()], "{g, select, a {x}}");
}

#[test]
fn placeholder_whitespace_is_a_warning() {
    let warnings = check("Hi { name }").expect("only warnings");
    assert_eq!(messages(&warnings), vec!["placeholder `{name}` contains surrounding whitespace"]);
}

#[test]
fn diagnostics_convert_for_display() {
    let warnings = check("{g, select, a {1} a {2} other {3}}").expect("only warnings");
    let diagnostic = warnings[0].to_diagnostic();
    assert_eq!(diagnostic.message, "duplicate case label `a`");
    assert_eq!(diagnostic.labels.len(), 2);
}

#[test]
fn known_keyword_without_cases_is_a_warning() {
    let src = "[{n, plural}]";
    let warnings = check(src).expect("only warnings");
    assert_eq!(messages(&warnings), vec!["`plural` construct for `n` has no cases"]);
    assert_eq!(&src[warnings[0].span.clone()], "{n, plural}");
    assert!(warnings[0].notes[0].contains("printed literally"));
}

#[test]
fn diagnostics_carry_notes() {
    let errors = check("{n, plural, one {x} other {y}").expect_err("error");
    assert_eq!(errors[0].notes, vec!["the construct is printed literally"]);

    let warnings = check("{n, plural, few {a} other {b}}").expect("only warnings");
    assert_eq!(warnings[0].notes, vec!["`plural` only selects `=n`, `one` and `other`"]);
}

#[test]
fn builders_attach_notes_and_related_spans() {
    let error = ParseError::warning("w", 0..1, 3)
        .with_note("first")
        .with_related(4..5, "there");
    assert!(error.is_warning());
    assert_eq!(error.notes, vec!["first"]);
    assert_eq!(error.related, vec![(4..5, "there".to_string())]);
    assert_eq!(error.to_diagnostic().labels.len(), 2);
}

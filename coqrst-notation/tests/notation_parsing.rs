//! End-to-end parsing of real tactic notations

use coqrst_notation::{parse_notation, Node, NotationError, RepeatKind};
use rstest::rstest;

#[rstest]
#[case("apply {+, @term with {+ (@id := @val) } } in {+, @hyp }")]
#[case("Global Arguments qualid {+ @name%@scope}.")]
#[case("{? simple} apply {+, @term {? with @bindings_list}} in @ident {? as @intro_pattern}")]
#[case("set (@ident {+ @binder} := @term) in {+ @hyp}")]
#[case("unfold {+, @qualid at {+, num}}")]
#[case("generalize {+, @term at {+ @num} as @ident}")]
fn parses_reference_notations(#[case] source: &str) {
    let notation = parse_notation(source).expect("reference notation should parse");
    assert!(!notation.children.is_empty());
}

#[rstest]
#[case("{+ @x")]
#[case("@x }")]
#[case("{ a {+ b }")]
#[case("}")]
fn rejects_unbalanced_groups(#[case] source: &str) {
    assert!(matches!(
        parse_notation(source),
        Err(NotationError::Parse(_))
    ));
}

#[rstest]
#[case("@")]
#[case("rewrite @ in H")]
#[case("{+ @ }")]
fn rejects_bare_sigils(#[case] source: &str) {
    assert!(matches!(parse_notation(source), Err(NotationError::Lex(_))));
}

#[test]
fn bindings_list_expands_to_a_repeat() {
    let notation = parse_notation("with @bindings_list").unwrap();
    assert!(matches!(
        notation.children.last(),
        Some(Node::Repeat {
            repeat: RepeatKind::OneOrMore,
            separator: None,
            ..
        })
    ));
    assert_eq!(notation.holes(), vec!["id", "val"]);
}

#[test]
fn serializes_to_tagged_json() {
    let notation = parse_notation("{? simple} @term").unwrap();
    let json = serde_json::to_value(&notation).unwrap();
    assert_eq!(json["children"][0]["kind"], "repeat");
    assert_eq!(json["children"][0]["repeat"], "optional");
    assert_eq!(json["children"][0]["separator"], serde_json::Value::Null);
    assert_eq!(json["children"][2]["kind"], "hole");
    assert_eq!(json["children"][2]["name"], "term");
}

#[test]
fn error_messages_cite_byte_offsets() {
    insta::assert_snapshot!(
        parse_notation("a } b").unwrap_err().to_string(),
        @"parse error: unexpected '}' at byte 2"
    );
    insta::assert_snapshot!(
        parse_notation("rewrite @ in H").unwrap_err().to_string(),
        @r#"lexing error: unrecognized input "@" at byte 8"#
    );
}

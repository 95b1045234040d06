//! Property-based tests for the notation lexer and parser
//!
//! Notations are generated from balanced fragments, so every generated string is
//! well-formed and must lex, parse and survive an unparse/parse cycle.

use coqrst_notation::lexing::tokenize;
use coqrst_notation::parsing::parse;
use coqrst_notation::substitution::substitute;
use proptest::prelude::*;

fn fragment() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        "[a-z:=(),|.]{1,4}",
        "@[a-z_]{1,6}",
        "[ \t]{1,3}",
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            prop_oneof![Just("{"), Just("{?"), Just("{+"), Just("{*"), Just("{+,")],
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(open, parts)| format!("{}{}}}", open, parts.concat()))
    })
}

fn notation_source() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..6).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn tokens_cover_the_input(source in notation_source()) {
        let tokens = tokenize(&source).expect("generated notation should lex");
        let rebuilt: String = tokens.iter().map(|(_, span)| &source[span.clone()]).collect();
        prop_assert_eq!(rebuilt, source);
    }

    #[test]
    fn token_spans_are_contiguous(source in notation_source()) {
        let tokens = tokenize(&source).expect("generated notation should lex");
        let mut expected_start = 0;
        for (_, span) in &tokens {
            prop_assert_eq!(span.start, expected_start);
            expected_start = span.end;
        }
        prop_assert_eq!(expected_start, source.len());
    }

    #[test]
    fn unparse_round_trips(source in notation_source()) {
        let notation = parse(&source).expect("generated notation should parse");
        let reparsed = parse(&notation.unparse()).expect("unparsed notation should parse");
        prop_assert_eq!(reparsed, notation);
    }

    #[test]
    fn substitution_is_idempotent(source in "[a-z @_{}+,]{0,40}") {
        let once = substitute(&source);
        prop_assert_eq!(substitute(&once), once);
    }
}

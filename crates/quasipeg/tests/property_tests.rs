//! Property-based tests for the universal engine guarantees.

use proptest::prelude::*;

use quasipeg::{
    tokenize, Element, ParseConfig, Parser, RuleSet, Template, TokenPattern, Value,
};
use std::sync::Arc;

/// Fragments drawn from the accepted token alphabet. Concatenations of
/// these stay inside the alphabet, though adjacent fragments may fuse
/// into fewer tokens.
fn alphabet_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z_][a-zA-Z0-9_]{0,6}",
        "[0-9]{1,5}",
        "[ \t\n]{1,3}",
        "[+*=<>./-]{1,3}",
        Just("(".to_string()),
        Just(")".to_string()),
        Just(";".to_string()),
        Just(",".to_string()),
    ]
}

proptest! {
    /// Tokenization totality: for alphabet-only input, the concatenated
    /// token texts reproduce the segment exactly.
    #[test]
    fn tokenization_is_total_over_the_alphabet(
        fragments in prop::collection::vec(alphabet_fragment(), 0..40)
    ) {
        let source: String = fragments.concat();
        let stream = tokenize(&[source.as_str()], TokenPattern::default_pattern()).unwrap();
        let mut rebuilt = String::new();
        let mut next = 0;
        for element in &stream {
            let token = element.as_token().expect("single segment has no holes");
            prop_assert_eq!(token.pos.start, next, "contiguous spans");
            next = token.pos.end;
            rebuilt.push_str(token.text());
        }
        prop_assert_eq!(rebuilt, source);
    }

    /// Hole placement: a template of `n + 1` segments yields exactly `n`
    /// hole markers, each equal to its own gap index, in order.
    #[test]
    fn holes_appear_once_per_gap(
        segments in prop::collection::vec("[a-z ]{0,8}", 1..6)
    ) {
        let stream = tokenize(&segments, TokenPattern::default_pattern()).unwrap();
        let holes: Vec<u32> = stream.iter().filter_map(Element::hole).collect();
        let expected: Vec<u32> = (0..segments.len() as u32 - 1).collect();
        prop_assert_eq!(holes, expected);
    }

    /// Memoization equivalence: disabling the cache changes counters,
    /// never results.
    #[test]
    fn memoization_does_not_change_results(
        idents in prop::collection::vec("[a-z]{1,6}", 1..8)
    ) {
        let grammar: Template<quasipeg::Action> =
            Template::from_source(r#" list ::= IDENT ** "," ; "#);
        let rules = Arc::new(RuleSet::compile(&grammar).unwrap());
        let memoized = Parser::with_config(
            rules.clone(),
            ParseConfig { memoize: true, debug: false },
        );
        let unmemoized = Parser::with_config(
            rules,
            ParseConfig { memoize: false, debug: false },
        );

        let input = Template::from_source(idents.join(" , "));
        let (a, on) = memoized.parse_with_metrics(&input).unwrap();
        let (b, off) = unmemoized.parse_with_metrics(&input).unwrap();

        prop_assert_eq!(&a, &b);
        prop_assert_eq!(off.memo.hits, 0);
        let expected: Vec<Value> = idents.iter().map(|s| Value::str(s.as_str())).collect();
        prop_assert_eq!(a, Value::Seq(expected));
    }

    /// Ordered choice: when two alternatives match the same input, the
    /// first one's action decides the result.
    #[test]
    fn ordered_choice_takes_the_first_alternative(word in "[a-z]{1,6}") {
        let grammar = Template::builder()
            .text(" start ::= IDENT ")
            .hole(quasipeg::action(|_| Value::str("first")))
            .text(" / IDENT ")
            .hole(quasipeg::action(|_| Value::str("second")))
            .text(" ; ")
            .build();
        let parser = RuleSet::compile(&grammar).unwrap().into_parser();
        prop_assert_eq!(parser.parse_source(&word).unwrap(), Value::str("first"));
    }

    /// EOF discipline: trailing unconsumed tokens always fail the parse.
    #[test]
    fn trailing_tokens_always_fail(word in "[a-z]{1,6}") {
        let grammar: Template<quasipeg::Action> =
            Template::from_source(" start ::= IDENT ; ");
        let parser = RuleSet::compile(&grammar).unwrap().into_parser();
        prop_assert!(parser.parse_source(&word).is_ok());
        let doubled = format!("{} {}", word, word);
        prop_assert!(parser.parse_source(&doubled).is_err());
    }
}

//! End-to-end tests for the packrat engine: sequencing, ordered choice,
//! repetition, holes, memoization, and the error contract.

use std::sync::Arc;

use quasipeg::{
    action, GrammarError, ParseConfig, ParseError, Parser, RuleSet, Template, Value,
};

fn parser_for(grammar: &Template<quasipeg::Action>) -> Parser {
    RuleSet::compile(grammar)
        .expect("grammar compiles")
        .into_parser()
}

fn strs(texts: &[&str]) -> Value {
    Value::Seq(texts.iter().map(|t| Value::str(*t)).collect())
}

#[test]
fn sequence_with_action() {
    let grammar = Template::builder()
        .text(r#" start ::= "a" "b" "#)
        .hole(action(|_| Value::str("ok")))
        .text(" ; ")
        .build();
    let parser = parser_for(&grammar);

    assert_eq!(parser.parse_source("a b").unwrap(), Value::str("ok"));

    let err = parser.parse_source("a").unwrap_err();
    match err {
        ParseError::Syntax(syntax) => {
            assert_eq!(syntax.pos, 1, "failure is just after the `a` token");
            assert!(syntax.found.is_none());
            assert!(syntax.expected.contains(&"\"b\"".to_string()));
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn separated_list_disallows_trailing_separator() {
    let grammar: Template<quasipeg::Action> =
        Template::from_source(r#" list ::= IDENT ** "," ; "#);
    let parser = parser_for(&grammar);

    assert_eq!(
        parser.parse_source("x , y , z").unwrap(),
        strs(&["x", "y", "z"])
    );
    assert_eq!(parser.parse_source("x").unwrap(), strs(&["x"]));
    assert!(parser.parse_source("x,").is_err());
}

#[test]
fn hole_is_matched_and_substituted() {
    let grammar = Template::builder()
        .text(r#" start ::= "[" HOLE "]" "#)
        .hole(action(|vals| vals[1].clone()))
        .text(" ; ")
        .build();
    let parser = parser_for(&grammar);

    let input = Template::builder()
        .text("[ ")
        .hole(Value::str("payload"))
        .text(" ]")
        .build();
    assert_eq!(parser.parse(&input).unwrap(), Value::str("payload"));
}

fn fold(vals: &[Value]) -> Value {
    let mut acc = vals[0].clone();
    if let Some(rest) = vals[1].as_seq() {
        for pair in rest {
            let pair = pair.as_seq().expect("operator/operand pair");
            acc = Value::seq(vec![pair[0].clone(), acc, pair[1].clone()]);
        }
    }
    acc
}

fn arith_grammar() -> Template<quasipeg::Action> {
    Template::builder()
        .text(r#" expr ::= term (("+" / "-") term)* "#)
        .hole(action(fold))
        .text(" ; term ::= NUMBER ; ")
        .build()
}

#[test]
fn binary_operators_left_fold() {
    let parser = parser_for(&arith_grammar());
    assert_eq!(
        parser.parse_source("1 + 2 + 3").unwrap(),
        Value::seq(vec![
            Value::str("+"),
            Value::seq(vec![Value::str("+"), Value::str("1"), Value::str("2")]),
            Value::str("3"),
        ])
    );
}

#[test]
fn failure_points_at_the_offending_token() {
    let parser = parser_for(&arith_grammar());
    let err = parser.parse_source("1 + * 3").unwrap_err();
    match err {
        ParseError::Syntax(syntax) => {
            let found = syntax.found.expect("failure lands on a real token");
            assert_eq!(found.text(), "*");
            assert!(syntax.expected.contains(&"NUMBER".to_string()));
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn direct_left_recursion_is_detected() {
    let grammar: Template<quasipeg::Action> =
        Template::from_source(r#" a ::= a "x" / "x" ; "#);
    let parser = parser_for(&grammar);
    let err = parser.parse_source("x x").unwrap_err();
    assert_eq!(err.to_string(), "Left recursion on rule: a");
    assert!(matches!(
        err,
        ParseError::Grammar(GrammarError::LeftRecursion(_))
    ));
}

#[test]
fn indirect_left_recursion_is_detected() {
    let grammar: Template<quasipeg::Action> =
        Template::from_source(r#" a ::= b "x" / "y" ; b ::= a ; "#);
    let parser = parser_for(&grammar);
    let err = parser.parse_source("y x").unwrap_err();
    assert!(matches!(
        err,
        ParseError::Grammar(GrammarError::LeftRecursion(_))
    ));
}

#[test]
fn missing_rule_is_reported_at_run_time() {
    let grammar: Template<quasipeg::Action> = Template::from_source(" start ::= nope ; ");
    let parser = parser_for(&grammar);
    let err = parser.parse_source("x").unwrap_err();
    assert_eq!(err.to_string(), "Rule missing: nope");
}

#[test]
fn ordered_choice_prefers_the_first_match() {
    let grammar = Template::builder()
        .text(r#" start ::= "ab" "#)
        .hole(action(|_| Value::str("first")))
        .text(r#" / "ab" "#)
        .hole(action(|_| Value::str("second")))
        .text(" ; ")
        .build();
    let parser = parser_for(&grammar);
    assert_eq!(parser.parse_source("ab").unwrap(), Value::str("first"));
}

#[test]
fn trailing_tokens_fail_the_parse() {
    let grammar: Template<quasipeg::Action> = Template::from_source(r#" start ::= "a" ; "#);
    let parser = parser_for(&grammar);
    assert_eq!(parser.parse_source("a").unwrap(), Value::str("a"));
    assert!(parser.parse_source("a a").is_err());
}

#[test]
fn whitespace_and_comments_are_skipped() {
    let grammar = Template::builder()
        .text(r#" start ::= "a" "b" "#)
        .hole(action(|vals| Value::Seq(vals.to_vec())))
        .text(" ; ")
        .build();
    let parser = parser_for(&grammar);
    assert_eq!(
        parser.parse_source("a # comment\n  b").unwrap(),
        strs(&["a", "b"])
    );
}

#[test]
fn keywords_are_rejected_by_ident() {
    // `while` appears as a literal, so IDENT must refuse it even though
    // the production using it never runs.
    let grammar: Template<quasipeg::Action> =
        Template::from_source(r#" start ::= IDENT ; dead ::= "while" ; "#);
    let parser = parser_for(&grammar);
    assert_eq!(parser.parse_source("foo").unwrap(), Value::str("foo"));
    assert!(parser.parse_source("while").is_err());
}

#[test]
fn keyword_literal_still_matches_as_literal() {
    let grammar: Template<quasipeg::Action> =
        Template::from_source(r#" start ::= IDENT / kw ; kw ::= "while" ; "#);
    let parser = parser_for(&grammar);
    assert_eq!(parser.parse_source("while").unwrap(), Value::str("while"));
}

#[test]
fn repeated_parses_agree() {
    let parser = parser_for(&arith_grammar());
    let first = parser.parse_source("1 + 2 - 3").unwrap();
    let second = parser.parse_source("1 + 2 - 3").unwrap();
    assert_eq!(first, second);
}

#[test]
fn disabling_memoization_changes_counters_not_results() {
    let grammar: Template<quasipeg::Action> =
        Template::from_source(r#" start ::= item "x" / item "y" ; item ::= NUMBER ; "#);
    let rules = Arc::new(RuleSet::compile(&grammar).unwrap());
    let memoized = Parser::with_config(
        rules.clone(),
        ParseConfig {
            memoize: true,
            debug: false,
        },
    );
    let unmemoized = Parser::with_config(
        rules,
        ParseConfig {
            memoize: false,
            debug: false,
        },
    );

    let input = Template::from_source("1 y");
    let (with_memo, on) = memoized.parse_with_metrics(&input).unwrap();
    let (without_memo, off) = unmemoized.parse_with_metrics(&input).unwrap();

    assert_eq!(with_memo, without_memo);
    // `item` at position 0 is re-used by the second alternative.
    assert!(on.memo.hits > 0);
    assert_eq!(off.memo.hits, 0);
    assert!(off.memo.misses > on.memo.misses);
}

#[test]
fn parser_exposes_its_rules_and_config() {
    let rules = Arc::new(RuleSet::compile(&arith_grammar()).unwrap());
    let parser = Parser::with_config(
        rules,
        ParseConfig {
            memoize: false,
            debug: false,
        },
    );
    assert_eq!(parser.rules().start_name(), "expr");
    assert_eq!(parser.rules().production_count(), 2);
    assert!(!parser.config().memoize);
    assert!(!parser.config().debug);

    let default_parser = RuleSet::compile(&arith_grammar()).unwrap().into_parser();
    assert!(default_parser.config().memoize);
    assert!(!default_parser.config().debug);
}

#[test]
fn debug_mode_does_not_change_results() {
    let rules = Arc::new(RuleSet::compile(&arith_grammar()).unwrap());
    let debug = Parser::with_config(
        rules,
        ParseConfig {
            memoize: true,
            debug: true,
        },
    );
    assert!(debug.parse_source("1 + 2").is_ok());
}

#[test]
fn parsers_share_a_rule_set_across_threads() {
    let rules = Arc::new(RuleSet::compile(&arith_grammar()).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let parser = Parser::new(rules.clone());
            std::thread::spawn(move || parser.parse_source("1 + 2 + 3").unwrap())
        })
        .collect();
    let mut results: Vec<Value> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    results.dedup();
    assert_eq!(results.len(), 1);
}

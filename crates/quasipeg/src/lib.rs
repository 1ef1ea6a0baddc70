//! # Quasipeg
//!
//! A packrat-memoized PEG engine for grammars embedded in templates, where
//! interpolation holes are first-class terminals.
//!
//! ## Overview
//!
//! Quasipeg parses *templates*: sequences of raw text segments with typed
//! holes between them. A grammar is itself a template whose segments hold
//! a small BNF-like language and whose holes are semantic actions; the
//! compiled grammar then parses input templates whose holes are values.
//! The engine provides:
//!
//! - **Tokenization over segments**: each segment is lexed with a sticky
//!   capturing regex, and a hole marker is threaded between segments
//! - **Packrat execution**: per-parse memoization of every `(position,
//!   rule)` attempt, probe-based left-recursion detection, and a
//!   furthest-failure tracker for diagnostics
//! - **A BNF compiler**: ordered choice, sequences, repetition (including
//!   separated repetition `a ** b` / `a ++ b`), option, grouping, string
//!   literals, builtin terminals, and per-alternative semantic actions
//! - **A parser surface**: the compiled grammar binds to a [`Parser`]
//!   that lexes, parses, enforces EOF, and substitutes hole values into
//!   the result
//!
//! ## Quick Start
//!
//! ```rust
//! use quasipeg::{action, RuleSet, Template, Value};
//!
//! // `start ::= "[" IDENT "]" ${pick} ;` with the action interpolated as
//! // a template hole.
//! let grammar = Template::builder()
//!     .text(r#" start ::= "[" IDENT "]" "#)
//!     .hole(action(|vals| vals[1].clone()))
//!     .text(" ; ")
//!     .build();
//!
//! let rules = RuleSet::compile(&grammar)?;
//! let parser = rules.into_parser();
//! assert_eq!(parser.parse_source("[foo]")?, Value::str("foo"));
//!
//! // The grammar did not match: a syntax error names the furthest
//! // failure and what was expected there.
//! assert!(parser.parse_source("[foo").is_err());
//! # Ok::<(), quasipeg::ParseError>(())
//! ```
//!
//! ## Modules
//!
//! - [`template`] - Templates and the template builder
//! - [`lexer`] - Segment tokenization, the token model, and the regex kit
//! - [`grammar`] - The BNF compiler and compiled rule-sets
//! - [`parser`] - The packrat substrate and the parse surface
//! - [`value`] - Semantic values and actions
//! - [`error`] - Error types
//! - [`intern`] - Rule-name interning

pub mod error;
pub mod grammar;
pub mod intern;
pub mod lexer;
pub mod parser;
pub mod template;
pub mod value;

pub use error::{
    GrammarError, LexError, LexErrorKind, ParseError, PatternError, SyntaxError, TemplateError,
};
pub use grammar::{Builtin, KeywordSet, RuleSet};
pub use lexer::token::{Element, Position, Token};
pub use lexer::{tokenize, TokenPattern};
pub use parser::{MemoStats, ParseConfig, ParseMetrics, Parser, RuleResult};
pub use template::{Template, TemplateBuilder, HOLE_GLYPH};
pub use value::{action, Action, Value};

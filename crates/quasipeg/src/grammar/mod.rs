//! # Grammar
//!
//! Compiled rule-sets and the BNF compiler that produces them.
//!
//! ## Overview
//!
//! A grammar is written as a [`Template`] whose segments hold productions
//! in a small BNF-like language and whose holes are the semantic
//! [`Action`]s to attach:
//!
//! ```text
//! name ::= body ;          one production; the first one is the start rule
//! a / b                    ordered choice, first match wins
//! "lit"                    consume a token whose text equals `lit`
//! RULE                     invoke a production or a builtin terminal
//! ( body )                 grouping
//! x*  x+  x?               repetition and option
//! a ** b   a ++ b          `a`s separated by `b`s (zero- / one-or-more)
//! ${action}                trailing hole: the alternative's action
//! ```
//!
//! Builtin terminal names are `SPACE`, `COMMENT`, `NUMBER`, `STRING`,
//! `IDENT`, `HOLE`, and `EOF`. String literals that look like identifiers
//! are collected into the reserved keyword set, which `IDENT` refuses to
//! match. A hole that is not in trailing position is matched as an input
//! hole, exactly like the `HOLE` terminal.
//!
//! [`RuleSet::compile`] tokenizes the grammar with the same lexer used for
//! inputs (so action holes are first-class tokens of the grammar source)
//! and parses it with a bootstrap PEG.

pub(crate) mod compile;
pub(crate) mod expr;

pub use expr::Builtin;

use compact_str::CompactString;
use hashbrown::{HashMap, HashSet};

use crate::error::ParseError;
use crate::intern::{NameId, Names};
use crate::parser::driver::Parser;
use crate::template::Template;
use crate::value::Action;

/// Reserved keywords of a compiled grammar.
pub type KeywordSet = HashSet<CompactString, ahash::RandomState>;

/// An immutable, named collection of rule procedures with one designated
/// start rule.
///
/// Produced by [`RuleSet::compile`]; immutable afterwards, so it may be
/// shared freely between parser instances and threads.
#[derive(Debug)]
pub struct RuleSet {
    pub(crate) productions: Vec<expr::Production>,
    pub(crate) by_name: HashMap<NameId, u32, ahash::RandomState>,
    pub(crate) names: Names,
    pub(crate) literals: Vec<CompactString>,
    pub(crate) actions: Vec<Action>,
    pub(crate) keywords: KeywordSet,
}

impl RuleSet {
    /// Compile a grammar template into a rule-set.
    ///
    /// # Errors
    ///
    /// Returns a lex error when the grammar source itself cannot be
    /// tokenized, or a grammar error when it does not follow the BNF DSL.
    pub fn compile(template: &Template<Action>) -> Result<Self, ParseError> {
        compile::compile(template)
    }

    /// Bind this rule-set to a parser with the default configuration.
    #[must_use]
    pub fn into_parser(self) -> Parser {
        Parser::new(std::sync::Arc::new(self))
    }

    /// Name of the start rule (the first production).
    #[must_use]
    pub fn start_name(&self) -> &str {
        self.names.resolve(self.productions[0].name)
    }

    #[must_use]
    pub fn production_count(&self) -> usize {
        self.productions.len()
    }

    /// Whether `word` is reserved by the grammar's identifier-shaped
    /// literals.
    #[must_use]
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(word)
    }

    pub(crate) fn production_name(&self, index: u32) -> &str {
        self.names.resolve(self.productions[index as usize].name)
    }

    pub(crate) fn literal(&self, id: u32) -> &str {
        self.literals[id as usize].as_str()
    }

    pub(crate) fn resolve_name(&self, id: NameId) -> &str {
        self.names.resolve(id)
    }
}

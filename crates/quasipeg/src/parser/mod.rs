//! # Parser
//!
//! The packrat execution substrate and the evaluation engine for compiled
//! rule-sets.
//!
//! ## Overview
//!
//! A parse invocation is a self-contained computation: it owns its token
//! stream, memo table, and counters for the duration of the call, and no
//! state survives the call except the immutable compiled grammar. Every
//! rule and terminal pattern goes through the substrate's `run`, which
//! consults the memo table, installs a left-recursion probe, dispatches,
//! and stores the result. Failures travel as [`RuleResult::Failure`]
//! values; only lexical errors, grammar-use errors, and the final syntax
//! error escape as Rust errors.

pub mod driver;
pub(crate) mod memo;
pub(crate) mod scanner;

pub use driver::{ParseConfig, ParseMetrics, Parser};
pub use memo::{MemoStats, RuleResult};

use crate::error::{GrammarError, ParseError};
use crate::grammar::expr::{Alternative, BnfExpr, Builtin};
use crate::grammar::RuleSet;
use crate::lexer::token::Element;
use crate::value::Value;
use memo::{Begin, MemoEntry, MemoKey, MemoTable};

/// Per-parse state: the stream, the memo, and a borrow of the compiled
/// rules.
pub(crate) struct ParseCtx<'g> {
    pub(crate) rules: &'g RuleSet,
    pub(crate) stream: Vec<Element>,
    pub(crate) memo: MemoTable,
    pub(crate) config: ParseConfig,
}

impl<'g> ParseCtx<'g> {
    pub(crate) fn new(rules: &'g RuleSet, stream: Vec<Element>, config: ParseConfig) -> Self {
        Self {
            rules,
            stream,
            memo: MemoTable::new(),
            config,
        }
    }

    /// Run a rule or terminal pattern at `pos` through the memo table.
    ///
    /// # Errors
    ///
    /// Raises [`GrammarError::LeftRecursion`] when `(pos, key)` is already
    /// being evaluated, and [`GrammarError::RuleMissing`] for references
    /// to undefined rules. The memo is not repaired after either error.
    pub(crate) fn run(&mut self, key: MemoKey, pos: usize) -> Result<RuleResult, ParseError> {
        if self.config.debug {
            log::trace!("run {} at {pos}", self.key_name(key));
        }
        match self.memo.begin(pos, key) {
            Begin::Hit(result) => Ok(result),
            Begin::LeftRecursion => Err(GrammarError::LeftRecursion(self.key_name(key)).into()),
            Begin::Started => {
                let result = self.dispatch(key, pos)?;
                if let RuleResult::Failure { pos: failed_at } = &result {
                    let failed_at = *failed_at;
                    if let Some(name) = self.pattern_name(key) {
                        self.memo.record_failure(failed_at, &name);
                    }
                }
                self.memo.finish(pos, key, &result, self.config.memoize);
                Ok(result)
            }
        }
    }

    fn dispatch(&mut self, key: MemoKey, pos: usize) -> Result<RuleResult, ParseError> {
        match key {
            MemoKey::Space => Ok(self.skip_one(pos, crate::lexer::space_re())),
            MemoKey::Comment => Ok(self.skip_one(pos, crate::lexer::comment_re())),
            MemoKey::Number => self.eat_regex(pos, crate::lexer::number_re()),
            MemoKey::String => self.eat_regex(pos, crate::lexer::string_re()),
            MemoKey::Ident => self.rule_ident(pos),
            MemoKey::Hole => self.rule_hole(pos),
            MemoKey::Eof => self.rule_eof(pos),
            MemoKey::Literal(id) => self.eat_literal(pos, id),
            MemoKey::Production(index) => self.eval_production(index, pos),
        }
    }

    fn eval_production(&mut self, index: u32, pos: usize) -> Result<RuleResult, ParseError> {
        let rules = self.rules;
        let production = &rules.productions[index as usize];
        self.eval_body(&production.body, pos)
    }

    /// Ordered choice: the first non-failing alternative wins. The
    /// failure position is the furthest any alternative advanced.
    fn eval_body(&mut self, body: &'g [Alternative], pos: usize) -> Result<RuleResult, ParseError> {
        let mut worst = pos;
        for alt in body {
            match self.eval_alt(alt, pos)? {
                success @ RuleResult::Success { .. } => return Ok(success),
                RuleResult::Failure { pos: failed } => worst = worst.max(failed),
            }
        }
        Ok(RuleResult::Failure { pos: worst })
    }

    /// A sequence fails as soon as any atom fails. Without an action, a
    /// single-atom alternative yields its atom's value and a longer one
    /// yields the sequence of values.
    fn eval_alt(&mut self, alt: &'g Alternative, pos: usize) -> Result<RuleResult, ParseError> {
        let rules = self.rules;
        let mut values = Vec::with_capacity(alt.atoms.len());
        let mut cur = pos;
        for atom in &alt.atoms {
            match self.eval_atom(atom, cur)? {
                RuleResult::Success { pos: next, value } => {
                    values.push(value);
                    cur = next;
                }
                failure @ RuleResult::Failure { .. } => return Ok(failure),
            }
        }
        let value = match alt.action {
            Some(index) => rules.actions[index as usize].apply(&values),
            None if values.len() == 1 => values.swap_remove(0),
            None => Value::Seq(values),
        };
        Ok(RuleResult::Success { pos: cur, value })
    }

    fn eval_atom(&mut self, expr: &'g BnfExpr, pos: usize) -> Result<RuleResult, ParseError> {
        match expr {
            BnfExpr::Lit(id) => self.run(MemoKey::Literal(*id), pos),
            BnfExpr::Builtin(builtin) => self.run(builtin_key(*builtin), pos),
            BnfExpr::Call(index) => self.run(MemoKey::Production(*index), pos),
            BnfExpr::Ref(name) => {
                Err(GrammarError::RuleMissing(self.rules.resolve_name(*name).to_string()).into())
            }
            BnfExpr::Group(body) => self.eval_body(body, pos),
            BnfExpr::Opt(inner) => match self.eval_atom(inner, pos)? {
                RuleResult::Success { pos: next, value } => Ok(RuleResult::Success {
                    pos: next,
                    value: Value::Seq(vec![value]),
                }),
                RuleResult::Failure { .. } => Ok(RuleResult::Success {
                    pos,
                    value: Value::Seq(Vec::new()),
                }),
            },
            BnfExpr::Star(inner) => self.eval_repeat(inner, pos, false),
            BnfExpr::Plus(inner) => self.eval_repeat(inner, pos, true),
            BnfExpr::Sep { item, sep, min_one } => self.eval_separated(item, sep, *min_one, pos),
        }
    }

    fn eval_repeat(
        &mut self,
        inner: &'g BnfExpr,
        pos: usize,
        min_one: bool,
    ) -> Result<RuleResult, ParseError> {
        let mut values = Vec::new();
        let mut cur = pos;
        loop {
            match self.eval_atom(inner, cur)? {
                RuleResult::Success { pos: next, value } => {
                    values.push(value);
                    let stalled = next == cur;
                    cur = next;
                    if stalled {
                        // zero-width match; repeating would never advance
                        break;
                    }
                }
                RuleResult::Failure { pos: failed } => {
                    if min_one && values.is_empty() {
                        return Ok(RuleResult::Failure { pos: failed });
                    }
                    break;
                }
            }
        }
        Ok(RuleResult::Success {
            pos: cur,
            value: Value::Seq(values),
        })
    }

    /// Separated repetition consumes the separator only between elements;
    /// a dangling separator is left in place.
    fn eval_separated(
        &mut self,
        item: &'g BnfExpr,
        sep: &'g BnfExpr,
        min_one: bool,
        pos: usize,
    ) -> Result<RuleResult, ParseError> {
        let mut values = Vec::new();
        let mut cur = pos;
        match self.eval_atom(item, cur)? {
            RuleResult::Success { pos: next, value } => {
                values.push(value);
                cur = next;
            }
            RuleResult::Failure { pos: failed } => {
                return if min_one {
                    Ok(RuleResult::Failure { pos: failed })
                } else {
                    Ok(RuleResult::Success {
                        pos,
                        value: Value::Seq(values),
                    })
                };
            }
        }
        loop {
            let checkpoint = cur;
            let RuleResult::Success { pos: after_sep, .. } = self.eval_atom(sep, cur)? else {
                break;
            };
            match self.eval_atom(item, after_sep)? {
                RuleResult::Success { pos: next, value } => {
                    values.push(value);
                    if next == checkpoint {
                        break;
                    }
                    cur = next;
                }
                RuleResult::Failure { .. } => {
                    cur = checkpoint;
                    break;
                }
            }
        }
        Ok(RuleResult::Success {
            pos: cur,
            value: Value::Seq(values),
        })
    }

    /// Printable identity of a memo key, for traces and errors.
    fn key_name(&self, key: MemoKey) -> String {
        match key {
            MemoKey::Space => "SPACE".to_string(),
            MemoKey::Comment => "COMMENT".to_string(),
            MemoKey::Number => "NUMBER".to_string(),
            MemoKey::String => "STRING".to_string(),
            MemoKey::Ident => "IDENT".to_string(),
            MemoKey::Hole => "HOLE".to_string(),
            MemoKey::Eof => "EOF".to_string(),
            MemoKey::Production(index) => self.rules.production_name(index).to_string(),
            MemoKey::Literal(id) => format!("{:?}", self.rules.literal(id)),
        }
    }

    /// Diagnostic name of a terminal pattern; rule procedures and the
    /// skip terminals name nothing useful and are excluded.
    fn pattern_name(&self, key: MemoKey) -> Option<String> {
        match key {
            MemoKey::Space | MemoKey::Comment | MemoKey::Production(_) => None,
            MemoKey::Number => Some("NUMBER".to_string()),
            MemoKey::String => Some("STRING".to_string()),
            MemoKey::Ident => Some("IDENT".to_string()),
            MemoKey::Hole => Some("HOLE".to_string()),
            MemoKey::Eof => Some("EOF".to_string()),
            MemoKey::Literal(id) => Some(format!("{:?}", self.rules.literal(id))),
        }
    }

    pub(crate) fn debug_dump(&self) {
        let stats = self.memo.stats();
        for ((pos, key), entry) in self.memo.entries() {
            match entry {
                MemoEntry::Done(RuleResult::Success { pos: next, .. }) => {
                    log::trace!("memo {} at {pos}: ok -> {next}", self.key_name(*key));
                }
                MemoEntry::Done(RuleResult::Failure { pos: next }) => {
                    log::trace!("memo {} at {pos}: FAIL at {next}", self.key_name(*key));
                }
                MemoEntry::InProgress => {
                    log::trace!("memo {} at {pos}: probe", self.key_name(*key));
                }
            }
        }
        log::debug!("packrat: {} hits, {} misses", stats.hits, stats.misses);
    }
}

const fn builtin_key(builtin: Builtin) -> MemoKey {
    match builtin {
        Builtin::Space => MemoKey::Space,
        Builtin::Comment => MemoKey::Comment,
        Builtin::Number => MemoKey::Number,
        Builtin::String => MemoKey::String,
        Builtin::Ident => MemoKey::Ident,
        Builtin::Hole => MemoKey::Hole,
        Builtin::Eof => MemoKey::Eof,
    }
}

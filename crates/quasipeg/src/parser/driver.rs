//! The template-tag surface of a compiled grammar.
//!
//! A [`Parser`] binds an immutable [`RuleSet`] to parse entry points.
//! Calling it with an input template lexes the segments, runs the start
//! rule at position 0 through a fresh packrat context, demands EOF, and
//! substitutes the template's hole values into the semantic result.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::ParseError;
use crate::grammar::RuleSet;
use crate::lexer::{self, TokenPattern};
use crate::parser::memo::{MemoKey, MemoStats, RuleResult};
use crate::parser::ParseCtx;
use crate::template::Template;
use crate::value::Value;

/// Parser-wide switches.
#[derive(Debug, Clone, Copy)]
pub struct ParseConfig {
    /// Reuse memoized rule results. Disabling keeps the left-recursion
    /// probe but re-evaluates every `(position, rule)` attempt.
    pub memoize: bool,
    /// Emit per-call traces and a final memo dump through `log`.
    pub debug: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            memoize: true,
            debug: false,
        }
    }
}

/// Measurements from one parse invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseMetrics {
    pub memo: MemoStats,
    /// Stream length: tokens plus hole markers.
    pub tokens: usize,
    pub parse_time: Duration,
}

/// A compiled grammar bound to a parse configuration.
///
/// The rule-set is shared behind an [`Arc`] and never mutated, so parsers
/// may be cloned and used concurrently; each parse owns its own stream
/// and memo.
#[derive(Debug, Clone)]
pub struct Parser {
    rules: Arc<RuleSet>,
    config: ParseConfig,
}

impl Parser {
    #[must_use]
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self::with_config(rules, ParseConfig::default())
    }

    #[must_use]
    pub const fn with_config(rules: Arc<RuleSet>, config: ParseConfig) -> Self {
        Self { rules, config }
    }

    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    #[must_use]
    pub const fn config(&self) -> ParseConfig {
        self.config
    }

    /// Parse an input template.
    ///
    /// # Errors
    ///
    /// Lexical errors, grammar-use errors (left recursion, missing
    /// rules), and syntax errors, per the engine's error contract.
    pub fn parse(&self, template: &Template<Value>) -> Result<Value, ParseError> {
        self.parse_with_metrics(template).map(|(value, _)| value)
    }

    /// Parse a hole-free source string.
    ///
    /// # Errors
    ///
    /// Same as [`Parser::parse`].
    pub fn parse_source(&self, source: &str) -> Result<Value, ParseError> {
        self.parse(&Template::from_source(source))
    }

    /// Parse and report memo counters and timing alongside the value.
    ///
    /// # Errors
    ///
    /// Same as [`Parser::parse`].
    pub fn parse_with_metrics(
        &self,
        template: &Template<Value>,
    ) -> Result<(Value, ParseMetrics), ParseError> {
        let started = Instant::now();
        let stream = lexer::tokenize(template.segments(), TokenPattern::default_pattern())?;
        let tokens = stream.len();
        let mut ctx = ParseCtx::new(&self.rules, stream, self.config);

        let mut accepted = None;
        if let RuleResult::Success { pos, value } = ctx.run(MemoKey::Production(0), 0)? {
            if ctx.run(MemoKey::Eof, pos)?.is_success() {
                accepted = Some(value);
            }
        }
        if self.config.debug {
            ctx.debug_dump();
        }

        match accepted {
            Some(value) => {
                let metrics = ParseMetrics {
                    memo: ctx.memo.stats(),
                    tokens,
                    parse_time: started.elapsed(),
                };
                Ok((value.substitute(template.holes()), metrics))
            }
            None => Err(ctx.syntax_error(&template.display()).into()),
        }
    }
}

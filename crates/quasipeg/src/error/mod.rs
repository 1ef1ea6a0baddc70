//! # Error Types
//!
//! Error types and diagnostics for grammar compilation, lexing, and parsing.
//!
//! ## Overview
//!
//! Four kinds of failure escape the engine:
//!
//! - [`LexError`]: a template segment contains bytes the token pattern
//!   cannot classify (or an internal boundary-skew bug was detected)
//! - [`GrammarError`]: grammar-use mistakes such as left recursion or a
//!   reference to an undefined rule
//! - [`SyntaxError`]: the grammar did not match the input; carries the
//!   furthest-advanced failure and the set of patterns expected there
//! - [`ParseError`]: the umbrella type returned by the public surface
//!
//! Within rule execution, failures are *values* that propagate through
//! ordered choice and sequencing; they never surface as a Rust error.
//!
//! ## Diagnostics Support
//!
//! When the `diagnostics` feature is enabled, errors integrate with
//! [`miette`] for rich error reporting.

use compact_str::CompactString;
use thiserror::Error;

use crate::lexer::token::{Position, Token};

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Umbrella error for the public parse and compile surfaces.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Lexical error with location information.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
#[error("{kind} at {pos}")]
pub struct LexError {
    pub pos: Position,
    #[source]
    pub kind: LexErrorKind,
}

/// Types of lexical errors.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum LexErrorKind {
    #[error("unclassifiable input {slice:?}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(quasipeg::lexer::unclassifiable)))]
    Unclassifiable { slice: CompactString },

    #[error("unterminated string literal")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(quasipeg::lexer::unterminated_string)))]
    UnterminatedString,

    /// The capturing group did not cover the whole sticky match. This is an
    /// internal invariant violation, not a user error.
    #[error("token boundary skew: capture ends at {capture_end}, match ends at {match_end}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(quasipeg::lexer::boundary_skew)))]
    BoundarySkew { capture_end: u32, match_end: u32 },
}

/// Programmer-facing grammar errors, raised during compilation or rule
/// execution.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum GrammarError {
    #[error("Left recursion on rule: {0}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(quasipeg::grammar::left_recursion)))]
    LeftRecursion(String),

    #[error("Rule missing: {0}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(quasipeg::grammar::rule_missing)))]
    RuleMissing(String),

    #[error("empty grammar: at least one production is required")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(quasipeg::grammar::empty)))]
    EmptyGrammar,

    #[error("grammar syntax error at {at}: {message}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(quasipeg::grammar::invalid)))]
    InvalidGrammar { at: String, message: String },
}

/// A regex source handed to the regex kit was unusable.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum PatternError {
    /// The source already carries a start anchor; the kit adds its own.
    #[error("pattern must not carry its own anchor: {0:?}")]
    Anchored(String),

    #[error("invalid pattern: {0}")]
    Bad(#[from] regex::Error),
}

/// A template was constructed with a segment/hole arity mismatch.
///
/// A template of `n` holes always has `n + 1` segments.
#[derive(Debug, Clone, Error)]
#[error("template needs segments = holes + 1 (got {segments} segments, {holes} holes)")]
pub struct TemplateError {
    pub segments: usize,
    pub holes: usize,
}

/// The grammar did not match the input.
///
/// Carries the stream position of the furthest-advanced failure, the token
/// found there (`None` when the failure is at end of input), and the set of
/// terminal patterns that were expected.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
#[cfg_attr(feature = "diagnostics", diagnostic(code(quasipeg::syntax)))]
#[error("{message}")]
pub struct SyntaxError {
    message: String,
    /// Stream index of the furthest failure.
    pub pos: usize,
    /// The offending token, if the failure was not at end of input.
    pub found: Option<Token>,
    /// Printable names of the terminal patterns expected at `pos`.
    pub expected: Vec<String>,
}

impl SyntaxError {
    /// Assemble a syntax error from its parts.
    ///
    /// `rendered` is the input template printed with one substitution glyph
    /// per hole; `after` is the last token before `pos` and is only used
    /// when `found` is `None`.
    #[must_use]
    pub fn new(
        rendered: &str,
        pos: usize,
        found: Option<Token>,
        after: Option<Token>,
        expected: Vec<String>,
    ) -> Self {
        let mut message = format!("syntax error in:\n{rendered}\n");
        match (&found, &after) {
            (Some(token), _) => message.push_str(&format!("Unexpected token {token}")),
            (None, Some(last)) => message.push_str(&format!("Unexpected EOF after {last}")),
            (None, None) => message.push_str("Unexpected EOF"),
        }
        if !expected.is_empty() {
            message.push_str(&format!("; expecting one of: {}", expected.join(" ")));
        }
        Self {
            message,
            pos,
            found,
            expected,
        }
    }
}

//! Base terminals over the token stream.
//!
//! The stream index is the position used throughout the engine. Every
//! consuming terminal first skips whitespace and comment tokens; hole
//! markers are never skipped, so interpolation gaps can only be consumed
//! by the `HOLE` terminal.

use regex::Regex;

use crate::error::{ParseError, SyntaxError};
use crate::lexer;
use crate::lexer::token::{Element, Position, Token};
use crate::parser::memo::{MemoKey, RuleResult};
use crate::parser::ParseCtx;
use crate::value::Value;

impl ParseCtx<'_> {
    pub(crate) fn element(&self, pos: usize) -> Option<&Element> {
        self.stream.get(pos)
    }

    /// Consume one token fully matching an anchored regex, yielding the
    /// empty string. Used for the SPACE and COMMENT terminals; does not
    /// skip first.
    pub(crate) fn skip_one(&self, pos: usize, re: &Regex) -> RuleResult {
        match self.element(pos) {
            Some(Element::Token(token)) if re.is_match(token.text()) => RuleResult::Success {
                pos: pos + 1,
                value: Value::str(""),
            },
            _ => RuleResult::Failure { pos },
        }
    }

    /// Advance over any mixture of whitespace and comment tokens. Never
    /// fails. Whitespace checks are too cheap to memoize; comment
    /// attempts go through the memo.
    pub(crate) fn skip(&mut self, mut pos: usize) -> Result<usize, ParseError> {
        loop {
            let is_space = matches!(
                self.element(pos),
                Some(Element::Token(token)) if lexer::space_re().is_match(token.text())
            );
            if is_space {
                pos += 1;
                continue;
            }
            if !matches!(self.element(pos), Some(Element::Token(_))) {
                break;
            }
            match self.run(MemoKey::Comment, pos)? {
                RuleResult::Success { pos: next, .. } => pos = next,
                RuleResult::Failure { .. } => break,
            }
        }
        Ok(pos)
    }

    /// Skip, then consume one token fully matching an anchored regex,
    /// yielding its text.
    pub(crate) fn eat_regex(&mut self, pos: usize, re: &Regex) -> Result<RuleResult, ParseError> {
        let pos = self.skip(pos)?;
        let matched = match self.element(pos) {
            Some(Element::Token(token)) if re.is_match(token.text()) => Some(token.text.clone()),
            _ => None,
        };
        Ok(match matched {
            Some(text) => RuleResult::Success {
                pos: pos + 1,
                value: Value::Str(text),
            },
            None => RuleResult::Failure { pos },
        })
    }

    /// Skip, then consume one token whose text equals the interned
    /// literal.
    pub(crate) fn eat_literal(&mut self, pos: usize, id: u32) -> Result<RuleResult, ParseError> {
        let rules = self.rules;
        let literal = rules.literal(id);
        let pos = self.skip(pos)?;
        let matched = match self.element(pos) {
            Some(Element::Token(token)) if token.text() == literal => Some(token.text.clone()),
            _ => None,
        };
        Ok(match matched {
            Some(text) => RuleResult::Success {
                pos: pos + 1,
                value: Value::Str(text),
            },
            None => RuleResult::Failure { pos },
        })
    }

    /// An identifier-shaped token that is not a reserved keyword.
    pub(crate) fn rule_ident(&mut self, pos: usize) -> Result<RuleResult, ParseError> {
        let rules = self.rules;
        let pos = self.skip(pos)?;
        let matched = match self.element(pos) {
            Some(Element::Token(token))
                if lexer::ident_re().is_match(token.text())
                    && !rules.keywords.contains(token.text()) =>
            {
                Some(token.text.clone())
            }
            _ => None,
        };
        Ok(match matched {
            Some(text) => RuleResult::Success {
                pos: pos + 1,
                value: Value::Str(text),
            },
            None => RuleResult::Failure { pos },
        })
    }

    /// A hole marker, yielding its index.
    pub(crate) fn rule_hole(&mut self, pos: usize) -> Result<RuleResult, ParseError> {
        let pos = self.skip(pos)?;
        Ok(match self.element(pos) {
            Some(Element::Hole(index)) => RuleResult::Success {
                pos: pos + 1,
                value: Value::Hole(*index),
            },
            _ => RuleResult::Failure { pos },
        })
    }

    /// End of stream, yielding the EOF sentinel without advancing.
    pub(crate) fn rule_eof(&mut self, pos: usize) -> Result<RuleResult, ParseError> {
        let pos = self.skip(pos)?;
        Ok(if pos == self.stream.len() {
            RuleResult::Success {
                pos,
                value: Value::Eof,
            }
        } else {
            RuleResult::Failure { pos }
        })
    }

    /// Assemble the syntax error for a failed parse from the furthest-
    /// failure tracker. `rendered` is the input template printed with
    /// hole glyphs.
    pub(crate) fn syntax_error(&self, rendered: &str) -> SyntaxError {
        let (pos, expected) = self.memo.last_failures();
        let found = match self.stream.get(pos) {
            Some(Element::Token(token)) => Some(token.clone()),
            Some(Element::Hole(index)) => Some(Token::new(
                format!("${index}"),
                Position::new(*index, 0, 0),
            )),
            None => None,
        };
        let after = self.stream[..pos.min(self.stream.len())]
            .iter()
            .rev()
            .find_map(Element::as_token)
            .cloned();
        let expected = expected.iter().map(|name| name.to_string()).collect();
        SyntaxError::new(rendered, pos, found, after, expected)
    }
}

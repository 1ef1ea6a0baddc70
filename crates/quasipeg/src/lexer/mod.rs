//! # Lexer
//!
//! Tokenizes the raw segments of a template into a single token stream,
//! interleaving a hole marker between each pair of adjacent segments.
//!
//! ## Overview
//!
//! Each segment is scanned with a sticky capturing regex: every match must
//! begin exactly where the previous one ended, and the capture group's text
//! becomes the lexeme. Whitespace runs and line comments are ordinary
//! tokens here; the scanner decides what to skip. Between segment `k` and
//! segment `k + 1` the stream carries [`Element::Hole`]`(k)`, so
//! interpolation gaps survive tokenization as first-class terminals.
//!
//! Input that the token pattern cannot classify is a [`LexError`] carrying
//! the offending slice and its [`Position`](token::Position).

pub mod rekit;
pub mod token;

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{LexError, LexErrorKind, PatternError};
use token::{Element, Position, Token};

/// Whitespace run.
pub const SPACE: &str = r"\s+";
/// Decimal number with optional fraction and exponent.
pub const NUMBER: &str = r"\d+(?:\.\d+)?(?:[eE]-?\d+)?";
/// Double-quoted JSON-style string.
pub const STRING: &str = r#""(?:[^"\\]|\\(?:["\\/bfnrt]|u[0-9a-fA-F]{4}))*""#;
/// Identifier.
pub const IDENT: &str = r"[a-zA-Z_$][a-zA-Z0-9_$]*";
/// Single-character punctuation.
pub const PUNCT: &str = r"[\[\](){},;]";
/// Non-empty run of operator characters.
pub const OPERATOR: &str = r"[:~@%&+=*<>.?|\\^/-]+";
/// Line comment, `#` to end of line.
pub const COMMENT: &str = r"#[^\n]*\n?";

/// The capturing token regex driving [`tokenize`].
///
/// The sources are alternated in order and wrapped in a single capture
/// group; the capture is the lexeme of each match.
#[derive(Debug, Clone)]
pub struct TokenPattern {
    sticky: rekit::Sticky,
}

impl TokenPattern {
    pub fn new<'a>(sources: impl IntoIterator<Item = &'a str>) -> Result<Self, PatternError> {
        let source = rekit::capture(&rekit::alternation(sources));
        Ok(Self {
            sticky: rekit::Sticky::new(&source)?,
        })
    }

    /// The default token alphabet.
    pub fn default_pattern() -> &'static Self {
        static PATTERN: OnceLock<TokenPattern> = OnceLock::new();
        PATTERN.get_or_init(|| {
            Self::new([SPACE, COMMENT, NUMBER, STRING, IDENT, PUNCT, OPERATOR])
                .expect("default token alphabet is a valid pattern")
        })
    }
}

macro_rules! anchored_terminal {
    ($name:ident, $source:expr) => {
        pub(crate) fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| rekit::anchored($source).expect("builtin terminal pattern"))
        }
    };
}

anchored_terminal!(space_re, SPACE);
anchored_terminal!(comment_re, COMMENT);
anchored_terminal!(number_re, NUMBER);
anchored_terminal!(string_re, STRING);
anchored_terminal!(ident_re, IDENT);

/// Tokenize template segments into a stream of tokens and hole markers.
///
/// # Errors
///
/// Returns a [`LexError`] when a segment contains input the pattern cannot
/// classify, or when the capture group fails to cover a whole match.
pub fn tokenize<S: AsRef<str>>(
    segments: &[S],
    pattern: &TokenPattern,
) -> Result<Vec<Element>, LexError> {
    let mut stream = Vec::new();
    let last = segments.len().saturating_sub(1);

    for (index, segment) in segments.iter().enumerate() {
        let segment = segment.as_ref();
        let segment_num = u32::try_from(index).unwrap_or(u32::MAX);
        let mut at = 0usize;

        while at < segment.len() {
            let start = u32::try_from(at).unwrap_or(u32::MAX);
            let Some(caps) = pattern.sticky.captures_at(segment, at) else {
                return Err(unclassifiable(&segment[at..], segment_num, start));
            };
            let whole_end = caps.get(0).map_or(at, |m| m.end());
            let Some(lexeme) = caps.get(1) else {
                return Err(unclassifiable(&segment[at..], segment_num, start));
            };
            if lexeme.end() != whole_end {
                return Err(LexError {
                    pos: Position::new(segment_num, start, start),
                    kind: LexErrorKind::BoundarySkew {
                        capture_end: u32::try_from(lexeme.end()).unwrap_or(u32::MAX),
                        match_end: u32::try_from(whole_end).unwrap_or(u32::MAX),
                    },
                });
            }
            let end = u32::try_from(lexeme.end()).unwrap_or(u32::MAX);
            stream.push(Element::Token(Token::new(
                lexeme.as_str(),
                Position::new(segment_num, start, end),
            )));
            at = lexeme.end();
        }

        if index < last {
            stream.push(Element::Hole(segment_num));
        }
    }

    Ok(stream)
}

fn unclassifiable(rest: &str, segment: u32, start: u32) -> LexError {
    let kind = if rest.starts_with('"') {
        LexErrorKind::UnterminatedString
    } else {
        let cut = rest
            .char_indices()
            .take_while(|(offset, ch)| *offset + ch.len_utf8() <= 24 && *ch != '\n')
            .map(|(offset, ch)| offset + ch.len_utf8())
            .last()
            .unwrap_or(0);
        LexErrorKind::Unclassifiable {
            slice: rest[..cut].into(),
        }
    };
    LexError {
        pos: Position::new(segment, start, start + rest.len() as u32),
        kind,
    }
}

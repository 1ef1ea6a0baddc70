//! Small kit for composing and applying regexes over segment text.
//!
//! The engine builds its token alphabet and terminal patterns from plain
//! regex sources. Sources handed to this kit must not carry their own
//! start anchors; the kit adds anchoring itself. Sticky matching (a match
//! required to begin at a caller-supplied offset) is emulated by searching
//! from the offset and rejecting any match that starts later, since the
//! `regex` crate has no native sticky flag.

use regex::Regex;

use crate::error::PatternError;

fn reject_anchored(source: &str) -> Result<(), PatternError> {
    if source.starts_with('^') || source.starts_with(r"\A") {
        return Err(PatternError::Anchored(source.to_string()));
    }
    Ok(())
}

/// Compile `source` so it only matches an entire candidate string.
pub fn anchored(source: &str) -> Result<Regex, PatternError> {
    reject_anchored(source)?;
    Ok(Regex::new(&format!(r"\A(?:{source})\z"))?)
}

/// Join regex sources into a single ordered alternation source.
///
/// Each input is wrapped in a non-capturing group so alternation order is
/// preserved; the host engine's leftmost-first semantics then make the
/// earliest matching branch win.
#[must_use]
pub fn alternation<'a>(sources: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for (i, source) in sources.into_iter().enumerate() {
        if i > 0 {
            out.push('|');
        }
        out.push_str("(?:");
        out.push_str(source);
        out.push(')');
    }
    out
}

/// Wrap a regex source in a single capturing group.
#[must_use]
pub fn capture(source: &str) -> String {
    format!("({source})")
}

/// A regex that must match starting exactly at a caller-supplied offset.
#[derive(Debug, Clone)]
pub struct Sticky {
    re: Regex,
}

impl Sticky {
    pub fn new(source: &str) -> Result<Self, PatternError> {
        reject_anchored(source)?;
        Ok(Self {
            re: Regex::new(source)?,
        })
    }

    /// Match at `at`, or return `None` if the earliest match in
    /// `text[at..]` does not begin exactly at `at`.
    #[must_use]
    pub fn captures_at<'t>(&self, text: &'t str, at: usize) -> Option<regex::Captures<'t>> {
        let caps = self.re.captures_at(text, at)?;
        let whole = caps.get(0)?;
        if whole.start() == at {
            Some(caps)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_regex(&self) -> &Regex {
        &self.re
    }
}

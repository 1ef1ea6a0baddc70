//! Packrat memoization and failure tracking.
//!
//! The memo table lives for a single parse invocation. Each `(position,
//! rule)` pair is evaluated at most once: a probe is installed before a
//! rule runs, so re-entry at the same position is caught as left
//! recursion instead of looping. A dedicated furthest-failure tracker is
//! updated as terminal patterns fail, which keeps diagnostics a constant-
//! time read instead of a table scan.

use compact_str::CompactString;
use hashbrown::HashMap;

use crate::value::Value;

/// Identity of a memoizable rule or terminal pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MemoKey {
    Space,
    Comment,
    Number,
    String,
    Ident,
    Hole,
    Eof,
    /// Compiled production, by index.
    Production(u32),
    /// Interned literal pattern, by index.
    Literal(u32),
}

/// Outcome of running a rule at a position.
///
/// Failure is a value, not an error: it propagates through ordered choice
/// and sequencing. The failure position is the furthest advance the
/// attempt made and feeds diagnostics only, never backtracking.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleResult {
    Success { pos: usize, value: Value },
    Failure { pos: usize },
}

impl RuleResult {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub const fn pos(&self) -> usize {
        match self {
            Self::Success { pos, .. } | Self::Failure { pos } => *pos,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum MemoEntry {
    /// A probe: this `(position, rule)` is currently being evaluated.
    InProgress,
    Done(RuleResult),
}

/// Per-parse hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
}

pub(crate) enum Begin {
    Hit(RuleResult),
    LeftRecursion,
    Started,
}

#[derive(Debug, Default)]
pub(crate) struct MemoTable {
    entries: HashMap<(usize, MemoKey), MemoEntry, ahash::RandomState>,
    stats: MemoStats,
    furthest: usize,
    expected: Vec<CompactString>,
}

impl MemoTable {
    pub fn new() -> Self {
        Self {
            entries: HashMap::with_hasher(ahash::RandomState::new()),
            stats: MemoStats::default(),
            furthest: 0,
            expected: Vec::new(),
        }
    }

    /// Enter `(pos, key)`: either a memoized result, a left-recursion
    /// probe hit, or a fresh start (probe installed, miss counted).
    pub fn begin(&mut self, pos: usize, key: MemoKey) -> Begin {
        match self.entries.get(&(pos, key)) {
            Some(MemoEntry::InProgress) => Begin::LeftRecursion,
            Some(MemoEntry::Done(result)) => {
                self.stats.hits += 1;
                Begin::Hit(result.clone())
            }
            None => {
                self.stats.misses += 1;
                self.entries.insert((pos, key), MemoEntry::InProgress);
                Begin::Started
            }
        }
    }

    /// Replace the probe with the result. With memoization disabled the
    /// probe is removed instead, so the next attempt misses again while
    /// left-recursion detection stays intact.
    pub fn finish(&mut self, pos: usize, key: MemoKey, result: &RuleResult, memoize: bool) {
        if memoize {
            self.entries
                .insert((pos, key), MemoEntry::Done(result.clone()));
        } else {
            self.entries.remove(&(pos, key));
        }
    }

    /// Record a failed terminal pattern for diagnostics.
    pub fn record_failure(&mut self, pos: usize, name: &str) {
        if pos > self.furthest {
            self.furthest = pos;
            self.expected.clear();
        }
        if pos == self.furthest && !self.expected.iter().any(|n| n == name) {
            self.expected.push(name.into());
        }
    }

    /// The furthest position any terminal pattern failed at, with the
    /// names of the patterns expected there.
    pub fn last_failures(&self) -> (usize, &[CompactString]) {
        (self.furthest, &self.expected)
    }

    pub const fn stats(&self) -> MemoStats {
        self.stats
    }

    pub fn entries(&self) -> impl Iterator<Item = (&(usize, MemoKey), &MemoEntry)> {
        self.entries.iter()
    }
}

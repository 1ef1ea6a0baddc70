//! Rule-name interning.
//!
//! Grammar compilation interns every production and reference name once,
//! so rule identity in the memo table is a small copyable key instead of a
//! string. The builder side is a plain [`lasso::Rodeo`]; sealing converts
//! it into a read-only [`lasso::RodeoReader`], which is `Sync` and lets a
//! compiled rule-set be shared across threads.

use std::fmt;

use lasso::{Rodeo, RodeoReader, Spur};

/// Key of an interned rule name.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameId(Spur);

impl fmt::Debug for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameId({:?})", self.0)
    }
}

/// Mutable name table used while a grammar is being compiled.
#[derive(Debug, Default)]
pub struct NameTable {
    rodeo: Rodeo,
}

impl NameTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rodeo: Rodeo::new(),
        }
    }

    pub fn intern(&mut self, name: &str) -> NameId {
        NameId(self.rodeo.get_or_intern(name))
    }

    #[must_use]
    pub fn resolve(&self, id: NameId) -> &str {
        self.rodeo.resolve(&id.0)
    }

    /// Freeze the table for read-only, thread-shareable access.
    #[must_use]
    pub fn seal(self) -> Names {
        Names {
            reader: self.rodeo.into_reader(),
        }
    }
}

/// Sealed name table owned by a compiled rule-set.
pub struct Names {
    reader: RodeoReader,
}

impl Names {
    #[must_use]
    pub fn resolve(&self, id: NameId) -> &str {
        self.reader.resolve(&id.0)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<NameId> {
        self.reader.get(name).map(NameId)
    }
}

impl fmt::Debug for Names {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Names")
            .field("len", &self.reader.len())
            .finish()
    }
}

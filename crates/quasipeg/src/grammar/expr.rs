use smallvec::SmallVec;

use crate::intern::NameId;

/// One atom of a compiled grammar alternative.
#[derive(Debug, Clone)]
pub(crate) enum BnfExpr {
    /// Consume a token whose text equals the interned literal.
    Lit(u32),
    /// One of the scanner's standard terminals.
    Builtin(Builtin),
    /// Invoke the production with this index.
    Call(u32),
    /// Reference to a name with no production; fails at run time.
    Ref(NameId),
    /// Parenthesized body: an ordered choice of alternatives.
    Group(Vec<Alternative>),
    Opt(Box<BnfExpr>),
    Star(Box<BnfExpr>),
    Plus(Box<BnfExpr>),
    /// `item ** sep` (`min_one` false) or `item ++ sep` (`min_one` true).
    /// A dangling separator is never consumed.
    Sep {
        item: Box<BnfExpr>,
        sep: Box<BnfExpr>,
        min_one: bool,
    },
}

/// Standard terminals every scanner provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Space,
    Comment,
    Number,
    String,
    Ident,
    Hole,
    Eof,
}

impl Builtin {
    /// Map a grammar-DSL identifier onto a builtin terminal.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SPACE" => Some(Self::Space),
            "COMMENT" => Some(Self::Comment),
            "NUMBER" => Some(Self::Number),
            "STRING" => Some(Self::String),
            "IDENT" => Some(Self::Ident),
            "HOLE" => Some(Self::Hole),
            "EOF" => Some(Self::Eof),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Space => "SPACE",
            Self::Comment => "COMMENT",
            Self::Number => "NUMBER",
            Self::String => "STRING",
            Self::Ident => "IDENT",
            Self::Hole => "HOLE",
            Self::Eof => "EOF",
        }
    }
}

/// One `/`-alternative of a production: a sequence of atoms with an
/// optional trailing semantic action (an index into the grammar
/// template's holes).
#[derive(Debug, Clone)]
pub(crate) struct Alternative {
    pub atoms: SmallVec<[BnfExpr; 4]>,
    pub action: Option<u32>,
}

/// A named production. The first production compiled is the start rule.
#[derive(Debug, Clone)]
pub(crate) struct Production {
    pub name: NameId,
    pub body: Vec<Alternative>,
}

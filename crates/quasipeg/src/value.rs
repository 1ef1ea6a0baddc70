//! Semantic values produced by rule execution.

use std::fmt;
use std::sync::Arc;

use compact_str::CompactString;

/// The output of a rule: literal text, an ordered sequence, an input hole
/// index, or the end-of-input sentinel.
///
/// Literal and terminal matches yield [`Value::Str`]; repetition atoms
/// yield [`Value::Seq`]; a matched interpolation gap yields
/// [`Value::Hole`] until the hole values are substituted in.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(CompactString),
    Seq(Vec<Value>),
    Hole(u32),
    Eof,
}

impl Value {
    #[must_use]
    pub fn str(text: impl Into<CompactString>) -> Self {
        Self::Str(text.into())
    }

    #[must_use]
    pub fn seq(values: impl Into<Vec<Value>>) -> Self {
        Self::Seq(values.into())
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) => Some(text.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Self::Seq(values) => Some(values),
            _ => None,
        }
    }

    /// Replace every [`Value::Hole`] leaf with the corresponding entry of
    /// `holes`. Indices the engine produced are always in range; an
    /// out-of-range index is left untouched.
    #[must_use]
    pub fn substitute(&self, holes: &[Value]) -> Value {
        match self {
            Self::Hole(index) => holes
                .get(*index as usize)
                .cloned()
                .unwrap_or_else(|| Self::Hole(*index)),
            Self::Seq(values) => Self::Seq(values.iter().map(|v| v.substitute(holes)).collect()),
            other => other.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(text) => write!(f, "{:?}", text.as_str()),
            Self::Seq(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    value.fmt(f)?;
                }
                write!(f, "]")
            }
            Self::Hole(index) => write!(f, "${index}"),
            Self::Eof => write!(f, "EOF"),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::str(text)
    }
}

/// A semantic action attached to a grammar alternative.
///
/// Receives the positional results of the alternative's atoms and returns
/// the value the alternative yields.
#[derive(Clone)]
pub struct Action(Arc<dyn Fn(&[Value]) -> Value + Send + Sync>);

impl Action {
    pub fn new(f: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    #[must_use]
    pub fn apply(&self, values: &[Value]) -> Value {
        (self.0)(values)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

/// Wrap a closure into an [`Action`].
pub fn action(f: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Action {
    Action::new(f)
}

//! Templates: interleaved raw text segments and interpolated holes.
//!
//! A template is the engine's rendition of a tagged template literal: `n`
//! holes between `n + 1` raw segments. Grammars are templates whose holes
//! are semantic [`Action`](crate::value::Action)s; inputs are templates
//! whose holes are [`Value`](crate::value::Value)s.

use std::mem;

use compact_str::CompactString;

use crate::error::TemplateError;

/// Glyph substituted for each hole when a template is rendered for
/// display (one byte, so the rendered length is the sum of the segment
/// lengths plus the hole count).
pub const HOLE_GLYPH: char = '$';

/// An immutable sequence of `n + 1` raw segments and `n` holes.
#[derive(Debug, Clone)]
pub struct Template<H> {
    segments: Vec<CompactString>,
    holes: Vec<H>,
}

impl<H> Template<H> {
    /// Build a template from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] unless `segments.len() == holes.len() + 1`.
    pub fn new(segments: Vec<CompactString>, holes: Vec<H>) -> Result<Self, TemplateError> {
        if segments.len() != holes.len() + 1 {
            return Err(TemplateError {
                segments: segments.len(),
                holes: holes.len(),
            });
        }
        Ok(Self { segments, holes })
    }

    /// A single-segment template with no holes.
    #[must_use]
    pub fn from_source(source: impl Into<CompactString>) -> Self {
        Self {
            segments: vec![source.into()],
            holes: Vec::new(),
        }
    }

    #[must_use]
    pub fn builder() -> TemplateBuilder<H> {
        TemplateBuilder::new()
    }

    #[must_use]
    pub fn segments(&self) -> &[CompactString] {
        &self.segments
    }

    #[must_use]
    pub fn holes(&self) -> &[H] {
        &self.holes
    }

    /// Render the template with [`HOLE_GLYPH`] substituted for each hole.
    #[must_use]
    pub fn display(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push(HOLE_GLYPH);
            }
            out.push_str(segment);
        }
        out
    }
}

/// Incrementally assembles a [`Template`], keeping the segment/hole
/// arity invariant by construction.
#[derive(Debug)]
pub struct TemplateBuilder<H> {
    segments: Vec<CompactString>,
    holes: Vec<H>,
    current: String,
}

impl<H> TemplateBuilder<H> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            holes: Vec::new(),
            current: String::new(),
        }
    }

    /// Append raw text to the current segment.
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.current.push_str(text);
        self
    }

    /// Close the current segment and interpolate a hole after it.
    #[must_use]
    pub fn hole(mut self, hole: H) -> Self {
        let segment = mem::take(&mut self.current);
        self.segments.push(segment.into());
        self.holes.push(hole);
        self
    }

    #[must_use]
    pub fn build(mut self) -> Template<H> {
        self.segments.push(self.current.into());
        Template {
            segments: self.segments,
            holes: self.holes,
        }
    }
}

impl<H> Default for TemplateBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}

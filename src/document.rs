//! Exchange snapshot of a decorated document.
//!
//! A [`Document`] is what gets opened and saved: exportable text plus the
//! decoration runs covering it. Positions inside a document are exportable
//! positions (chars of `text`), not internal positions.

use crate::decoration::{Decoration, ParagraphDecoration};
use crate::error::{Error, Result};

/// One decorated run of a [`Document`] or of a piece table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecorationModel {
    pub start: usize,
    pub length: usize,
    pub decoration: Decoration,
    pub paragraph_decoration: Option<ParagraphDecoration>,
}

impl DecorationModel {
    #[must_use]
    pub fn new(
        start: usize,
        length: usize,
        decoration: Decoration,
        paragraph_decoration: Option<ParagraphDecoration>,
    ) -> Self {
        Self {
            start,
            length,
            decoration,
            paragraph_decoration,
        }
    }

    /// End position (exclusive), or `None` if it does not fit a `usize`.
    #[must_use]
    pub fn checked_end(&self) -> Option<usize> {
        self.start.checked_add(self.length)
    }

    /// End position (exclusive). Saturates on overflow.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.length)
    }
}

/// An ordered pair of positions, normalized so `start <= end`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    #[must_use]
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// A collapsed selection at `pos`.
    #[must_use]
    pub fn caret(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A decorated document snapshot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    pub text: String,
    pub decorations: Vec<DecorationModel>,
    pub caret_position: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl Document {
    /// A document whose text carries the default decorations.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let length = text.chars().count();
        Self {
            text,
            decorations: vec![DecorationModel::new(
                0,
                length,
                Decoration::default(),
                Some(ParagraphDecoration::resolved_default()),
            )],
            caret_position: 0,
        }
    }

    /// A document from explicit runs.
    pub fn with_decorations(
        text: impl Into<String>,
        decorations: Vec<DecorationModel>,
        caret_position: usize,
    ) -> Result<Self> {
        let document = Self {
            text: text.into(),
            decorations,
            caret_position,
        };
        document.validate()?;
        Ok(document)
    }

    /// Length of `text` in chars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Check that the decorations tile the text: contiguous from zero,
    /// non-overlapping, and summing to the text length.
    pub fn validate(&self) -> Result<()> {
        let mut expected = 0;
        for (i, model) in self.decorations.iter().enumerate() {
            if model.start != expected {
                return Err(Error::InvalidDocument(format!(
                    "decoration {i} starts at {} but previous run ends at {expected}",
                    model.start
                )));
            }
            expected = model.checked_end().ok_or_else(|| {
                Error::InvalidDocument(format!("decoration {i} ends past usize::MAX"))
            })?;
        }
        let length = self.len();
        if expected != length {
            return Err(Error::InvalidDocument(format!(
                "decorations cover {expected} chars but text has {length}"
            )));
        }
        Ok(())
    }
}

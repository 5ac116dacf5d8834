//! Immutable piece records.

use crate::decoration::{Decoration, ParagraphDecoration};
use std::rc::Rc;

/// Which backing buffer a piece points into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Content loaded at construction. Never modified.
    Original,
    /// Content typed during the session. Append-only.
    Addition,
}

/// A range of one backing buffer plus the decorations of that range.
///
/// Pieces are values: every "edit" produces new pieces. Decorations are
/// shared between the fragments of a split piece.
#[derive(Clone, Debug, PartialEq)]
pub struct Piece {
    source: BufferKind,
    start: usize,
    length: usize,
    decoration: Rc<Decoration>,
    paragraph_decoration: Option<Rc<ParagraphDecoration>>,
}

impl Piece {
    #[must_use]
    pub fn new(
        source: BufferKind,
        start: usize,
        length: usize,
        decoration: Decoration,
        paragraph_decoration: Option<ParagraphDecoration>,
    ) -> Self {
        Self {
            source,
            start,
            length,
            decoration: Rc::new(decoration),
            paragraph_decoration: paragraph_decoration.map(Rc::new),
        }
    }

    #[must_use]
    pub fn source(&self) -> BufferKind {
        self.source
    }

    /// Start offset in the backing buffer.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Length in internal positions.
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// End offset in the backing buffer (exclusive).
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[must_use]
    pub fn decoration(&self) -> &Decoration {
        &self.decoration
    }

    #[must_use]
    pub fn paragraph_decoration(&self) -> Option<&ParagraphDecoration> {
        self.paragraph_decoration.as_deref()
    }

    /// The sub-piece `from..to` (piece-relative, clamped).
    #[must_use]
    pub fn slice(&self, from: usize, to: usize) -> Self {
        let to = to.min(self.length);
        let from = from.min(to);
        Self {
            start: self.start + from,
            length: to - from,
            ..self.clone()
        }
    }

    /// The first `offset` positions.
    #[must_use]
    pub fn piece_before(&self, offset: usize) -> Self {
        self.slice(0, offset)
    }

    /// Everything from `offset` on.
    #[must_use]
    pub fn piece_from(&self, offset: usize) -> Self {
        self.slice(offset, self.length)
    }

    /// Same range with `decoration` resolved over the current one.
    #[must_use]
    pub fn copy_with_decoration(&self, decoration: &Decoration) -> Self {
        Self {
            decoration: Rc::new(decoration.normalize(&self.decoration)),
            ..self.clone()
        }
    }

    /// Same range with `paragraph` resolved over the current paragraph
    /// decoration, or over the default one when none is set.
    #[must_use]
    pub fn copy_with_paragraph_decoration(&self, paragraph: &ParagraphDecoration) -> Self {
        let resolved = match self.paragraph_decoration.as_deref() {
            Some(current) => paragraph.normalize(current),
            None => paragraph.normalize(&ParagraphDecoration::resolved_default()),
        };
        Self {
            paragraph_decoration: Some(Rc::new(resolved)),
            ..self.clone()
        }
    }

    /// Same range with the paragraph decoration replaced outright.
    #[must_use]
    pub(crate) fn with_paragraph_rc(&self, paragraph: Option<Rc<ParagraphDecoration>>) -> Self {
        Self {
            paragraph_decoration: paragraph,
            ..self.clone()
        }
    }

    /// Same decorations over another backing range.
    #[must_use]
    pub(crate) fn rebased(&self, source: BufferKind, start: usize, length: usize) -> Self {
        Self {
            source,
            start,
            length,
            ..self.clone()
        }
    }

    pub(crate) fn paragraph_rc(&self) -> Option<&Rc<ParagraphDecoration>> {
        self.paragraph_decoration.as_ref()
    }

    /// Check if two pieces carry equal decorations.
    #[must_use]
    pub fn same_decorations(&self, other: &Self) -> bool {
        self.decoration == other.decoration && self.paragraph_decoration == other.paragraph_decoration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoration::{FontWeight, TextAlignment, TextDecoration};

    fn piece() -> Piece {
        Piece::new(
            BufferKind::Addition,
            10,
            6,
            Decoration::default(),
            Some(ParagraphDecoration::resolved_default()),
        )
    }

    #[test]
    fn test_split() {
        let p = piece();
        let before = p.piece_before(2);
        let after = p.piece_from(2);
        assert_eq!((before.start(), before.length()), (10, 2));
        assert_eq!((after.start(), after.length()), (12, 4));
        assert!(p.piece_before(0).is_empty());
        assert!(p.piece_from(6).is_empty());
        assert_eq!(p.slice(4, 99).end(), 16);
        assert!(before.same_decorations(&after));
    }

    #[test]
    fn test_copy_with_decoration_resolves() {
        let bold = Decoration::Text(TextDecoration::builder().bold().build());
        let p = piece().copy_with_decoration(&bold);
        let text = p.decoration().as_text().unwrap();
        assert_eq!(text.weight, Some(FontWeight::Bold));
        assert!(text.is_normalized());
        assert!(!p.same_decorations(&piece()));
    }

    #[test]
    fn test_copy_with_paragraph_over_none() {
        let p = Piece::new(BufferKind::Original, 0, 3, Decoration::default(), None);
        let patch = ParagraphDecoration::builder()
            .alignment(TextAlignment::Right)
            .build();
        let q = p.copy_with_paragraph_decoration(&patch);
        let para = q.paragraph_decoration().unwrap();
        assert!(para.is_normalized());
        assert_eq!(para.alignment, Some(TextAlignment::Right));
    }
}

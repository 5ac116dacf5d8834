//! Lazy piece offsets and a bidirectional character iterator.

use super::piece_table::PieceTable;
use crate::error::{Error, Result};

/// Offsets derived from the piece list. Rebuilt lazily after every change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct PieceIndex {
    /// Text position of each piece, ascending.
    pub(crate) piece_starts: Vec<usize>,
    /// Position of every `'\n'`, ascending.
    pub(crate) line_feeds: Vec<usize>,
}

impl PieceIndex {
    pub(crate) fn build(table: &PieceTable) -> Self {
        let mut piece_starts = Vec::with_capacity(table.pieces().len());
        let mut line_feeds = Vec::new();
        let mut position = 0;

        for piece in table.pieces() {
            piece_starts.push(position);
            let text = table
                .backing(piece.source())
                .internal_text_range(piece.start(), piece.end());
            line_feeds.extend(
                text.chars()
                    .enumerate()
                    .filter(|&(_, c)| c == '\n')
                    .map(|(i, _)| position + i),
            );
            position += piece.length();
        }

        Self {
            piece_starts,
            line_feeds,
        }
    }
}

/// Iterator over the internal characters of a [`PieceTable`], in the style
/// of a text cursor: it can move both ways and be repositioned.
///
/// `None` means the cursor is outside the text.
#[derive(Clone, Debug)]
pub struct CharacterIterator<'a> {
    table: &'a PieceTable,
    index: usize,
}

impl<'a> CharacterIterator<'a> {
    pub(crate) fn new(table: &'a PieceTable) -> Self {
        Self { table, index: 0 }
    }

    /// Always 0.
    #[must_use]
    pub fn begin_index(&self) -> usize {
        0
    }

    /// The text length.
    #[must_use]
    pub fn end_index(&self) -> usize {
        self.table.text_length()
    }

    /// Current position.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Character at the current position.
    #[must_use]
    pub fn current(&self) -> Option<char> {
        self.table.char_at(self.index).ok()
    }

    /// Move to the start and read.
    pub fn first(&mut self) -> Option<char> {
        self.index = 0;
        self.current()
    }

    /// Move to the last character and read. On empty text the position
    /// stays at the end.
    pub fn last(&mut self) -> Option<char> {
        self.index = self.end_index().saturating_sub(1);
        self.current()
    }

    /// Advance one position and read. Stops at the end.
    pub fn next_char(&mut self) -> Option<char> {
        if self.index >= self.end_index() {
            return None;
        }
        self.index += 1;
        self.current()
    }

    /// Step back one position and read. Stays put at the start.
    pub fn previous_char(&mut self) -> Option<char> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.current()
    }

    /// Move to `index` (0..=end) and read.
    pub fn set_index(&mut self, index: usize) -> Result<Option<char>> {
        if index > self.end_index() {
            return Err(Error::OutOfRange {
                position: index,
                length: self.end_index(),
            });
        }
        self.index = index;
        Ok(self.current())
    }
}

//! Editable document with undo/redo.
//!
//! This module provides [`EditBuffer`], which pairs a [`PieceTable`] with a
//! [`CommandManager`]. Every mutating call is wrapped in a command so it can
//! be undone.
//!
//! # Examples
//!
//! ```
//! use richtext_core::EditBuffer;
//! use richtext_core::decoration::TextDecoration;
//!
//! let mut buf = EditBuffer::new();
//! buf.append("Hello World").unwrap();
//! buf.decorate(6, 11, TextDecoration::builder().bold().build()).unwrap();
//! buf.delete(5, 6).unwrap();
//! assert_eq!(buf.text(), "Hello");
//!
//! // Undo restores the deleted text and its decoration
//! buf.undo();
//! assert_eq!(buf.text(), "Hello World");
//! assert_eq!(buf.table().decoration_model_list().len(), 2);
//! ```

use super::command::Command;
use super::history::{CommandManager, DEFAULT_MAX_HISTORY_DEPTH};
use super::piece_table::PieceTable;
use super::table::{TableAddress, TableEdit, insert_table};
use crate::decoration::{Decoration, DecorationUpdate};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::event::{ChangeEvent, ListenerId};

/// Construction options for [`EditBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EditOptions {
    /// Maximum number of commands kept for undo. Oldest are dropped first.
    pub max_history_depth: usize,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            max_history_depth: DEFAULT_MAX_HISTORY_DEPTH,
        }
    }
}

/// A decorated document with editing operations and undo/redo.
///
/// Positions are internal positions: one per char of plain text and one
/// per emoji, image or table separator. Use
/// [`PieceTable::internal_position`] to convert from positions in
/// [`text`](Self::text).
#[derive(Debug, Default)]
pub struct EditBuffer {
    table: PieceTable,
    history: CommandManager,
}

impl EditBuffer {
    /// Create a new empty edit buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document.
    pub fn from_document(document: &Document) -> Result<Self> {
        Self::with_options(document, EditOptions::default())
    }

    /// Open a document with custom options.
    pub fn with_options(document: &Document, options: EditOptions) -> Result<Self> {
        Ok(Self {
            table: PieceTable::new(document)?,
            history: CommandManager::with_max_depth(options.max_history_depth),
        })
    }

    /// Get the current maximum undo history depth.
    #[must_use]
    pub fn max_history_depth(&self) -> usize {
        self.history.max_depth()
    }

    /// Get the underlying piece table.
    #[must_use]
    pub fn table(&self) -> &PieceTable {
        &self.table
    }

    /// Get the full exportable text.
    #[must_use]
    pub fn text(&self) -> String {
        self.table.text()
    }

    /// Internal length of the document.
    #[must_use]
    pub fn text_length(&self) -> usize {
        self.table.text_length()
    }

    /// Run an arbitrary command through the history.
    pub fn execute(&mut self, command: Command) -> Result<bool> {
        self.history.execute(command, &mut self.table)
    }

    /// Append text at the end.
    pub fn append(&mut self, text: &str) -> Result<bool> {
        self.execute(Command::append(text))
    }

    /// Insert text at `pos`.
    ///
    /// Each call splits its own text into units. A modifier typed on its own
    /// after an emoji therefore stays a separate unit until the document is
    /// saved and reopened, when the pair parses as one cluster.
    pub fn insert(&mut self, text: &str, pos: usize) -> Result<bool> {
        self.execute(Command::insert(text, pos))
    }

    /// Delete `len` positions from `pos`.
    pub fn delete(&mut self, pos: usize, len: usize) -> Result<bool> {
        self.execute(Command::delete(pos, len))
    }

    /// Decorate `start..end`.
    ///
    /// Paragraph decorations always cover whole paragraphs: the range is
    /// widened to the paragraphs it touches. The empty paragraph after a
    /// trailing line feed has nothing to carry a decoration, so decorating
    /// it changes nothing.
    pub fn decorate(
        &mut self,
        start: usize,
        end: usize,
        update: impl Into<DecorationUpdate>,
    ) -> Result<bool> {
        let update = update.into();
        let (start, end) = match update {
            DecorationUpdate::Paragraph(_) => {
                Error::check_range(start, end, self.table.text_length())?;
                let first = self.table.paragraph_range(start);
                let last = if end > start {
                    self.table.paragraph_range(end - 1)
                } else {
                    first.clone()
                };
                if first.start == last.end {
                    return Ok(false);
                }
                (first.start, last.end)
            }
            DecorationUpdate::Text(_) | DecorationUpdate::Image(_) => (start, end),
        };
        self.execute(Command::decorate(start, end, update))
    }

    /// Set or clear the decoration used for the next typed text.
    pub fn set_decoration_at_caret(&mut self, decoration: Option<Decoration>) {
        self.table.set_decoration_at_caret(decoration);
    }

    /// Apply a structural edit to the table holding `pos`.
    pub fn table_edit(&mut self, edit: TableEdit, pos: usize) -> Result<bool> {
        let command = TableAddress::locate(&self.table, pos)?.plan(edit, pos)?;
        self.execute(command)
    }

    /// Insert an empty table at `pos`.
    pub fn insert_table(&mut self, pos: usize, rows: usize, columns: usize) -> Result<bool> {
        let command = insert_table(&self.table, pos, rows, columns)?;
        self.execute(command)
    }

    /// Cell geometry of the table holding `pos`.
    pub fn table_at(&self, pos: usize) -> Result<TableAddress> {
        TableAddress::locate(&self.table, pos)
    }

    /// Undo the last command.
    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.table)
    }

    /// Redo the last undone command.
    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.table)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Snapshot the document and mark the current state as saved.
    pub fn save(&mut self, caret: usize) -> Document {
        self.history.mark_saved();
        self.table.to_document(caret)
    }

    /// Check if the document changed since the last save.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.history.is_modified()
    }

    /// Rebuild the piece table from its live content and drop all history.
    pub fn compact(&mut self) {
        self.table.compact();
        self.history.clear();
    }

    /// Register a change listener on the underlying table.
    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        self.table.add_listener(listener)
    }

    /// Unregister a change listener.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.table.remove_listener(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoration::{ParagraphDecoration, TextAlignment, TextDecoration};

    fn centered() -> ParagraphDecoration {
        ParagraphDecoration::builder()
            .alignment(TextAlignment::Center)
            .build()
    }

    #[test]
    fn test_paragraph_decorate_widens_range() {
        let mut buf = EditBuffer::from_document(&Document::new("one\ntwo\nthree")).unwrap();
        assert_eq!(buf.decorate(5, 6, centered()), Ok(true));

        let models = buf.table().decoration_model_list();
        assert_eq!(models.len(), 3);
        assert_eq!((models[1].start, models[1].length), (4, 4));
        assert_eq!(
            models[1].paragraph_decoration.as_ref().unwrap().alignment,
            Some(TextAlignment::Center)
        );
    }

    #[test]
    fn test_paragraph_decorate_collapsed_range() {
        let mut buf = EditBuffer::from_document(&Document::new("one\ntwo")).unwrap();
        assert_eq!(buf.decorate(1, 1, centered()), Ok(true));
        let models = buf.table().decoration_model_list();
        assert_eq!((models[0].start, models[0].length), (0, 4));
        assert!(buf.decorate(9, 9, centered()).is_err());
    }

    #[test]
    fn test_paragraph_decorate_empty_last_paragraph() {
        let mut buf = EditBuffer::from_document(&Document::new("one\n")).unwrap();
        assert_eq!(buf.decorate(4, 4, centered()), Ok(false));
        assert!(!buf.can_undo());
        let first = buf.table().paragraph_decoration_at_caret(0);
        assert_eq!(first.and_then(|p| p.alignment), None);
        assert_eq!(buf.table().decoration_model_list().len(), 1);
    }

    #[test]
    fn test_save_and_modified() {
        let mut buf = EditBuffer::new();
        assert!(!buf.is_modified());
        buf.append("abc").unwrap();
        assert!(buf.is_modified());

        let doc = buf.save(3);
        assert!(!buf.is_modified());
        assert_eq!(doc.text, "abc");
        assert_eq!(doc.caret_position, 3);

        buf.delete(0, 1).unwrap();
        assert!(buf.is_modified());
        buf.undo();
        assert!(!buf.is_modified());
    }

    #[test]
    fn test_compact_drops_history() {
        let mut buf = EditBuffer::new();
        buf.append("abc").unwrap();
        buf.decorate(0, 1, TextDecoration::builder().italic().build())
            .unwrap();
        buf.compact();
        assert!(!buf.can_undo());
        assert_eq!(buf.text(), "abc");
        assert_eq!(buf.table().decoration_model_list().len(), 2);
    }

    #[test]
    fn test_table_round_trip_through_history() {
        let mut buf = EditBuffer::new();
        buf.append("intro").unwrap();
        assert_eq!(buf.insert_table(5, 2, 2), Ok(true));
        let address = buf.table_at(6).unwrap();
        assert_eq!((address.rows(), address.columns()), (2, 2));

        assert_eq!(buf.table_edit(TableEdit::InsertRowBelow, 6), Ok(true));
        assert_eq!(buf.table_at(6).unwrap().rows(), 3);
        buf.undo();
        assert_eq!(buf.table_at(6).unwrap().rows(), 2);
        buf.undo();
        assert_eq!(buf.text(), "intro");
        assert!(buf.table_at(0).is_err());
    }

    #[test]
    fn test_options() {
        let buf = EditBuffer::with_options(
            &Document::default(),
            EditOptions {
                max_history_depth: 5,
            },
        )
        .unwrap();
        assert_eq!(buf.max_history_depth(), 5);
        assert_eq!(EditBuffer::new().max_history_depth(), DEFAULT_MAX_HISTORY_DEPTH);
    }
}

//! Piece-table document storage and undoable editing.
//!
//! Key types:
//!
//! - [`PieceTable`]: the document as pieces over two unit buffers
//! - [`Command`]: an undoable insert, delete, decorate or batch
//! - [`CommandManager`]: undo/redo stacks with a saved marker
//! - [`EditBuffer`]: a piece table and its history behind one API
//! - [`TableAddress`]: cell geometry of a table paragraph
//!
//! # Examples
//!
//! ```
//! use richtext_core::{Document, EditBuffer};
//!
//! let mut editor = EditBuffer::from_document(&Document::new("Hello")).unwrap();
//! editor.append(" 👋").unwrap();
//! assert_eq!(editor.text(), "Hello 👋");
//! assert_eq!(editor.text_length(), 7);
//!
//! // Undo the append
//! editor.undo();
//! assert_eq!(editor.text(), "Hello");
//!
//! // Redo brings it back
//! editor.redo();
//! assert_eq!(editor.text(), "Hello 👋");
//! ```

mod command;
mod cursor;
mod edit;
mod history;
mod piece;
mod piece_table;
mod table;

pub use command::{
    AppendCommand, BatchCommand, Command, DecorateCommand, DeleteCommand, InsertCommand,
};
pub use cursor::CharacterIterator;
pub use edit::{EditBuffer, EditOptions};
pub use history::{CommandManager, DEFAULT_MAX_HISTORY_DEPTH};
pub use piece::{BufferKind, Piece};
pub use piece_table::{Edit, PieceTable, Splice};
pub use table::{TableAddress, TableEdit, insert_table};

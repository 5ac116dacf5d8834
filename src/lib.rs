//! `richtext_core` - Piece-table storage for decorated rich text
//!
//! A document is kept as an ordered list of pieces over two append-friendly
//! unit buffers. Every edit is an undoable command whose inverse restores
//! the exact previous piece list, so undo and redo never copy document
//! content. Text runs, images and paragraphs carry decorations; tables are
//! paragraphs whose cells are separated by a reserved unit.
//!
//! # Examples
//!
//! ```
//! use richtext_core::{Document, EditBuffer};
//! use richtext_core::decoration::TextDecoration;
//!
//! let mut editor = EditBuffer::from_document(&Document::new("Hello World")).unwrap();
//! editor.decorate(0, 5, TextDecoration::builder().bold().build()).unwrap();
//! editor.insert(",", 5).unwrap();
//!
//! let saved = editor.save(6);
//! assert_eq!(saved.text, "Hello, World");
//! assert_eq!(saved.decorations.len(), 2);
//! ```

// Crate-level lint configuration
#![allow(clippy::module_name_repetitions)] // Allow decoration::TextDecoration etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::option_if_let_else)] // if-let-else is clearer than map_or for complex logic
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::needless_collect)] // Collect for assertions is clear
#![allow(clippy::float_cmp)] // Decoration sizes compare exactly

pub mod color;
pub mod decoration;
pub mod document;
pub mod error;
pub mod event;
pub mod text;
pub mod unicode;
pub mod unit;

// Re-export core types at crate root
pub use color::Rgba;
pub use decoration::{Decoration, DecorationUpdate};
pub use document::{DecorationModel, Document, Selection};
pub use error::{Error, Result};
pub use event::{ChangeEvent, ListenerId, LogLevel, clear_log_callback, emit_log, set_log_callback};
pub use unit::{ContentUnit, Emoji, UnitBuffer, convert_text_to_units};

// Re-export editing types
pub use text::{
    Command, CommandManager, EditBuffer, EditOptions, PieceTable, TableAddress, TableEdit,
};

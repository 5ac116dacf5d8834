//! Fuzz target for edit sequences.
//!
//! Applies arbitrary inserts, deletes, decorations and table edits, then
//! checks that undoing everything restores the opening document.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use richtext_core::decoration::{ParagraphDecoration, TextAlignment, TextDecoration};
use richtext_core::{Document, EditBuffer, TableEdit};

#[derive(Arbitrary, Debug)]
enum Op {
    Append(String),
    Insert(String, u16),
    Delete(u16, u8),
    Bold(u16, u16),
    Align(u16, u16),
    InsertTable(u16, u8, u8),
    Table(u8, u16),
    Undo,
    Redo,
}

const TABLE_EDITS: [TableEdit; 6] = [
    TableEdit::InsertRowAbove,
    TableEdit::InsertRowBelow,
    TableEdit::DeleteRow,
    TableEdit::InsertColumnBefore,
    TableEdit::InsertColumnAfter,
    TableEdit::DeleteColumn,
];

fuzz_target!(|input: (String, Vec<Op>)| {
    let (initial, ops) = input;
    let Ok(mut buf) = EditBuffer::from_document(&Document::new(initial)) else {
        return;
    };
    let original = (buf.text(), buf.table().decoration_model_list());

    for op in ops.into_iter().take(64) {
        let len = buf.text_length();
        let at = |p: u16| usize::from(p) % (len + 1);
        // Range errors are expected; only panics are bugs.
        let _ = match op {
            Op::Append(s) => buf.append(&s),
            Op::Insert(s, p) => buf.insert(&s, at(p)),
            Op::Delete(p, n) => buf.delete(at(p), usize::from(n)),
            Op::Bold(a, b) => {
                let (a, b) = (at(a), at(b));
                buf.decorate(a.min(b), a.max(b), TextDecoration::builder().bold().build())
            }
            Op::Align(a, b) => {
                let (a, b) = (at(a), at(b));
                let centered = ParagraphDecoration::builder()
                    .alignment(TextAlignment::Center)
                    .build();
                buf.decorate(a.min(b), a.max(b), centered)
            }
            Op::InsertTable(p, rows, columns) => {
                buf.insert_table(at(p), usize::from(rows % 4), usize::from(columns % 4))
            }
            Op::Table(kind, p) => {
                buf.table_edit(TABLE_EDITS[usize::from(kind) % TABLE_EDITS.len()], at(p))
            }
            Op::Undo => Ok(buf.undo()),
            Op::Redo => Ok(buf.redo()),
        };
    }

    while buf.undo() {}
    assert_eq!(buf.text(), original.0);
    assert_eq!(buf.table().decoration_model_list(), original.1);
});

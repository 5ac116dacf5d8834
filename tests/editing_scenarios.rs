//! End-to-end editing scenarios through the public API.

mod common;

use richtext_core::decoration::{
    FontWeight, ImageDecoration, ParagraphDecoration, TableDecoration, TextAlignment,
    TextDecoration,
};
use richtext_core::text::TableEdit;
use richtext_core::unit::{OBJECT_ANCHOR, TABLE_SEPARATOR};
use richtext_core::{
    ChangeEvent, Decoration, DecorationModel, Document, EditBuffer, Error, PieceTable, Selection,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

#[test]
fn insert_into_empty_document() {
    common::init_logging();
    let mut buf = EditBuffer::new();
    assert_eq!(buf.insert("Hi", 0), Ok(true));
    assert_eq!(buf.text(), "Hi");
    assert_eq!(buf.table().pieces().len(), 1);
    assert_eq!(buf.text_length(), 2);
}

#[test]
fn delete_space_and_undo_restores_decorations() {
    common::init_logging();
    let mut buf = EditBuffer::from_document(&Document::new("Hello World")).unwrap();
    buf.decorate(0, 5, TextDecoration::builder().bold().build())
        .unwrap();
    let before = buf.table().decoration_model_list();
    let pieces = buf.table().pieces().to_vec();

    assert_eq!(buf.delete(5, 1), Ok(true));
    assert_eq!(buf.text(), "HelloWorld");
    assert!(buf.undo());
    assert_eq!(buf.text(), "Hello World");
    assert_eq!(buf.table().decoration_model_list(), before);
    assert_eq!(buf.table().pieces(), pieces.as_slice());
}

#[test]
fn emoji_takes_one_internal_position() {
    common::init_logging();
    let mut buf = EditBuffer::from_document(&Document::new("Hello")).unwrap();
    buf.insert("👨‍👩‍👧", 5).unwrap();
    info!(text = %buf.text(), "after emoji insert");

    assert_eq!(buf.text_length(), 6);
    assert_eq!(buf.text(), "Hello👨‍👩‍👧");
    assert_eq!(buf.text().chars().count(), 10);
    assert_eq!(buf.table().char_at(5), Ok(OBJECT_ANCHOR));
    assert_eq!(buf.table().internal_position(10), 6);
    assert_eq!(buf.table().internal_position(7), 5);
    common::assert_consistent(buf.table());

    // Deleting the one position removes the whole sequence.
    buf.delete(5, 1).unwrap();
    assert_eq!(buf.text(), "Hello");
}

#[test]
fn delete_table_column_leaves_single_cell() {
    common::init_logging();
    let text = format!("a{TABLE_SEPARATOR}b\n");
    let document = Document::with_decorations(
        text,
        vec![DecorationModel::new(
            0,
            4,
            Decoration::default(),
            Some(ParagraphDecoration::table(1, 2)),
        )],
        0,
    )
    .unwrap();
    let mut buf = EditBuffer::from_document(&document).unwrap();

    assert_eq!(buf.table_edit(TableEdit::DeleteColumn, 2), Ok(true));
    assert_eq!(buf.text(), "a\n");
    let address = buf.table_at(0).unwrap();
    assert_eq!(address.table_decoration(), &TableDecoration::new(1, 1));

    assert_eq!(
        buf.table_edit(TableEdit::DeleteColumn, 0),
        Err(Error::TableTooSmall {
            rows: 1,
            columns: 1
        })
    );
    assert!(buf.undo());
    assert_eq!(buf.text(), format!("a{TABLE_SEPARATOR}b\n"));
    assert_eq!(buf.table_at(0).unwrap().columns(), 2);
}

#[test]
fn range_errors_fail_loudly() {
    common::init_logging();
    let mut buf = EditBuffer::from_document(&Document::new("abc")).unwrap();
    assert_eq!(
        buf.insert("x", 4),
        Err(Error::OutOfRange {
            position: 4,
            length: 3
        })
    );
    assert!(buf.delete(4, 1).is_err());
    assert!(buf.decorate(2, 5, TextDecoration::builder().bold().build()).is_err());
    assert!(buf.table().char_at(3).is_err());
    assert!(!buf.can_undo());
    assert_eq!(buf.text(), "abc");
}

#[test]
fn empty_edits_are_absorbed() {
    let mut buf = EditBuffer::from_document(&Document::new("abc")).unwrap();
    assert_eq!(buf.append(""), Ok(false));
    assert_eq!(buf.insert("", 1), Ok(false));
    assert_eq!(buf.delete(1, 0), Ok(false));
    assert_eq!(buf.decorate(1, 1, TextDecoration::builder().bold().build()), Ok(false));
    assert!(!buf.can_undo());
    assert!(!buf.is_modified());
}

#[test]
fn image_insert_exports_anchor_and_url() {
    let mut buf = EditBuffer::from_document(&Document::new("ab")).unwrap();
    let image = ImageDecoration::new("https://example.com/cat.png").with_size(32.0, 24.0);
    assert_eq!(buf.decorate(1, 1, image.clone()), Ok(true));
    assert_eq!(buf.text(), format!("a{OBJECT_ANCHOR}b"));

    let saved = buf.save(0);
    assert_eq!(saved.decorations.len(), 3);
    assert_eq!(saved.decorations[1].decoration, Decoration::Image(image.clone()));

    // Reopening recovers the URL from the image run.
    let reopened = PieceTable::new(&saved).unwrap();
    let mut urls = Vec::new();
    reopened
        .walk_fragments(0, reopened.text_length(), |unit, _| {
            if let richtext_core::ContentUnit::Image(url) = unit {
                urls.push(url.clone());
            }
        })
        .unwrap();
    assert_eq!(urls, vec![image.url]);
}

#[test]
fn sticky_decoration_follows_typing() {
    let mut buf = EditBuffer::from_document(&Document::new("Hello")).unwrap();
    buf.set_decoration_at_caret(Some(Decoration::Text(
        TextDecoration::builder().bold().build(),
    )));
    buf.append(" World").unwrap();
    buf.set_decoration_at_caret(None);
    buf.append("!").unwrap();

    let models = buf.table().decoration_model_list();
    let weights: Vec<_> = models
        .iter()
        .map(|m| m.decoration.as_text().and_then(|t| t.weight))
        .collect();
    assert_eq!(
        weights,
        vec![Some(FontWeight::Normal), Some(FontWeight::Bold)]
    );
    assert_eq!(models[1].length, 7);
}

#[test]
fn listeners_observe_edits_and_undo() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut buf = EditBuffer::from_document(&Document::new("ab")).unwrap();
    let sink = Rc::clone(&events);
    let id = buf.add_listener(move |event| sink.borrow_mut().push(event.clone()));

    buf.delete(0, 1).unwrap();
    buf.undo();
    buf.redo();
    assert!(buf.remove_listener(id));
    buf.undo();

    assert_eq!(
        *events.borrow(),
        vec![
            ChangeEvent::Delete {
                position: 0,
                length: 1
            },
            ChangeEvent::Insert {
                text: "a".to_string(),
                position: 0
            },
            ChangeEvent::Delete {
                position: 0,
                length: 1
            },
        ]
    );
}

#[test]
fn paragraph_join_keeps_first_paragraph_style() {
    let mut buf = EditBuffer::from_document(&Document::new("one\ntwo")).unwrap();
    let right = ParagraphDecoration::builder()
        .alignment(TextAlignment::Right)
        .build();
    buf.decorate(0, 0, right).unwrap();
    buf.delete(3, 1).unwrap();

    assert_eq!(buf.text(), "onetwo");
    let paragraph = buf.table().paragraph_decoration_at_caret(5).unwrap();
    assert_eq!(paragraph.alignment, Some(TextAlignment::Right));
    assert_eq!(buf.table().decoration_model_list().len(), 1);
}

#[test]
fn selection_conversion_snaps_to_units() {
    let table = PieceTable::new(&Document::new("a🎉b")).unwrap();
    assert_eq!(table.text().chars().count(), 3);
    assert_eq!(table.internal_selection(Selection::new(3, 0)), Selection::new(0, 3));

    let flag = PieceTable::new(&Document::new("x🇫🇷y")).unwrap();
    assert_eq!(flag.text_length(), 3);
    assert_eq!(flag.internal_position(2), 1);
    assert_eq!(flag.internal_position(3), 2);
}

#[test]
fn units_are_parsed_per_insert() {
    common::init_logging();
    let mut buf = EditBuffer::new();
    buf.insert("👍", 0).unwrap();
    buf.insert("🏽", 1).unwrap();
    assert_eq!(buf.text(), "👍🏽");
    assert_eq!(buf.text_length(), 2);

    // Reopening the saved text joins the modifier with its base.
    let reopened = EditBuffer::from_document(&buf.save(2)).unwrap();
    assert_eq!(reopened.text(), "👍🏽");
    assert_eq!(reopened.text_length(), 1);
}

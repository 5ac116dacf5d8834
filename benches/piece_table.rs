//! Piece table performance benchmarks.

#![allow(clippy::semicolon_if_nothing_returned)]

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use richtext_core::decoration::TextDecoration;
use richtext_core::{Document, EditBuffer, PieceTable, convert_text_to_units};
use std::hint::black_box;

fn sample_text(paragraphs: usize) -> String {
    "The quick brown fox 🦊 jumps over the lazy dog 🐶.\n".repeat(paragraphs)
}

fn unit_parsing(c: &mut Criterion) {
    let plain = "x".repeat(10_000);
    c.bench_function("convert_units_plain_10k", |b| {
        b.iter(|| convert_text_to_units(black_box(&plain)));
    });

    let mixed = sample_text(200);
    c.bench_function("convert_units_mixed_200", |b| {
        b.iter(|| convert_text_to_units(black_box(&mixed)));
    });
}

fn table_creation(c: &mut Criterion) {
    let document = Document::new(sample_text(200));
    c.bench_function("piece_table_new_200", |b| {
        b.iter(|| PieceTable::new(black_box(&document)));
    });
}

fn typing(c: &mut Criterion) {
    let document = Document::new(sample_text(200));

    c.bench_function("editbuffer_type_100_chars_mid", |b| {
        b.iter_batched(
            || EditBuffer::from_document(&document).unwrap(),
            |mut buf| {
                let mut at = buf.text_length() / 2;
                for _ in 0..100 {
                    buf.insert("a", at).unwrap();
                    at += 1;
                }
                buf
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("editbuffer_append_100_chars", |b| {
        b.iter_batched(
            || EditBuffer::from_document(&document).unwrap(),
            |mut buf| {
                for _ in 0..100 {
                    buf.append("a").unwrap();
                }
                buf
            },
            BatchSize::SmallInput,
        );
    });
}

fn undo_redo(c: &mut Criterion) {
    let document = Document::new(sample_text(50));
    let mut buf = EditBuffer::from_document(&document).unwrap();
    for i in 0..200 {
        buf.insert("z", (i * 7) % buf.text_length()).unwrap();
    }

    c.bench_function("editbuffer_undo_redo_200", |b| {
        b.iter(|| {
            while buf.undo() {}
            while buf.redo() {}
        });
    });
}

fn reads(c: &mut Criterion) {
    let document = Document::new(sample_text(200));
    let mut buf = EditBuffer::from_document(&document).unwrap();
    let bold = TextDecoration::builder().bold().build();
    for i in (0..buf.text_length()).step_by(97) {
        buf.decorate(i, (i + 5).min(buf.text_length()), bold.clone())
            .unwrap();
    }

    c.bench_function("piece_table_text", |b| {
        b.iter(|| black_box(buf.table()).text());
    });

    c.bench_function("piece_table_decoration_model_list", |b| {
        b.iter(|| black_box(buf.table()).decoration_model_list());
    });

    c.bench_function("piece_table_internal_position", |b| {
        b.iter(|| black_box(buf.table()).internal_position(black_box(5_000)));
    });

    c.bench_function("piece_table_char_at", |b| {
        b.iter(|| black_box(buf.table()).char_at(black_box(4_321)));
    });

    // One plain text unit, so every read lands deep inside it.
    let plain = PieceTable::new(&Document::new("a".repeat(80_000))).unwrap();
    c.bench_function("character_iterator_scan_80k", |b| {
        b.iter(|| {
            let mut it = black_box(&plain).character_iterator();
            let mut count = 0usize;
            let mut c = it.first();
            while c.is_some() {
                count += 1;
                c = it.next_char();
            }
            count
        });
    });
}

criterion_group!(
    benches,
    unit_parsing,
    table_creation,
    typing,
    undo_redo,
    reads
);
criterion_main!(benches);

//! Piece table over an original and an append-only addition buffer.
//!
//! The document is the concatenation of its pieces. Each piece names a range
//! of one backing [`UnitBuffer`] and carries exactly one decoration pair, so
//! an edit never copies document content: it replaces a short run of pieces
//! with a new run. Every mutation is first planned into an [`Edit`] (a
//! [`Splice`] plus the events it produces) and then applied; applying the
//! inverse splice restores the previous piece list exactly.
//!
//! Positions are internal positions unless a method says otherwise.
//!
//! # Examples
//!
//! ```
//! use richtext_core::{Document, PieceTable};
//!
//! let table = PieceTable::new(&Document::new("Hello 👋")).unwrap();
//! assert_eq!(table.text(), "Hello 👋");
//! assert_eq!(table.text_length(), 7);
//! assert_eq!(table.internal_position(8), 7);
//! ```

use super::cursor::{CharacterIterator, PieceIndex};
use super::piece::{BufferKind, Piece};
use crate::decoration::{Decoration, DecorationUpdate, ParagraphDecoration};
use crate::document::{DecorationModel, Document, Selection};
use crate::error::{Error, Result};
use crate::event::{ChangeEvent, ChangeListeners, ListenerId};
use crate::unit::{ContentUnit, TABLE_SEPARATOR, UnitBuffer, convert_text_to_units};
use std::cell::OnceCell;
use std::ops::Range;
use std::rc::Rc;

/// Replacement of `removed` by `inserted` at piece index `index`.
#[derive(Clone, Debug, PartialEq)]
pub struct Splice {
    index: usize,
    removed: Vec<Piece>,
    inserted: Vec<Piece>,
}

impl Splice {
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn removed(&self) -> &[Piece] {
        &self.removed
    }

    #[must_use]
    pub fn inserted(&self) -> &[Piece] {
        &self.inserted
    }
}

/// A planned mutation: the splice and the events announcing it in each
/// direction.
#[derive(Clone, Debug, PartialEq)]
pub struct Edit {
    splice: Splice,
    forward: ChangeEvent,
    backward: ChangeEvent,
}

impl Edit {
    #[must_use]
    pub fn splice(&self) -> &Splice {
        &self.splice
    }

    /// Event fired when the edit is applied.
    #[must_use]
    pub fn forward_event(&self) -> &ChangeEvent {
        &self.forward
    }

    /// Event fired when the edit is reverted.
    #[must_use]
    pub fn backward_event(&self) -> &ChangeEvent {
        &self.backward
    }
}

/// Decorated run of equal adjacent pieces, in both coordinate spaces.
struct Run {
    internal_start: usize,
    internal_len: usize,
    export_start: usize,
    export_len: usize,
    decoration: Decoration,
    paragraph: Option<ParagraphDecoration>,
}

/// The document buffer.
#[derive(Debug)]
pub struct PieceTable {
    original: UnitBuffer,
    addition: UnitBuffer,
    pieces: Vec<Piece>,
    text_length: usize,
    base_decoration: Rc<Decoration>,
    base_paragraph: Option<Rc<ParagraphDecoration>>,
    decoration_at_caret: Option<Decoration>,
    index: OnceCell<PieceIndex>,
    listeners: ChangeListeners,
}

impl Default for PieceTable {
    fn default() -> Self {
        Self::from_parts(
            UnitBuffer::new(),
            Vec::new(),
            Decoration::default(),
            Some(ParagraphDecoration::resolved_default()),
        )
    }
}

impl PieceTable {
    /// Build a table from a document, one piece per non-empty decoration
    /// run.
    pub fn new(document: &Document) -> Result<Self> {
        document.validate()?;

        let mut original = UnitBuffer::new();
        let mut pieces = Vec::with_capacity(document.decorations.len());
        let mut rest = document.text.as_str();

        for model in &document.decorations {
            let split = rest
                .char_indices()
                .nth(model.length)
                .map_or(rest.len(), |(i, _)| i);
            let (chunk, tail) = rest.split_at(split);
            rest = tail;
            if chunk.is_empty() {
                continue;
            }

            let mut units = convert_text_to_units(chunk);
            if let Decoration::Image(image) = &model.decoration {
                for unit in &mut units {
                    if let ContentUnit::Image(url) = unit {
                        if url.is_empty() {
                            url.clone_from(&image.url);
                        }
                    }
                }
            }
            let start = original.len();
            original.append_all(units);
            pieces.push(Piece::new(
                BufferKind::Original,
                start,
                original.len() - start,
                model.decoration.clone(),
                model.paragraph_decoration.clone(),
            ));
        }

        let (base_decoration, base_paragraph) = match document.decorations.first() {
            Some(model) if model.decoration.as_text().is_some() => {
                (model.decoration.clone(), model.paragraph_decoration.clone())
            }
            Some(model) => (Decoration::default(), model.paragraph_decoration.clone()),
            None => (
                Decoration::default(),
                Some(ParagraphDecoration::resolved_default()),
            ),
        };

        Ok(Self::from_parts(
            original,
            pieces,
            base_decoration,
            base_paragraph,
        ))
    }

    fn from_parts(
        original: UnitBuffer,
        pieces: Vec<Piece>,
        base_decoration: Decoration,
        base_paragraph: Option<ParagraphDecoration>,
    ) -> Self {
        let text_length = pieces.iter().map(Piece::length).sum();
        Self {
            original,
            addition: UnitBuffer::new(),
            pieces,
            text_length,
            base_decoration: Rc::new(base_decoration),
            base_paragraph: base_paragraph.map(Rc::new),
            decoration_at_caret: None,
            index: OnceCell::new(),
            listeners: ChangeListeners::new(),
        }
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Internal length of the document.
    #[must_use]
    pub fn text_length(&self) -> usize {
        self.text_length
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text_length == 0
    }

    /// The live pieces in document order.
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Backing buffer of a piece source.
    #[must_use]
    pub fn backing(&self, kind: BufferKind) -> &UnitBuffer {
        match kind {
            BufferKind::Original => &self.original,
            BufferKind::Addition => &self.addition,
        }
    }

    /// Pieces with their index and text position.
    pub fn walk_pieces(&self) -> impl Iterator<Item = (usize, usize, &Piece)> + '_ {
        self.pieces
            .iter()
            .enumerate()
            .scan(0usize, |position, (i, piece)| {
                let at = *position;
                *position += piece.length();
                Some((i, at, piece))
            })
    }

    /// Full exportable text.
    #[must_use]
    pub fn text(&self) -> String {
        self.pieces
            .iter()
            .map(|p| self.backing(p.source()).text_range(p.start(), p.end()))
            .collect()
    }

    /// Full internal text.
    #[must_use]
    pub fn internal_text(&self) -> String {
        self.pieces
            .iter()
            .map(|p| self.backing(p.source()).internal_text_range(p.start(), p.end()))
            .collect()
    }

    /// Exportable text of the internal range `start..end`.
    pub fn text_range(&self, start: usize, end: usize) -> Result<String> {
        Error::check_range(start, end, self.text_length)?;
        Ok(self.collect_range(start, end, UnitBuffer::text_range))
    }

    /// Internal text of `start..end`.
    pub fn internal_text_range(&self, start: usize, end: usize) -> Result<String> {
        Error::check_range(start, end, self.text_length)?;
        Ok(self.collect_range(start, end, UnitBuffer::internal_text_range))
    }

    fn collect_range(
        &self,
        start: usize,
        end: usize,
        read: fn(&UnitBuffer, usize, usize) -> String,
    ) -> String {
        let mut out = String::new();
        for (_, pos, piece) in self.overlapping(start, end) {
            let from = start.saturating_sub(pos);
            let to = (end - pos).min(piece.length());
            out.push_str(&read(
                self.backing(piece.source()),
                piece.start() + from,
                piece.start() + to,
            ));
        }
        out
    }

    /// Visit every unit in `start..end` with the run decoration covering it.
    pub fn walk_fragments<F>(&self, start: usize, end: usize, mut visit: F) -> Result<()>
    where
        F: FnMut(&ContentUnit, &Decoration),
    {
        Error::check_range(start, end, self.text_length)?;
        for (_, pos, piece) in self.overlapping(start, end) {
            let from = start.saturating_sub(pos);
            let to = (end - pos).min(piece.length());
            let units = self
                .backing(piece.source())
                .segments(piece.start() + from, piece.start() + to);
            for unit in &units {
                visit(unit, piece.decoration());
            }
        }
        Ok(())
    }

    /// Internal character at `pos`, with the table separator read as a
    /// space.
    pub fn char_at(&self, pos: usize) -> Result<char> {
        let c = self.internal_char_at(pos)?;
        Ok(if c == TABLE_SEPARATOR { ' ' } else { c })
    }

    /// Raw internal character at `pos`.
    pub fn internal_char_at(&self, pos: usize) -> Result<char> {
        let out_of_range = Error::OutOfRange {
            position: pos,
            length: self.text_length,
        };
        let Some((idx, piece_pos)) = self.piece_at(pos) else {
            return Err(out_of_range);
        };
        let piece = &self.pieces[idx];
        self.backing(piece.source())
            .internal_char(piece.start() + pos - piece_pos)
            .ok_or(out_of_range)
    }

    /// Bidirectional iterator over the internal text.
    #[must_use]
    pub fn character_iterator(&self) -> CharacterIterator<'_> {
        CharacterIterator::new(self)
    }

    /// Drop the cached piece offsets and line feeds. They are rebuilt on
    /// next use.
    pub fn reset_character_iterator(&mut self) {
        self.index.take();
    }

    /// Positions of every line feed, ascending.
    #[must_use]
    pub fn line_feeds(&self) -> &[usize] {
        &self.piece_index().line_feeds
    }

    /// Paragraph ranges. Each ends after its line feed; the last one runs
    /// to the end of the text and may be empty.
    #[must_use]
    pub fn paragraphs(&self) -> Vec<Range<usize>> {
        let mut out = Vec::with_capacity(self.line_feeds().len() + 1);
        let mut start = 0;
        for &lf in self.line_feeds() {
            out.push(start..lf + 1);
            start = lf + 1;
        }
        out.push(start..self.text_length);
        out
    }

    /// The paragraph containing `pos`, including its line feed.
    #[must_use]
    pub fn paragraph_range(&self, pos: usize) -> Range<usize> {
        let lfs = self.line_feeds();
        let i = lfs.partition_point(|&lf| lf < pos);
        let start = if i == 0 { 0 } else { lfs[i - 1] + 1 };
        let end = lfs.get(i).map_or(self.text_length, |&lf| lf + 1);
        start..end
    }

    /// Internal position for an exportable position. Positions inside a
    /// multi-char unit map to the unit; positions past the end clamp.
    #[must_use]
    pub fn internal_position(&self, exportable: usize) -> usize {
        let mut remaining = exportable;
        let mut internal = 0;
        for piece in &self.pieces {
            for unit in self.backing(piece.source()).segments(piece.start(), piece.end()) {
                let export_len = unit.text_len();
                if remaining < export_len {
                    return internal + if unit.is_text() { remaining } else { 0 };
                }
                remaining -= export_len;
                internal += unit.internal_len();
            }
        }
        internal
    }

    /// Exportable position for an internal position.
    #[must_use]
    pub fn exportable_position(&self, internal: usize) -> usize {
        let mut remaining = internal;
        let mut exportable = 0;
        for piece in &self.pieces {
            for unit in self.backing(piece.source()).segments(piece.start(), piece.end()) {
                let internal_len = unit.internal_len();
                if remaining < internal_len {
                    return exportable + remaining;
                }
                remaining -= internal_len;
                exportable += unit.text_len();
            }
        }
        exportable
    }

    /// Convert an exportable selection to internal positions.
    #[must_use]
    pub fn internal_selection(&self, selection: Selection) -> Selection {
        Selection::new(
            self.internal_position(selection.start),
            self.internal_position(selection.end),
        )
    }

    /// Text decoration for content typed at `pos`.
    ///
    /// The sticky decoration set with [`set_decoration_at_caret`] wins;
    /// otherwise the nearest text run at or before the caret decides.
    ///
    /// [`set_decoration_at_caret`]: Self::set_decoration_at_caret
    #[must_use]
    pub fn decoration_at_caret(&self, pos: usize) -> Decoration {
        let inherited = self.text_decoration_before(pos);
        match &self.decoration_at_caret {
            Some(sticky) => sticky.normalize(&inherited),
            None => inherited,
        }
    }

    /// Paragraph decoration of the paragraph holding `pos`.
    #[must_use]
    pub fn paragraph_decoration_at_caret(&self, pos: usize) -> Option<ParagraphDecoration> {
        self.paragraph_rc_at(pos).as_deref().cloned()
    }

    /// Set or clear the decoration used for the next typed text.
    pub fn set_decoration_at_caret(&mut self, decoration: Option<Decoration>) {
        self.decoration_at_caret = decoration;
    }

    /// The sticky caret decoration, if any.
    #[must_use]
    pub fn sticky_decoration(&self) -> Option<&Decoration> {
        self.decoration_at_caret.as_ref()
    }

    /// Adjacent pieces with equal decorations merged into runs, in internal
    /// coordinates. Runs tile `0..text_length()`.
    #[must_use]
    pub fn decoration_model_list(&self) -> Vec<DecorationModel> {
        self.runs()
            .into_iter()
            .map(|run| {
                DecorationModel::new(
                    run.internal_start,
                    run.internal_len,
                    run.decoration,
                    run.paragraph,
                )
            })
            .collect()
    }

    /// Snapshot as a document in exportable coordinates.
    #[must_use]
    pub fn to_document(&self, caret: usize) -> Document {
        let mut decorations: Vec<DecorationModel> = self
            .runs()
            .into_iter()
            .map(|run| {
                DecorationModel::new(run.export_start, run.export_len, run.decoration, run.paragraph)
            })
            .collect();
        if decorations.is_empty() {
            decorations.push(DecorationModel::new(
                0,
                0,
                (*self.base_decoration).clone(),
                self.base_paragraph.as_deref().cloned(),
            ));
        }
        Document {
            text: self.text(),
            decorations,
            caret_position: self.exportable_position(caret.min(self.text_length)),
        }
    }

    fn runs(&self) -> Vec<Run> {
        let mut runs: Vec<Run> = Vec::new();
        let mut current: Option<&Piece> = None;
        let mut internal = 0;
        let mut export = 0;

        for piece in &self.pieces {
            let export_len: usize = self
                .backing(piece.source())
                .segments(piece.start(), piece.end())
                .iter()
                .map(ContentUnit::text_len)
                .sum();
            match (current, runs.last_mut()) {
                (Some(prev), Some(run)) if prev.same_decorations(piece) => {
                    run.internal_len += piece.length();
                    run.export_len += export_len;
                }
                _ => runs.push(Run {
                    internal_start: internal,
                    internal_len: piece.length(),
                    export_start: export,
                    export_len,
                    decoration: piece.decoration().clone(),
                    paragraph: piece.paragraph_decoration().cloned(),
                }),
            }
            current = Some(piece);
            internal += piece.length();
            export += export_len;
        }
        runs
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    /// Register a change listener.
    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        self.listeners.add(listener)
    }

    /// Unregister a change listener.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    // ------------------------------------------------------------------
    // Planning
    // ------------------------------------------------------------------

    /// Plan appending `text` at the end of the document.
    ///
    /// Appended content takes the sticky caret decoration if set, else the
    /// decoration of the trailing text run.
    pub fn plan_append(&mut self, text: &str) -> Option<Edit> {
        let units = convert_text_to_units(text);
        if units.is_empty() {
            return None;
        }
        let decoration = self.decoration_at_caret(self.text_length);
        let paragraph = self.trailing_paragraph();
        Some(self.plan_insert_units(units, self.text_length, decoration, paragraph))
    }

    /// Plan inserting `text` at `pos`.
    pub fn plan_insert(&mut self, text: &str, pos: usize) -> Result<Option<Edit>> {
        Error::check_position(pos, self.text_length)?;
        if pos == self.text_length {
            return Ok(self.plan_append(text));
        }
        let units = convert_text_to_units(text);
        if units.is_empty() {
            return Ok(None);
        }
        let decoration = self.decoration_at_caret(pos);
        let paragraph = self.paragraph_rc_at(pos);
        Ok(Some(self.plan_insert_units(units, pos, decoration, paragraph)))
    }

    /// Plan deleting `len` positions from `pos`. `len` is clamped to the
    /// remaining text; `pos` is not.
    ///
    /// The first piece after the cut takes the paragraph decoration in
    /// effect just before the cut when that decoration is set, so joining
    /// two paragraphs keeps the first one's paragraph style.
    pub fn plan_delete(&mut self, pos: usize, len: usize) -> Result<Option<Edit>> {
        Error::check_position(pos, self.text_length)?;
        let len = len.min(self.text_length - pos);
        if len == 0 {
            return Ok(None);
        }
        let end = pos + len;
        let Some((first, first_pos)) = self.piece_at(pos) else {
            return Ok(None);
        };

        let mut last = first;
        let mut last_pos = first_pos;
        while last_pos + self.pieces[last].length() < end {
            last_pos += self.pieces[last].length();
            last += 1;
        }

        let removed_text = self.collect_range(pos, end, UnitBuffer::text_range);
        let head = self.pieces[first].piece_before(pos - first_pos);
        let tail = self.pieces[last].piece_from(end - last_pos);

        let inherited = if head.is_empty() {
            first
                .checked_sub(1)
                .and_then(|i| self.pieces[i].paragraph_rc().cloned())
        } else {
            head.paragraph_rc().cloned()
        };

        let mut removed = self.pieces[first..=last].to_vec();
        let mut inserted = Vec::with_capacity(2);
        if !head.is_empty() {
            inserted.push(head);
        }
        if !tail.is_empty() {
            inserted.push(match inherited {
                Some(paragraph) => tail.with_paragraph_rc(Some(paragraph)),
                None => tail,
            });
        } else if let (Some(next), Some(paragraph)) = (self.pieces.get(last + 1), inherited) {
            if next.paragraph_rc() != Some(&paragraph) {
                removed.push(next.clone());
                inserted.push(next.with_paragraph_rc(Some(paragraph)));
            }
        }

        Ok(Some(Edit {
            splice: Splice {
                index: first,
                removed,
                inserted,
            },
            forward: ChangeEvent::Delete {
                position: pos,
                length: len,
            },
            backward: ChangeEvent::Insert {
                text: removed_text,
                position: pos,
            },
        }))
    }

    /// Plan a decoration change over `start..end`.
    ///
    /// Text decorations patch every run in the range and need a non-empty
    /// range. An image decoration inserts one image anchor at `start`.
    /// Paragraph decorations patch every run in the range; a collapsed range
    /// patches the whole piece under the caret.
    pub fn plan_decorate(
        &mut self,
        start: usize,
        end: usize,
        update: &DecorationUpdate,
    ) -> Result<Option<Edit>> {
        match update {
            DecorationUpdate::Image(image) => {
                Error::check_position(start, self.text_length)?;
                let paragraph = self.paragraph_rc_at(start);
                let units = vec![ContentUnit::Image(image.url.clone())];
                Ok(Some(self.plan_insert_units(
                    units,
                    start,
                    Decoration::Image(image.clone()),
                    paragraph,
                )))
            }
            DecorationUpdate::Text(text) => {
                Error::check_range(start, end, self.text_length)?;
                let decoration = Decoration::Text(text.clone());
                Ok(self.plan_rewrite(start, end, start..end, update, |piece| {
                    piece.copy_with_decoration(&decoration)
                }))
            }
            DecorationUpdate::Paragraph(paragraph) => {
                Error::check_range(start, end, self.text_length)?;
                let target = if start < end {
                    start..end
                } else {
                    // At the end the caret belongs to the last piece only
                    // when no line feed closes it.
                    let under_caret = if start < self.text_length {
                        Some(start)
                    } else {
                        start
                            .checked_sub(1)
                            .filter(|&p| self.internal_char_at(p).is_ok_and(|c| c != '\n'))
                    };
                    match under_caret.and_then(|p| self.piece_at(p)) {
                        Some((idx, pos)) => pos..pos + self.pieces[idx].length(),
                        None => return Ok(None),
                    }
                };
                Ok(self.plan_rewrite(target.start, target.end, start..end, update, |piece| {
                    piece.copy_with_paragraph_decoration(paragraph)
                }))
            }
        }
    }

    fn plan_insert_units(
        &mut self,
        units: Vec<ContentUnit>,
        pos: usize,
        decoration: Decoration,
        paragraph: Option<Rc<ParagraphDecoration>>,
    ) -> Edit {
        let text: String = units.iter().map(ContentUnit::text).collect();
        let start = self.addition.len();
        self.addition.append_all(units);
        let length = self.addition.len() - start;
        let piece = Piece::new(BufferKind::Addition, start, length, decoration, None)
            .with_paragraph_rc(paragraph);

        let splice = match self.piece_at(pos) {
            None => Splice {
                index: self.pieces.len(),
                removed: Vec::new(),
                inserted: vec![piece],
            },
            Some((idx, piece_pos)) if piece_pos == pos => Splice {
                index: idx,
                removed: Vec::new(),
                inserted: vec![piece],
            },
            Some((idx, piece_pos)) => {
                let old = &self.pieces[idx];
                let offset = pos - piece_pos;
                Splice {
                    index: idx,
                    removed: vec![old.clone()],
                    inserted: vec![old.piece_before(offset), piece, old.piece_from(offset)],
                }
            }
        };

        Edit {
            splice,
            forward: ChangeEvent::Insert {
                text,
                position: pos,
            },
            backward: ChangeEvent::Delete {
                position: pos,
                length,
            },
        }
    }

    /// Split pieces at `start` and `end` and pass the covered parts through
    /// `rewrite`. Returns `None` when no piece changes.
    fn plan_rewrite<F>(
        &self,
        start: usize,
        end: usize,
        reported: Range<usize>,
        update: &DecorationUpdate,
        rewrite: F,
    ) -> Option<Edit>
    where
        F: Fn(&Piece) -> Piece,
    {
        if start >= end {
            return None;
        }
        let mut index = None;
        let mut removed = Vec::new();
        let mut inserted = Vec::new();
        let mut changed = false;

        for (i, pos, piece) in self.overlapping(start, end) {
            index.get_or_insert(i);
            removed.push(piece.clone());
            let from = start.saturating_sub(pos);
            let to = (end - pos).min(piece.length());
            if from > 0 {
                inserted.push(piece.piece_before(from));
            }
            let covered = piece.slice(from, to);
            let rewritten = rewrite(&covered);
            changed |= !rewritten.same_decorations(&covered);
            inserted.push(rewritten);
            if to < piece.length() {
                inserted.push(piece.piece_from(to));
            }
        }

        if !changed {
            return None;
        }
        let event = ChangeEvent::Decorate {
            start: reported.start,
            end: reported.end,
            decoration: update.clone(),
        };
        Some(Edit {
            splice: Splice {
                index: index?,
                removed,
                inserted,
            },
            forward: event.clone(),
            backward: event,
        })
    }

    // ------------------------------------------------------------------
    // Applying
    // ------------------------------------------------------------------

    /// Apply a planned edit and notify listeners.
    pub fn apply(&mut self, edit: &Edit) {
        let splice = &edit.splice;
        self.replace_run(splice.index, splice.removed.len(), &splice.inserted);
        self.listeners.fire(&edit.forward);
    }

    /// Undo an applied edit and notify listeners.
    pub fn revert(&mut self, edit: &Edit) {
        let splice = &edit.splice;
        self.replace_run(splice.index, splice.inserted.len(), &splice.removed);
        self.listeners.fire(&edit.backward);
    }

    fn replace_run(&mut self, index: usize, count: usize, with: &[Piece]) {
        let end = (index + count).min(self.pieces.len());
        let removed_len: usize = self.pieces[index..end].iter().map(Piece::length).sum();
        let added_len: usize = with.iter().map(Piece::length).sum();
        self.pieces.splice(index..end, with.iter().cloned());
        self.text_length = self.text_length - removed_len + added_len;
        self.index.take();
    }

    /// Rebuild the original buffer from the live pieces and empty the
    /// addition buffer. Adjacent pieces with equal decorations are merged.
    ///
    /// Planned edits refer to backing-buffer offsets, so any edit planned
    /// before compaction must be discarded.
    pub fn compact(&mut self) {
        let mut original = UnitBuffer::new();
        let mut pieces: Vec<Piece> = Vec::new();

        for piece in &self.pieces {
            let units = self
                .backing(piece.source())
                .segments(piece.start(), piece.end());
            let start = original.len();
            original.append_all(units);
            let length = original.len() - start;

            let merged = match pieces.last() {
                Some(prev) if prev.same_decorations(piece) => Some(prev.rebased(
                    BufferKind::Original,
                    prev.start(),
                    prev.length() + length,
                )),
                _ => None,
            };
            match merged {
                Some(grown) => {
                    if let Some(last) = pieces.last_mut() {
                        *last = grown;
                    }
                }
                None => pieces.push(piece.rebased(BufferKind::Original, start, length)),
            }
        }

        self.original = original;
        self.addition = UnitBuffer::new();
        self.pieces = pieces;
        self.index.take();
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn piece_index(&self) -> &PieceIndex {
        self.index.get_or_init(|| PieceIndex::build(self))
    }

    /// Index and text position of the piece containing `pos`.
    pub(crate) fn piece_at(&self, pos: usize) -> Option<(usize, usize)> {
        if pos >= self.text_length {
            return None;
        }
        let starts = &self.piece_index().piece_starts;
        let idx = starts.partition_point(|&s| s <= pos).checked_sub(1)?;
        Some((idx, starts[idx]))
    }

    fn overlapping(
        &self,
        start: usize,
        end: usize,
    ) -> impl Iterator<Item = (usize, usize, &Piece)> + '_ {
        self.walk_pieces()
            .skip_while(move |(_, pos, piece)| pos + piece.length() <= start)
            .take_while(move |(_, pos, _)| *pos < end)
    }

    fn text_decoration_before(&self, pos: usize) -> Decoration {
        if self.text_length > 0 {
            let last_pos = pos.saturating_sub(1).min(self.text_length - 1);
            if let Some((idx, _)) = self.piece_at(last_pos) {
                let before = self.pieces[..=idx].iter().rev();
                let after = self.pieces[idx + 1..].iter();
                if let Some(piece) = before
                    .chain(after)
                    .find(|p| p.decoration().as_text().is_some())
                {
                    return piece.decoration().clone();
                }
            }
        }
        (*self.base_decoration).clone()
    }

    fn paragraph_rc_at(&self, pos: usize) -> Option<Rc<ParagraphDecoration>> {
        match self.piece_at(pos) {
            Some((idx, _)) => self.pieces[idx].paragraph_rc().cloned(),
            None => self.trailing_paragraph(),
        }
    }

    fn trailing_paragraph(&self) -> Option<Rc<ParagraphDecoration>> {
        match self.pieces.last() {
            Some(piece) => piece.paragraph_rc().cloned(),
            None => self.base_paragraph.clone(),
        }
    }
}

//! Ordered unit storage backing a piece table.

use super::ContentUnit;
use crate::error::{Error, Result};

/// Chars between two byte offset checkpoints inside a text unit.
const CHAR_STRIDE: usize = 64;

/// An ordered sequence of content units addressed by internal position.
///
/// Unit start offsets are cached so that locating the unit under a position
/// is a binary search. Appending keeps the cache current; positional insert
/// and removal rebuild it.
///
/// Text units also record the byte offset of every [`CHAR_STRIDE`]th char,
/// so reading or cutting at a position never scans more than one stride.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitBuffer {
    units: Vec<ContentUnit>,
    starts: Vec<usize>,
    checkpoints: Vec<Vec<usize>>,
    len: usize,
}

impl UnitBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding `units`.
    #[must_use]
    pub fn from_units(units: Vec<ContentUnit>) -> Self {
        let mut buffer = Self::new();
        buffer.append_all(units);
        buffer
    }

    /// Append one unit. A text unit following a text unit is merged into it.
    pub fn append(&mut self, unit: ContentUnit) {
        let added = unit.internal_len();
        if added == 0 {
            return;
        }
        match (self.units.last_mut(), unit) {
            (Some(ContentUnit::Text(tail)), ContentUnit::Text(text)) => {
                let chars_before = self.len - self.starts[self.starts.len() - 1];
                if let Some(marks) = self.checkpoints.last_mut() {
                    extend_checkpoints(marks, &text, chars_before, tail.len());
                }
                tail.push_str(&text);
            }
            (_, unit) => {
                self.starts.push(self.len);
                self.checkpoints.push(checkpoints_of(&unit));
                self.units.push(unit);
            }
        }
        self.len += added;
    }

    /// Append every unit in order.
    pub fn append_all(&mut self, units: impl IntoIterator<Item = ContentUnit>) {
        for unit in units {
            self.append(unit);
        }
    }

    /// Insert `unit` at internal position `pos`, splitting a text unit that
    /// straddles the position.
    pub fn insert(&mut self, unit: ContentUnit, pos: usize) -> Result<()> {
        Error::check_position(pos, self.len)?;
        if unit.internal_len() == 0 {
            return Ok(());
        }
        let idx = self.split_at(pos);
        self.checkpoints.insert(idx, checkpoints_of(&unit));
        self.units.insert(idx, unit);
        self.rebuild_starts();
        Ok(())
    }

    /// Remove everything in `start..end`.
    ///
    /// Both boundaries go through the same split path as [`insert`], so a
    /// boundary inside a text unit cuts that unit instead of dropping it.
    ///
    /// [`insert`]: Self::insert
    pub fn remove(&mut self, start: usize, end: usize) -> Result<()> {
        Error::check_range(start, end, self.len)?;
        if start == end {
            return Ok(());
        }
        let first = self.split_at(start);
        let last = self.split_at(end);
        self.units.drain(first..last);
        self.checkpoints.drain(first..last);
        self.rebuild_starts();
        Ok(())
    }

    /// The unit fully covering `start..end`, clipped to the range.
    ///
    /// Returns `None` for an empty range or one crossing a unit boundary.
    #[must_use]
    pub fn unit_with_range(&self, start: usize, end: usize) -> Option<ContentUnit> {
        if start >= end || end > self.len {
            return None;
        }
        let idx = self.unit_index(start);
        let unit_start = self.starts[idx];
        let unit = &self.units[idx];
        if end > unit_start + unit.internal_len() {
            return None;
        }
        Some(self.clip(idx, start - unit_start, end - unit_start))
    }

    /// Units covering `start..end`, with text units clipped to the range.
    #[must_use]
    pub fn segments(&self, start: usize, end: usize) -> Vec<ContentUnit> {
        let end = end.min(self.len);
        let mut out = Vec::new();
        if start >= end {
            return out;
        }
        let mut idx = self.unit_index(start);
        while idx < self.units.len() && self.starts[idx] < end {
            let unit_start = self.starts[idx];
            let unit = &self.units[idx];
            let from = start.saturating_sub(unit_start);
            let to = (end - unit_start).min(unit.internal_len());
            out.push(self.clip(idx, from, to));
            idx += 1;
        }
        out
    }

    /// Internal character at `pos`.
    #[must_use]
    pub fn internal_char(&self, pos: usize) -> Option<char> {
        if pos >= self.len {
            return None;
        }
        let idx = self.unit_index(pos);
        match &self.units[idx] {
            ContentUnit::Text(text) => {
                let offset = pos - self.starts[idx];
                let from = self.checkpoint(idx, offset);
                text[from..].chars().nth(offset % CHAR_STRIDE)
            }
            other => Some(other.anchor()),
        }
    }

    /// Exportable text of `start..end`.
    #[must_use]
    pub fn text_range(&self, start: usize, end: usize) -> String {
        self.segments(start, end)
            .iter()
            .map(ContentUnit::text)
            .collect()
    }

    /// Internal text of `start..end`.
    #[must_use]
    pub fn internal_text_range(&self, start: usize, end: usize) -> String {
        self.segments(start, end)
            .iter()
            .map(ContentUnit::internal_text)
            .collect()
    }

    /// Full exportable text.
    #[must_use]
    pub fn text(&self) -> String {
        self.units.iter().map(ContentUnit::text).collect()
    }

    /// Full internal text.
    #[must_use]
    pub fn internal_text(&self) -> String {
        self.units.iter().map(ContentUnit::internal_text).collect()
    }

    /// Total internal length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The stored units.
    #[must_use]
    pub fn units(&self) -> &[ContentUnit] {
        &self.units
    }

    /// Index of the unit containing `pos` (`pos < len`).
    fn unit_index(&self, pos: usize) -> usize {
        self.starts.partition_point(|&s| s <= pos).saturating_sub(1)
    }

    /// Make `pos` a unit boundary and return the index of the unit starting
    /// there (`units.len()` at the end).
    fn split_at(&mut self, pos: usize) -> usize {
        if pos >= self.len {
            return self.units.len();
        }
        let idx = self.unit_index(pos);
        let offset = pos - self.starts[idx];
        if offset == 0 {
            return idx;
        }
        // Only text units are longer than one position.
        if let ContentUnit::Text(text) = &self.units[idx] {
            let at = self.byte_offset(idx, offset);
            let left = ContentUnit::Text(text[..at].to_string());
            let right = ContentUnit::Text(text[at..].to_string());
            self.checkpoints[idx] = checkpoints_of(&left);
            self.checkpoints.insert(idx + 1, checkpoints_of(&right));
            self.units[idx] = left;
            self.units.insert(idx + 1, right);
            self.starts.insert(idx + 1, pos);
        }
        idx + 1
    }

    /// Byte offset of the checkpoint at or before char `offset` of unit `idx`.
    fn checkpoint(&self, idx: usize, offset: usize) -> usize {
        self.checkpoints[idx]
            .get(offset / CHAR_STRIDE)
            .copied()
            .unwrap_or(0)
    }

    /// Byte offset of char `offset` in text unit `idx`, or its byte length
    /// when `offset` is past the end.
    fn byte_offset(&self, idx: usize, offset: usize) -> usize {
        let ContentUnit::Text(text) = &self.units[idx] else {
            return 0;
        };
        let from = self.checkpoint(idx, offset);
        text[from..]
            .char_indices()
            .nth(offset % CHAR_STRIDE)
            .map_or(text.len(), |(i, _)| from + i)
    }

    fn clip(&self, idx: usize, from: usize, to: usize) -> ContentUnit {
        match &self.units[idx] {
            ContentUnit::Text(text) => {
                let (from, to) = (self.byte_offset(idx, from), self.byte_offset(idx, to));
                ContentUnit::Text(text[from..to.max(from)].to_string())
            }
            other => other.clone(),
        }
    }

    fn rebuild_starts(&mut self) {
        self.starts.clear();
        let mut offset = 0;
        for unit in &self.units {
            self.starts.push(offset);
            offset += unit.internal_len();
        }
        self.len = offset;
    }
}

fn checkpoints_of(unit: &ContentUnit) -> Vec<usize> {
    let mut marks = Vec::new();
    if let ContentUnit::Text(text) = unit {
        extend_checkpoints(&mut marks, text, 0, 0);
    }
    marks
}

/// Record checkpoints for `text` appended after `chars_before` chars
/// occupying `bytes_before` bytes.
fn extend_checkpoints(marks: &mut Vec<usize>, text: &str, chars_before: usize, bytes_before: usize) {
    marks.extend(
        text.char_indices()
            .enumerate()
            .filter(|(i, _)| (chars_before + i) % CHAR_STRIDE == 0)
            .map(|(_, (byte, _))| bytes_before + byte),
    );
}

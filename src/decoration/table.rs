//! Table grid decoration carried by a table paragraph.

use super::TextAlignment;
use crate::error::{Error, Result};

/// Shape and per-cell alignment of a table paragraph.
///
/// `cell_alignment` always has `rows` rows of `columns` entries.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableDecoration {
    rows: usize,
    columns: usize,
    cell_alignment: Vec<Vec<TextAlignment>>,
}

impl TableDecoration {
    /// A `rows x columns` grid aligned left. Both dimensions are raised to
    /// at least one.
    #[must_use]
    pub fn new(rows: usize, columns: usize) -> Self {
        let rows = rows.max(1);
        let columns = columns.max(1);
        Self {
            rows,
            columns,
            cell_alignment: vec![vec![TextAlignment::Left; columns]; rows],
        }
    }

    /// Build from an explicit alignment grid. Ragged or empty grids are
    /// rejected.
    pub fn from_alignment(cell_alignment: Vec<Vec<TextAlignment>>) -> Result<Self> {
        let rows = cell_alignment.len();
        let columns = cell_alignment.first().map_or(0, Vec::len);
        if rows == 0 || columns == 0 || cell_alignment.iter().any(|r| r.len() != columns) {
            return Err(Error::TableTooSmall { rows, columns });
        }
        Ok(Self {
            rows,
            columns,
            cell_alignment,
        })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }

    #[must_use]
    pub fn cell_alignment(&self) -> &[Vec<TextAlignment>] {
        &self.cell_alignment
    }

    /// Alignment of one cell.
    #[must_use]
    pub fn alignment(&self, row: usize, column: usize) -> Option<TextAlignment> {
        self.cell_alignment.get(row)?.get(column).copied()
    }

    /// Copy with one cell realigned.
    #[must_use]
    pub fn with_alignment(&self, row: usize, column: usize, alignment: TextAlignment) -> Self {
        let mut next = self.clone();
        if let Some(cell) = next.cell_alignment.get_mut(row).and_then(|r| r.get_mut(column)) {
            *cell = alignment;
        }
        next
    }

    /// Copy with a new row at index `at` (`0..=rows`). The new row copies
    /// the alignment of the row it is inserted next to.
    #[must_use]
    pub fn with_row_inserted(&self, at: usize) -> Self {
        let at = at.min(self.rows);
        let template = self.cell_alignment[at.min(self.rows - 1)].clone();
        let mut next = self.clone();
        next.cell_alignment.insert(at, template);
        next.rows += 1;
        next
    }

    /// Copy without row `at`.
    pub fn with_row_removed(&self, at: usize) -> Result<Self> {
        if self.rows <= 1 {
            return Err(Error::TableTooSmall {
                rows: self.rows,
                columns: self.columns,
            });
        }
        let mut next = self.clone();
        next.cell_alignment.remove(at.min(self.rows - 1));
        next.rows -= 1;
        Ok(next)
    }

    /// Copy with a new column at index `at` (`0..=columns`).
    #[must_use]
    pub fn with_column_inserted(&self, at: usize) -> Self {
        let at = at.min(self.columns);
        let mut next = self.clone();
        for row in &mut next.cell_alignment {
            let template = row[at.min(row.len() - 1)];
            row.insert(at, template);
        }
        next.columns += 1;
        next
    }

    /// Copy without column `at`.
    pub fn with_column_removed(&self, at: usize) -> Result<Self> {
        if self.columns <= 1 {
            return Err(Error::TableTooSmall {
                rows: self.rows,
                columns: self.columns,
            });
        }
        let at = at.min(self.columns - 1);
        let mut next = self.clone();
        for row in &mut next.cell_alignment {
            row.remove(at);
        }
        next.columns -= 1;
        Ok(next)
    }
}

//! Table paragraphs.
//!
//! A table is one paragraph whose paragraph decoration carries a
//! [`TableDecoration`]. Its cells are stored row-major and separated by
//! [`TABLE_SEPARATOR`] units, so a `rows x columns` table holds exactly
//! `rows * columns - 1` separators before its line feed. Structural edits
//! are planned as a batch of plain inserts and deletes followed by one
//! paragraph decoration update, which makes them undoable like any other
//! command.

use super::command::Command;
use super::piece_table::PieceTable;
use crate::decoration::{DecorationUpdate, ParagraphDecoration, TableDecoration};
use crate::error::{Error, Result};
use crate::unit::TABLE_SEPARATOR;
use std::ops::Range;

/// A structural change to the table around a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableEdit {
    InsertRowAbove,
    InsertRowBelow,
    DeleteRow,
    InsertColumnBefore,
    InsertColumnAfter,
    DeleteColumn,
}

/// Cell geometry of one table paragraph.
#[derive(Clone, Debug, PartialEq)]
pub struct TableAddress {
    start: usize,
    /// End of the last cell; the line feed (if any) is at `end`.
    end: usize,
    /// Paragraph end including the line feed.
    paragraph_end: usize,
    separators: Vec<usize>,
    table: TableDecoration,
}

impl TableAddress {
    /// Find the table paragraph containing `pos`.
    pub fn locate(table: &PieceTable, pos: usize) -> Result<Self> {
        let range = table.paragraph_range(pos);
        if range.is_empty() {
            return Err(Error::NotATable { position: pos });
        }
        let grid = table
            .paragraph_decoration_at_caret(range.start)
            .filter(ParagraphDecoration::is_table)
            .and_then(|p| p.table_decoration)
            .ok_or(Error::NotATable { position: pos })?;

        let end = match table.internal_char_at(range.end - 1) {
            Ok('\n') => range.end - 1,
            _ => range.end,
        };
        let separators: Vec<usize> = table
            .internal_text_range(range.start, end)?
            .chars()
            .enumerate()
            .filter(|&(_, c)| c == TABLE_SEPARATOR)
            .map(|(i, _)| range.start + i)
            .collect();

        if separators.len() + 1 != grid.cell_count() {
            return Err(Error::InvalidDocument(format!(
                "table at {} has {} cells but its grid is {}x{}",
                range.start,
                separators.len() + 1,
                grid.rows(),
                grid.columns()
            )));
        }

        Ok(Self {
            start: range.start,
            end,
            paragraph_end: range.end,
            separators,
            table: grid,
        })
    }

    /// First position of the table.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// End of the last cell.
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.table.rows()
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.table.columns()
    }

    #[must_use]
    pub fn table_decoration(&self) -> &TableDecoration {
        &self.table
    }

    /// Row and column of the cell holding `pos`. A position on a separator
    /// belongs to the cell it closes.
    #[must_use]
    pub fn cell_of(&self, pos: usize) -> (usize, usize) {
        let i = self.separators.partition_point(|&s| s < pos);
        (i / self.columns(), i % self.columns())
    }

    /// Content range of a cell, separators excluded.
    #[must_use]
    pub fn cell_range(&self, row: usize, column: usize) -> Range<usize> {
        let i = row * self.columns() + column;
        self.cell_start(i)..self.cell_end(i)
    }

    /// Range from the first cell of `row` to the end of its last cell.
    #[must_use]
    pub fn row_range(&self, row: usize) -> Range<usize> {
        let first = row * self.columns();
        self.cell_start(first)..self.cell_end(first + self.columns() - 1)
    }

    fn cell_start(&self, i: usize) -> usize {
        match i.checked_sub(1) {
            Some(prev) => self.separators[prev] + 1,
            None => self.start,
        }
    }

    fn cell_end(&self, i: usize) -> usize {
        self.separators.get(i).copied().unwrap_or(self.end)
    }

    /// Plan `edit` for the cell holding `pos` as a single undoable command.
    pub fn plan(&self, edit: TableEdit, pos: usize) -> Result<Command> {
        let (row, column) = self.cell_of(pos);
        let rows = self.rows();
        let columns = self.columns();
        let separators = |n: usize| TABLE_SEPARATOR.to_string().repeat(n);

        // Edits run from the last row up so earlier positions stay valid.
        let (mut commands, grid, delta): (Vec<Command>, TableDecoration, isize) = match edit {
            TableEdit::InsertRowAbove => (
                vec![Command::insert(separators(columns), self.row_range(row).start)],
                self.table.with_row_inserted(row),
                signed(columns),
            ),
            TableEdit::InsertRowBelow => (
                vec![Command::insert(separators(columns), self.row_range(row).end)],
                self.table.with_row_inserted(row + 1),
                signed(columns),
            ),
            TableEdit::DeleteRow => {
                let grid = self.table.with_row_removed(row)?;
                let cut = if row + 1 < rows {
                    self.row_range(row).start..self.row_range(row + 1).start
                } else {
                    self.separators[row * columns - 1]..self.end
                };
                let removed = signed(cut.len());
                (vec![Command::delete(cut.start, cut.len())], grid, -removed)
            }
            TableEdit::InsertColumnBefore | TableEdit::InsertColumnAfter => {
                let before = edit == TableEdit::InsertColumnBefore;
                let commands = (0..rows)
                    .rev()
                    .map(|r| {
                        let cell = self.cell_range(r, column);
                        Command::insert(separators(1), if before { cell.start } else { cell.end })
                    })
                    .collect();
                let at = if before { column } else { column + 1 };
                (commands, self.table.with_column_inserted(at), signed(rows))
            }
            TableEdit::DeleteColumn => {
                let grid = self.table.with_column_removed(column)?;
                let commands: Vec<Command> = (0..rows)
                    .rev()
                    .map(|r| {
                        let cell = self.cell_range(r, column);
                        if column + 1 < columns {
                            Command::delete(cell.start, cell.len() + 1)
                        } else {
                            let from = self.cell_range(r, column - 1).end;
                            Command::delete(from, cell.end - from)
                        }
                    })
                    .collect();
                let removed: usize = commands
                    .iter()
                    .map(|c| match c {
                        Command::Delete(d) => d.length(),
                        _ => 0,
                    })
                    .sum();
                (commands, grid, -signed(removed))
            }
        };

        let paragraph_end = self.paragraph_end.saturating_add_signed(delta);
        let update = ParagraphDecoration::builder().table_decoration(grid).build();
        commands.push(Command::decorate(
            self.start,
            paragraph_end,
            DecorationUpdate::Paragraph(update),
        ));
        Ok(Command::batch(table_edit_name(edit), commands))
    }
}

/// Plan inserting an empty `rows x columns` table at `pos`.
///
/// The table becomes its own paragraph: a line feed is inserted first when
/// `pos` is not at a paragraph start.
pub fn insert_table(table: &PieceTable, pos: usize, rows: usize, columns: usize) -> Result<Command> {
    if rows == 0 || columns == 0 {
        return Err(Error::TableTooSmall { rows, columns });
    }
    Error::check_position(pos, table.text_length())?;

    let at_paragraph_start = pos == 0 || table.internal_char_at(pos - 1) == Ok('\n');
    let mut text = String::new();
    if !at_paragraph_start {
        text.push('\n');
    }
    let table_start = pos + text.chars().count();
    let cells = rows * columns - 1;
    text.extend(std::iter::repeat_n(TABLE_SEPARATOR, cells));
    text.push('\n');

    Ok(Command::batch(
        "insert table",
        vec![
            Command::insert(text, pos),
            Command::decorate(
                table_start,
                table_start + cells + 1,
                ParagraphDecoration::table(rows, columns),
            ),
        ],
    ))
}

fn table_edit_name(edit: TableEdit) -> &'static str {
    match edit {
        TableEdit::InsertRowAbove => "insert row above",
        TableEdit::InsertRowBelow => "insert row below",
        TableEdit::DeleteRow => "delete row",
        TableEdit::InsertColumnBefore => "insert column before",
        TableEdit::InsertColumnAfter => "insert column after",
        TableEdit::DeleteColumn => "delete column",
    }
}

fn signed(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    const S: char = TABLE_SEPARATOR;

    fn with_table(text: &str, at: usize, rows: usize, columns: usize) -> PieceTable {
        let mut t = PieceTable::new(&Document::new(text)).unwrap();
        let mut cmd = insert_table(&t, at, rows, columns).unwrap();
        cmd.apply(&mut t).unwrap();
        t
    }

    fn run(t: &mut PieceTable, edit: TableEdit, pos: usize) -> Command {
        let mut cmd = TableAddress::locate(t, pos).unwrap().plan(edit, pos).unwrap();
        cmd.apply(t).unwrap();
        cmd
    }

    fn fill(t: &mut PieceTable, text: &str) {
        // Type one char per cell, last cell first.
        let address = TableAddress::locate(t, 0).unwrap();
        let cells = address.rows() * address.columns();
        for (i, c) in text.chars().enumerate().collect::<Vec<_>>().into_iter().rev() {
            let (r, col) = (i / address.columns(), i % address.columns());
            assert!(i < cells);
            let at = address.cell_range(r, col).start;
            Command::insert(c.to_string(), at).apply(t).unwrap();
        }
    }

    #[test]
    fn test_insert_table_shape() {
        let t = with_table("", 0, 2, 3);
        assert_eq!(t.internal_text(), format!("{S}{S}{S}{S}{S}\n"));
        let address = TableAddress::locate(&t, 0).unwrap();
        assert_eq!((address.rows(), address.columns()), (2, 3));
        assert_eq!(address.cell_of(0), (0, 0));
        assert_eq!(address.cell_of(3), (1, 0));
        assert_eq!(address.row_range(1), 3..5);
    }

    #[test]
    fn test_insert_table_mid_paragraph() {
        let t = with_table("ab", 1, 1, 2);
        assert_eq!(t.internal_text(), format!("a\n{S}\nb"));
        assert!(TableAddress::locate(&t, 0).is_err());
        let address = TableAddress::locate(&t, 2).unwrap();
        assert_eq!(address.start(), 2);
        assert_eq!(address.end(), 3);
    }

    #[test]
    fn test_rejects_empty_grid() {
        let t = PieceTable::default();
        assert_eq!(
            insert_table(&t, 0, 0, 2).err(),
            Some(Error::TableTooSmall { rows: 0, columns: 2 })
        );
    }

    #[test]
    fn test_cells_and_rows() {
        let mut t = with_table("", 0, 2, 2);
        fill(&mut t, "abcd");
        assert_eq!(t.internal_text(), format!("a{S}b{S}c{S}d\n"));
        let address = TableAddress::locate(&t, 0).unwrap();
        assert_eq!(address.cell_range(1, 1), 6..7);
        assert_eq!(address.cell_of(1), (0, 0));
        assert_eq!(address.cell_of(2), (0, 1));
    }

    #[test]
    fn test_delete_last_column() {
        let mut t = with_table("", 0, 1, 2);
        fill(&mut t, "ab");
        run(&mut t, TableEdit::DeleteColumn, 2);
        assert_eq!(t.internal_text(), "a\n");
        let address = TableAddress::locate(&t, 0).unwrap();
        assert_eq!((address.rows(), address.columns()), (1, 1));
    }

    #[test]
    fn test_minimum_table() {
        let t = with_table("", 0, 1, 1);
        let address = TableAddress::locate(&t, 0).unwrap();
        assert_eq!(
            address.plan(TableEdit::DeleteRow, 0).err(),
            Some(Error::TableTooSmall { rows: 1, columns: 1 })
        );
        assert!(address.plan(TableEdit::DeleteColumn, 0).is_err());
    }

    #[test]
    fn test_row_edits() {
        let mut t = with_table("", 0, 2, 2);
        fill(&mut t, "abcd");

        run(&mut t, TableEdit::InsertRowBelow, 0);
        assert_eq!(t.internal_text(), format!("a{S}b{S}{S}{S}c{S}d\n"));
        run(&mut t, TableEdit::DeleteRow, 4);
        assert_eq!(t.internal_text(), format!("a{S}b{S}c{S}d\n"));

        let mut above = run(&mut t, TableEdit::InsertRowAbove, 0);
        assert_eq!(t.internal_text(), format!("{S}{S}a{S}b{S}c{S}d\n"));
        let address = TableAddress::locate(&t, 0).unwrap();
        assert_eq!(address.rows(), 3);

        assert!(above.revert(&mut t));
        assert_eq!(TableAddress::locate(&t, 0).unwrap().rows(), 2);
        assert_eq!(above.apply(&mut t), Ok(true));

        // Deleting the last row removes the separator before it.
        let end = TableAddress::locate(&t, 0).unwrap().end();
        run(&mut t, TableEdit::DeleteRow, end);
        assert_eq!(t.internal_text(), format!("{S}{S}a{S}b\n"));
    }

    #[test]
    fn test_column_edits() {
        let mut t = with_table("", 0, 2, 2);
        fill(&mut t, "abcd");

        run(&mut t, TableEdit::InsertColumnAfter, 0);
        assert_eq!(t.internal_text(), format!("a{S}{S}b{S}c{S}{S}d\n"));
        run(&mut t, TableEdit::DeleteColumn, 2);
        assert_eq!(t.internal_text(), format!("a{S}b{S}c{S}d\n"));

        run(&mut t, TableEdit::InsertColumnBefore, 0);
        assert_eq!(t.internal_text(), format!("{S}a{S}b{S}{S}c{S}d\n"));
        let address = TableAddress::locate(&t, 0).unwrap();
        assert_eq!((address.rows(), address.columns()), (2, 3));

        run(&mut t, TableEdit::DeleteColumn, 0);
        assert_eq!(t.internal_text(), format!("a{S}b{S}c{S}d\n"));
    }

    #[test]
    fn test_locate_outside_table() {
        let t = PieceTable::new(&Document::new("plain")).unwrap();
        assert_eq!(
            TableAddress::locate(&t, 2),
            Err(Error::NotATable { position: 2 })
        );
    }
}

//! Undoable commands over a [`PieceTable`].
//!
//! A command plans its edit on first apply and keeps it. Redo replays the
//! kept edit, so it never appends to the addition buffer twice, and revert
//! restores the exact piece list the command replaced.

use super::piece_table::{Edit, PieceTable};
use crate::decoration::DecorationUpdate;
use crate::error::Result;

/// What happened the first time a leaf command ran.
#[derive(Clone, Debug, Default, PartialEq)]
enum Outcome {
    #[default]
    Pending,
    Unchanged,
    Changed(Edit),
}

impl Outcome {
    fn run<F>(&mut self, table: &mut PieceTable, plan: F) -> Result<bool>
    where
        F: FnOnce(&mut PieceTable) -> Result<Option<Edit>>,
    {
        match self {
            Self::Changed(edit) => {
                table.apply(edit);
                Ok(true)
            }
            Self::Unchanged => Ok(false),
            Self::Pending => match plan(table)? {
                Some(edit) => {
                    table.apply(&edit);
                    *self = Self::Changed(edit);
                    Ok(true)
                }
                None => {
                    *self = Self::Unchanged;
                    Ok(false)
                }
            },
        }
    }

    fn undo(&self, table: &mut PieceTable) -> bool {
        match self {
            Self::Changed(edit) => {
                table.revert(edit);
                true
            }
            Self::Pending | Self::Unchanged => false,
        }
    }

    fn edit(&self) -> Option<&Edit> {
        match self {
            Self::Changed(edit) => Some(edit),
            Self::Pending | Self::Unchanged => None,
        }
    }
}

/// Append text at the end of the document.
#[derive(Clone, Debug, PartialEq)]
pub struct AppendCommand {
    text: String,
    outcome: Outcome,
}

impl AppendCommand {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Insert text at a position.
#[derive(Clone, Debug, PartialEq)]
pub struct InsertCommand {
    text: String,
    position: usize,
    outcome: Outcome,
}

impl InsertCommand {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Delete a range.
#[derive(Clone, Debug, PartialEq)]
pub struct DeleteCommand {
    position: usize,
    length: usize,
    outcome: Outcome,
}

impl DeleteCommand {
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }
}

/// Change the decoration of a range.
#[derive(Clone, Debug, PartialEq)]
pub struct DecorateCommand {
    start: usize,
    end: usize,
    update: DecorationUpdate,
    outcome: Outcome,
}

impl DecorateCommand {
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    #[must_use]
    pub fn update(&self) -> &DecorationUpdate {
        &self.update
    }
}

/// Several commands applied and undone as one.
///
/// Sub-commands run in order and revert in reverse order. If one fails,
/// the ones already applied are reverted before the error is returned.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchCommand {
    description: String,
    commands: Vec<Command>,
}

impl BatchCommand {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            commands: Vec::new(),
        }
    }

    /// Add a command to the batch.
    #[must_use]
    pub fn add_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Add several commands to the batch.
    #[must_use]
    pub fn add_commands(mut self, commands: impl IntoIterator<Item = Command>) -> Self {
        self.commands.extend(commands);
        self
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    fn apply(&mut self, table: &mut PieceTable) -> Result<bool> {
        let mut changed = false;
        for i in 0..self.commands.len() {
            match self.commands[i].apply(table) {
                Ok(c) => changed |= c,
                Err(err) => {
                    for done in self.commands[..i].iter().rev() {
                        done.revert(table);
                    }
                    return Err(err);
                }
            }
        }
        Ok(changed)
    }

    fn revert(&self, table: &mut PieceTable) -> bool {
        self.commands
            .iter()
            .rev()
            .fold(false, |reverted, command| command.revert(table) | reverted)
    }
}

/// An undoable edit request.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Append(AppendCommand),
    Insert(InsertCommand),
    Delete(DeleteCommand),
    Decorate(DecorateCommand),
    Batch(BatchCommand),
}

impl Command {
    #[must_use]
    pub fn append(text: impl Into<String>) -> Self {
        Self::Append(AppendCommand {
            text: text.into(),
            outcome: Outcome::Pending,
        })
    }

    #[must_use]
    pub fn insert(text: impl Into<String>, position: usize) -> Self {
        Self::Insert(InsertCommand {
            text: text.into(),
            position,
            outcome: Outcome::Pending,
        })
    }

    #[must_use]
    pub fn delete(position: usize, length: usize) -> Self {
        Self::Delete(DeleteCommand {
            position,
            length,
            outcome: Outcome::Pending,
        })
    }

    #[must_use]
    pub fn decorate(start: usize, end: usize, update: impl Into<DecorationUpdate>) -> Self {
        Self::Decorate(DecorateCommand {
            start,
            end,
            update: update.into(),
            outcome: Outcome::Pending,
        })
    }

    #[must_use]
    pub fn batch(description: impl Into<String>, commands: Vec<Self>) -> Self {
        Self::Batch(BatchCommand::new(description).add_commands(commands))
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Append(_) => "append",
            Self::Insert(_) => "insert",
            Self::Delete(_) => "delete",
            Self::Decorate(_) => "decorate",
            Self::Batch(batch) => batch.description(),
        }
    }

    /// Apply the command. The first call plans the edit; later calls replay
    /// it. Returns whether the document changed.
    pub fn apply(&mut self, table: &mut PieceTable) -> Result<bool> {
        match self {
            Self::Append(cmd) => {
                let text = &cmd.text;
                cmd.outcome.run(table, |t| Ok(t.plan_append(text)))
            }
            Self::Insert(cmd) => {
                let (text, position) = (&cmd.text, cmd.position);
                cmd.outcome.run(table, |t| t.plan_insert(text, position))
            }
            Self::Delete(cmd) => {
                let (position, length) = (cmd.position, cmd.length);
                cmd.outcome.run(table, |t| t.plan_delete(position, length))
            }
            Self::Decorate(cmd) => {
                let (start, end, update) = (cmd.start, cmd.end, &cmd.update);
                cmd.outcome.run(table, |t| t.plan_decorate(start, end, update))
            }
            Self::Batch(batch) => batch.apply(table),
        }
    }

    /// Revert the command. A command that never changed the document is a
    /// no-op. Returns whether the document changed.
    pub fn revert(&self, table: &mut PieceTable) -> bool {
        match self {
            Self::Append(cmd) => cmd.outcome.undo(table),
            Self::Insert(cmd) => cmd.outcome.undo(table),
            Self::Delete(cmd) => cmd.outcome.undo(table),
            Self::Decorate(cmd) => cmd.outcome.undo(table),
            Self::Batch(batch) => batch.revert(table),
        }
    }

    /// The edit captured on first apply, for leaf commands.
    #[must_use]
    pub fn edit(&self) -> Option<&Edit> {
        match self {
            Self::Append(cmd) => cmd.outcome.edit(),
            Self::Insert(cmd) => cmd.outcome.edit(),
            Self::Delete(cmd) => cmd.outcome.edit(),
            Self::Decorate(cmd) => cmd.outcome.edit(),
            Self::Batch(_) => None,
        }
    }
}

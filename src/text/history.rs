//! Undo and redo stacks with a saved marker.

use super::command::Command;
use super::piece_table::PieceTable;
use crate::error::Result;
use crate::event::{LogLevel, emit_log};

/// Default maximum number of commands to retain for undo.
pub const DEFAULT_MAX_HISTORY_DEPTH: usize = 1000;

/// Executes commands and keeps them for undo and redo.
///
/// The saved marker records the undo depth at the last save. The document
/// is modified whenever the current depth differs from it, and for good
/// once the saved state can no longer be reached (its command was pruned
/// or its redo branch was discarded).
#[derive(Debug)]
pub struct CommandManager {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    saved_depth: Option<usize>,
    max_depth: usize,
}

impl Default for CommandManager {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_MAX_HISTORY_DEPTH)
    }
}

impl CommandManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager keeping at most `max_depth` undo entries.
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            saved_depth: Some(0),
            max_depth: max_depth.max(1),
        }
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Apply `command` and push it for undo.
    ///
    /// A command that changes nothing is dropped and leaves the redo stack
    /// alone. Errors are returned without touching either stack.
    pub fn execute(&mut self, mut command: Command, table: &mut PieceTable) -> Result<bool> {
        match command.apply(table) {
            Ok(true) => {
                emit_log(LogLevel::Debug, &format!("execute {}", command.name()));
                self.discard_redo();
                self.undo_stack.push(command);
                self.prune();
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(err) => {
                emit_log(
                    LogLevel::Warn,
                    &format!("rejected {}: {err}", command.name()),
                );
                Err(err)
            }
        }
    }

    /// Revert the most recent command. Returns `false` if there is nothing
    /// to undo.
    pub fn undo(&mut self, table: &mut PieceTable) -> bool {
        let Some(command) = self.undo_stack.pop() else {
            return false;
        };
        command.revert(table);
        emit_log(LogLevel::Debug, &format!("undo {}", command.name()));
        self.redo_stack.push(command);
        true
    }

    /// Reapply the most recently undone command. Returns `false` if there is
    /// nothing to redo.
    pub fn redo(&mut self, table: &mut PieceTable) -> bool {
        let Some(mut command) = self.redo_stack.pop() else {
            return false;
        };
        match command.apply(table) {
            Ok(_) => {
                emit_log(LogLevel::Debug, &format!("redo {}", command.name()));
                self.undo_stack.push(command);
                true
            }
            Err(err) => {
                emit_log(
                    LogLevel::Error,
                    &format!("redo {} failed: {err}", command.name()),
                );
                false
            }
        }
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of commands available for undo.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Record the current state as saved.
    pub fn mark_saved(&mut self) {
        self.saved_depth = Some(self.undo_stack.len());
    }

    /// Check if the document differs from the last saved state.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.saved_depth != Some(self.undo_stack.len())
    }

    /// Forget all history. The saved marker is kept only if the current
    /// state was the saved one.
    pub fn clear(&mut self) {
        let saved = !self.is_modified();
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.saved_depth = saved.then_some(0);
    }

    fn discard_redo(&mut self) {
        if self.redo_stack.is_empty() {
            return;
        }
        self.redo_stack.clear();
        if self.saved_depth.is_some_and(|d| d > self.undo_stack.len()) {
            self.saved_depth = None;
        }
    }

    fn prune(&mut self) {
        if self.undo_stack.len() <= self.max_depth {
            return;
        }
        let excess = self.undo_stack.len() - self.max_depth;
        self.undo_stack.drain(..excess);
        self.saved_depth = self.saved_depth.and_then(|d| d.checked_sub(excess));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn table(text: &str) -> PieceTable {
        PieceTable::new(&Document::new(text)).unwrap()
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut t = table("");
        let mut history = CommandManager::new();
        history.execute(Command::append("Hello"), &mut t).unwrap();
        history.execute(Command::append(" World"), &mut t).unwrap();
        assert_eq!(t.text(), "Hello World");

        assert!(history.undo(&mut t));
        assert_eq!(t.text(), "Hello");
        assert!(history.can_redo());
        assert!(history.redo(&mut t));
        assert_eq!(t.text(), "Hello World");
        assert!(!history.redo(&mut t));
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut t = table("abc");
        let mut history = CommandManager::new();
        assert!(!history.undo(&mut t));
        assert!(!history.can_undo());
        assert!(!history.is_modified());
    }

    #[test]
    fn test_new_command_clears_redo() {
        let mut t = table("");
        let mut history = CommandManager::new();
        history.execute(Command::append("a"), &mut t).unwrap();
        history.undo(&mut t);
        assert!(history.can_redo());
        history.execute(Command::append("b"), &mut t).unwrap();
        assert!(!history.can_redo());
        assert_eq!(t.text(), "b");
    }

    #[test]
    fn test_noop_keeps_redo() {
        let mut t = table("");
        let mut history = CommandManager::new();
        history.execute(Command::append("a"), &mut t).unwrap();
        history.undo(&mut t);
        assert_eq!(history.execute(Command::append(""), &mut t), Ok(false));
        assert!(history.can_redo());
    }

    #[test]
    fn test_error_leaves_history() {
        let mut t = table("ab");
        let mut history = CommandManager::new();
        assert!(history.execute(Command::delete(7, 1), &mut t).is_err());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_saved_marker() {
        let mut t = table("");
        let mut history = CommandManager::new();
        history.execute(Command::append("a"), &mut t).unwrap();
        history.mark_saved();
        assert!(!history.is_modified());

        history.execute(Command::append("b"), &mut t).unwrap();
        assert!(history.is_modified());
        history.undo(&mut t);
        assert!(!history.is_modified());

        // Undo past the save, then branch: the saved state is unreachable.
        history.undo(&mut t);
        history.redo(&mut t);
        history.redo(&mut t);
        history.mark_saved();
        history.undo(&mut t);
        history.execute(Command::append("c"), &mut t).unwrap();
        assert!(history.is_modified());
        history.undo(&mut t);
        assert!(history.is_modified());
    }

    #[test]
    fn test_max_depth_prunes_oldest() {
        let mut t = table("");
        let mut history = CommandManager::with_max_depth(2);
        for s in ["a", "b", "c"] {
            history.execute(Command::append(s), &mut t).unwrap();
        }
        assert_eq!(history.undo_depth(), 2);
        assert!(history.undo(&mut t));
        assert!(history.undo(&mut t));
        assert!(!history.undo(&mut t));
        assert_eq!(t.text(), "a");
        // The initial state fell off the stack.
        assert!(history.is_modified());
    }
}

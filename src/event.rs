//! Change events and the log callback.
//!
//! Every successful mutation of a [`PieceTable`](crate::text::PieceTable)
//! produces a [`ChangeEvent`] that is delivered synchronously to the
//! listeners registered on that table before the mutating call returns.
//! Diagnostic messages go through a process-wide log callback.

use crate::decoration::DecorationUpdate;
use std::fmt;
use std::sync::{Mutex, OnceLock};

/// Log level for debug callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

type LogCallback = Box<dyn Fn(LogLevel, &str) + Send + Sync + 'static>;

fn log_callback() -> &'static Mutex<Option<LogCallback>> {
    static CALLBACK: OnceLock<Mutex<Option<LogCallback>>> = OnceLock::new();
    CALLBACK.get_or_init(|| Mutex::new(None))
}

/// Set the global log callback.
pub fn set_log_callback<F>(callback: F)
where
    F: Fn(LogLevel, &str) + Send + Sync + 'static,
{
    if let Ok(mut guard) = log_callback().lock() {
        *guard = Some(Box::new(callback));
    }
}

/// Remove the global log callback.
pub fn clear_log_callback() {
    if let Ok(mut guard) = log_callback().lock() {
        *guard = None;
    }
}

/// Emit a log event.
pub fn emit_log(level: LogLevel, message: &str) {
    if let Ok(guard) = log_callback().lock() {
        if let Some(callback) = guard.as_ref() {
            callback(level, message);
        }
    }
}

/// A mutation observed on a piece table.
///
/// Positions are internal positions.
#[derive(Clone, Debug, PartialEq)]
pub enum ChangeEvent {
    /// `text` (exportable form) now starts at `position`.
    Insert { text: String, position: usize },
    /// `length` internal units starting at `position` were removed.
    Delete { position: usize, length: usize },
    /// `start..end` was redecorated.
    Decorate {
        start: usize,
        end: usize,
        decoration: DecorationUpdate,
    },
}

/// Handle returned by [`ChangeListeners::add`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ChangeEvent) + 'static>;

/// Registry of change listeners owned by a piece table.
#[derive(Default)]
pub struct ChangeListeners {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl ChangeListeners {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn add<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Unregister a listener. Returns `false` if the id was unknown.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Deliver an event to every listener in registration order.
    pub fn fire(&mut self, event: &ChangeEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Check if no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for ChangeListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeListeners")
            .field("len", &self.listeners.len())
            .finish()
    }
}

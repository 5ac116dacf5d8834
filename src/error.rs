//! Error types for the rich text core.

use std::fmt;

/// Result type alias for buffer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for buffer, command and table operations.
///
/// Range errors are contract violations by the caller. They are reported
/// instead of clamped so that command bookkeeping never records an edit that
/// differs from the one requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A single position lies outside `[0, length]`.
    OutOfRange { position: usize, length: usize },
    /// A range is reversed or extends past the end of the text.
    InvalidRange {
        start: usize,
        end: usize,
        length: usize,
    },
    /// Document decorations do not tile the document text.
    InvalidDocument(String),
    /// The position is not inside a table paragraph.
    NotATable { position: usize },
    /// A table edit would leave fewer than one row or column.
    TableTooSmall { rows: usize, columns: usize },
}

impl Error {
    /// Check `position <= length`.
    pub(crate) fn check_position(position: usize, length: usize) -> Result<()> {
        if position > length {
            Err(Self::OutOfRange { position, length })
        } else {
            Ok(())
        }
    }

    /// Check `start <= end <= length`.
    pub(crate) fn check_range(start: usize, end: usize, length: usize) -> Result<()> {
        if start > end || end > length {
            Err(Self::InvalidRange { start, end, length })
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { position, length } => {
                write!(f, "position {position} out of range for text of length {length}")
            }
            Self::InvalidRange { start, end, length } => {
                write!(
                    f,
                    "invalid range {start}..{end} for text of length {length}"
                )
            }
            Self::InvalidDocument(reason) => write!(f, "invalid document: {reason}"),
            Self::NotATable { position } => {
                write!(f, "position {position} is not inside a table")
            }
            Self::TableTooSmall { rows, columns } => {
                write!(f, "table cannot shrink below 1x1 (currently {rows}x{columns})")
            }
        }
    }
}

impl std::error::Error for Error {}

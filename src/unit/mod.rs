//! Content units: the atomic pieces of document content.
//!
//! A document is a sequence of [`ContentUnit`]s. Plain text runs occupy one
//! internal position per `char`; every other unit (emoji, image, inline
//! block) occupies exactly one internal position, represented in the
//! internal text by a single placeholder character. Exportable text is what
//! a clipboard or file sees.
//!
//! ```
//! use richtext_core::unit::{ContentUnit, Emoji, OBJECT_ANCHOR};
//!
//! let thumbs = ContentUnit::Emoji(Emoji::new("👍🏽"));
//! assert_eq!(thumbs.internal_len(), 1);
//! assert_eq!(thumbs.internal_text(), OBJECT_ANCHOR.to_string());
//! assert_eq!(thumbs.text(), "👍🏽");
//! ```

mod buffer;
mod parse;

pub use buffer::UnitBuffer;
pub use parse::convert_text_to_units;

use std::borrow::Cow;

/// Placeholder for emoji and image units in internal text.
pub const OBJECT_ANCHOR: char = '\u{FFFC}';
/// Table cell separator. Also a block token on its own.
pub const TABLE_SEPARATOR: char = '\u{200B}';
/// Opens a named inline block token in exportable text.
pub const BLOCK_START: char = '\u{E000}';
/// Closes a named inline block token in exportable text.
pub const BLOCK_END: char = '\u{E001}';

/// A single emoji grapheme cluster.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Emoji {
    sequence: String,
}

impl Emoji {
    /// Wrap an emoji code point sequence.
    #[must_use]
    pub fn new(sequence: impl Into<String>) -> Self {
        Self {
            sequence: sequence.into(),
        }
    }

    /// The code point sequence.
    #[must_use]
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Lowercase hex code points joined by `-`, e.g. `1f44d-1f3fd`.
    #[must_use]
    pub fn id(&self) -> String {
        self.sequence
            .chars()
            .map(|c| format!("{:x}", u32::from(c)))
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// The atomic content primitive.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContentUnit {
    /// A run of plain text.
    Text(String),
    /// One emoji.
    Emoji(Emoji),
    /// An image reference by URL.
    Image(String),
    /// An inline block token; the table separator is the most common one.
    Block(String),
}

impl ContentUnit {
    /// The table cell separator block.
    #[must_use]
    pub fn separator() -> Self {
        Self::Block(TABLE_SEPARATOR.to_string())
    }

    /// Check if this is a plain text run.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Check if this is the table cell separator block.
    #[must_use]
    pub fn is_separator(&self) -> bool {
        matches!(self, Self::Block(token) if is_separator_token(token))
    }

    /// Exportable text.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text),
            Self::Emoji(emoji) => Cow::Borrowed(emoji.sequence()),
            Self::Image(_) => Cow::Owned(OBJECT_ANCHOR.to_string()),
            Self::Block(token) if is_separator_token(token) => Cow::Borrowed(token),
            Self::Block(token) => Cow::Owned(format!("{BLOCK_START}{token}{BLOCK_END}")),
        }
    }

    /// Internal text: the text itself, or one placeholder character.
    #[must_use]
    pub fn internal_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text),
            _ => Cow::Owned(self.anchor().to_string()),
        }
    }

    /// Number of internal positions this unit occupies.
    #[must_use]
    pub fn internal_len(&self) -> usize {
        match self {
            Self::Text(text) => text.chars().count(),
            _ => 1,
        }
    }

    /// Number of chars in the exportable text.
    #[must_use]
    pub fn text_len(&self) -> usize {
        match self {
            Self::Text(text) => text.chars().count(),
            other => other.text().chars().count(),
        }
    }

    /// The placeholder standing for a non-text unit in internal text.
    pub(crate) fn anchor(&self) -> char {
        if self.is_separator() {
            TABLE_SEPARATOR
        } else {
            OBJECT_ANCHOR
        }
    }
}

fn is_separator_token(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next() == Some(TABLE_SEPARATOR) && chars.next().is_none()
}

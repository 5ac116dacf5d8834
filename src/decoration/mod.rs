//! Decoration values for text runs, images, paragraphs and tables.
//!
//! Decorations are plain values with optional fields. A decoration applied
//! to existing content is a patch: it is resolved against the decoration it
//! replaces with `normalize`, so changing one attribute leaves every other
//! attribute as it was.
//!
//! # Examples
//!
//! ```
//! use richtext_core::decoration::{FontWeight, TextDecoration};
//! use richtext_core::Rgba;
//!
//! let base = TextDecoration::resolved_default();
//! let bold = TextDecoration::builder().bold().build();
//! let resolved = bold.normalize(&base);
//!
//! assert_eq!(resolved.weight, Some(FontWeight::Bold));
//! assert_eq!(resolved.foreground, Some(Rgba::BLACK));
//! ```

mod paragraph;
mod table;
mod text;

pub use paragraph::{
    ParagraphDecoration, ParagraphDecorationBuilder, ParagraphType, TextAlignment,
};
pub use table::TableDecoration;
pub use text::{FontPosture, FontWeight, TextDecoration, TextDecorationBuilder};

/// Decoration of an image anchor.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageDecoration {
    pub url: String,
    /// Display width, or `None` for the image's natural size.
    pub width: Option<f64>,
    /// Display height, or `None` for the image's natural size.
    pub height: Option<f64>,
}

impl ImageDecoration {
    /// An image shown at its natural size.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            width: None,
            height: None,
        }
    }

    /// Set the display size.
    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// The run decoration carried by a piece.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Decoration {
    Text(TextDecoration),
    Image(ImageDecoration),
}

impl Default for Decoration {
    fn default() -> Self {
        Self::Text(TextDecoration::resolved_default())
    }
}

impl Decoration {
    /// The text decoration, if this is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&TextDecoration> {
        match self {
            Self::Text(deco) => Some(deco),
            Self::Image(_) => None,
        }
    }

    /// The image decoration, if this is one.
    #[must_use]
    pub fn as_image(&self) -> Option<&ImageDecoration> {
        match self {
            Self::Image(deco) => Some(deco),
            Self::Text(_) => None,
        }
    }

    /// Resolve `self` over `fallback`.
    ///
    /// A text patch over a text decoration merges field by field. An image
    /// decoration is never patched by text styling, and a replacement of a
    /// different kind wins outright.
    #[must_use]
    pub fn normalize(&self, fallback: &Self) -> Self {
        match (self, fallback) {
            (Self::Text(patch), Self::Text(base)) => Self::Text(patch.normalize(base)),
            (Self::Text(_), Self::Image(image)) => Self::Image(image.clone()),
            (other, _) => other.clone(),
        }
    }
}

impl From<TextDecoration> for Decoration {
    fn from(deco: TextDecoration) -> Self {
        Self::Text(deco)
    }
}

impl From<ImageDecoration> for Decoration {
    fn from(deco: ImageDecoration) -> Self {
        Self::Image(deco)
    }
}

/// A decoration change requested through `decorate`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecorationUpdate {
    /// Patch the text decoration of every run in the range.
    Text(TextDecoration),
    /// Insert an image anchor at the start of the range.
    Image(ImageDecoration),
    /// Patch the paragraph decoration of every run in the range.
    Paragraph(ParagraphDecoration),
}

impl From<TextDecoration> for DecorationUpdate {
    fn from(deco: TextDecoration) -> Self {
        Self::Text(deco)
    }
}

impl From<ImageDecoration> for DecorationUpdate {
    fn from(deco: ImageDecoration) -> Self {
        Self::Image(deco)
    }
}

impl From<ParagraphDecoration> for DecorationUpdate {
    fn from(deco: ParagraphDecoration) -> Self {
        Self::Paragraph(deco)
    }
}

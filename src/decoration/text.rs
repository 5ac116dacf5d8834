//! Text-run decoration.

use crate::color::Rgba;

/// Font slant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontPosture {
    #[default]
    Regular,
    Italic,
}

/// Font weight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontWeight {
    Thin,
    Light,
    #[default]
    Normal,
    Medium,
    Bold,
    Black,
}

/// Styling of a run of text.
///
/// Every field is optional. A partially filled decoration describes a change
/// ("make this bold") and is resolved against the decoration already in place
/// with [`normalize`](Self::normalize): set fields win, unset fields are taken
/// from the fallback.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextDecoration {
    pub foreground: Option<Rgba>,
    pub background: Option<Rgba>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub posture: Option<FontPosture>,
    pub weight: Option<FontWeight>,
    pub strikethrough: Option<bool>,
    pub underline: Option<bool>,
    /// Hyperlink target. Optional even in a resolved decoration.
    pub url: Option<String>,
}

impl TextDecoration {
    /// Default font family of a resolved decoration.
    pub const DEFAULT_FONT_FAMILY: &'static str = "System";
    /// Default font size of a resolved decoration.
    pub const DEFAULT_FONT_SIZE: f64 = 14.0;

    /// Start a builder with every field unset.
    #[must_use]
    pub fn builder() -> TextDecorationBuilder {
        TextDecorationBuilder::default()
    }

    /// A fully resolved decoration with the default look.
    #[must_use]
    pub fn resolved_default() -> Self {
        Self {
            foreground: Some(Rgba::BLACK),
            background: Some(Rgba::TRANSPARENT),
            font_family: Some(Self::DEFAULT_FONT_FAMILY.to_string()),
            font_size: Some(Self::DEFAULT_FONT_SIZE),
            posture: Some(FontPosture::Regular),
            weight: Some(FontWeight::Normal),
            strikethrough: Some(false),
            underline: Some(false),
            url: None,
        }
    }

    /// Fill every unset field from `fallback`.
    #[must_use]
    pub fn normalize(&self, fallback: &Self) -> Self {
        Self {
            foreground: self.foreground.or(fallback.foreground),
            background: self.background.or(fallback.background),
            font_family: self
                .font_family
                .clone()
                .or_else(|| fallback.font_family.clone()),
            font_size: self.font_size.or(fallback.font_size),
            posture: self.posture.or(fallback.posture),
            weight: self.weight.or(fallback.weight),
            strikethrough: self.strikethrough.or(fallback.strikethrough),
            underline: self.underline.or(fallback.underline),
            url: self.url.clone().or_else(|| fallback.url.clone()),
        }
    }

    /// Check that every field except `url` is set.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        self.foreground.is_some()
            && self.background.is_some()
            && self.font_family.is_some()
            && self.font_size.is_some()
            && self.posture.is_some()
            && self.weight.is_some()
            && self.strikethrough.is_some()
            && self.underline.is_some()
    }

    /// Check that no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Builder for partial text decorations.
#[derive(Clone, Debug, Default)]
pub struct TextDecorationBuilder {
    decoration: TextDecoration,
}

impl TextDecorationBuilder {
    #[must_use]
    pub fn foreground(mut self, color: Rgba) -> Self {
        self.decoration.foreground = Some(color);
        self
    }

    #[must_use]
    pub fn background(mut self, color: Rgba) -> Self {
        self.decoration.background = Some(color);
        self
    }

    #[must_use]
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.decoration.font_family = Some(family.into());
        self
    }

    #[must_use]
    pub fn font_size(mut self, size: f64) -> Self {
        self.decoration.font_size = Some(size);
        self
    }

    #[must_use]
    pub fn posture(mut self, posture: FontPosture) -> Self {
        self.decoration.posture = Some(posture);
        self
    }

    /// Shorthand for [`FontPosture::Italic`].
    #[must_use]
    pub fn italic(self) -> Self {
        self.posture(FontPosture::Italic)
    }

    #[must_use]
    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.decoration.weight = Some(weight);
        self
    }

    /// Shorthand for [`FontWeight::Bold`].
    #[must_use]
    pub fn bold(self) -> Self {
        self.weight(FontWeight::Bold)
    }

    #[must_use]
    pub fn strikethrough(mut self, on: bool) -> Self {
        self.decoration.strikethrough = Some(on);
        self
    }

    #[must_use]
    pub fn underline(mut self, on: bool) -> Self {
        self.decoration.underline = Some(on);
        self
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.decoration.url = Some(url.into());
        self
    }

    /// Build the decoration.
    #[must_use]
    pub fn build(self) -> TextDecoration {
        self.decoration
    }
}

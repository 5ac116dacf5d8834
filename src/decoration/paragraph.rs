//! Paragraph decoration.

use super::TableDecoration;

/// Horizontal alignment of a paragraph or table cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Leading graphic of a paragraph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParagraphType {
    #[default]
    None,
    NumberedList,
    BulletedList,
    /// The paragraph holds a table; see [`TableDecoration`].
    Table,
}

/// Styling of a whole paragraph.
///
/// Like [`TextDecoration`](super::TextDecoration), every field is optional
/// and [`normalize`](Self::normalize) fills gaps from a fallback. The table
/// decoration is only inherited while the resolved graphic type is
/// [`ParagraphType::Table`], so switching a table paragraph to a list drops
/// its grid.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParagraphDecoration {
    pub spacing: Option<f64>,
    pub alignment: Option<TextAlignment>,
    pub top_inset: Option<f64>,
    pub right_inset: Option<f64>,
    pub bottom_inset: Option<f64>,
    pub left_inset: Option<f64>,
    pub indentation_level: Option<u32>,
    pub graphic_type: Option<ParagraphType>,
    pub table_decoration: Option<TableDecoration>,
}

impl ParagraphDecoration {
    /// Start a builder with every field unset.
    #[must_use]
    pub fn builder() -> ParagraphDecorationBuilder {
        ParagraphDecorationBuilder::default()
    }

    /// A fully resolved plain paragraph.
    #[must_use]
    pub fn resolved_default() -> Self {
        Self {
            spacing: Some(0.0),
            alignment: Some(TextAlignment::Left),
            top_inset: Some(0.0),
            right_inset: Some(0.0),
            bottom_inset: Some(0.0),
            left_inset: Some(0.0),
            indentation_level: Some(0),
            graphic_type: Some(ParagraphType::None),
            table_decoration: None,
        }
    }

    /// A resolved table paragraph of the given shape.
    #[must_use]
    pub fn table(rows: usize, columns: usize) -> Self {
        Self {
            graphic_type: Some(ParagraphType::Table),
            table_decoration: Some(TableDecoration::new(rows, columns)),
            ..Self::resolved_default()
        }
    }

    /// Fill every unset field from `fallback`.
    #[must_use]
    pub fn normalize(&self, fallback: &Self) -> Self {
        let graphic_type = self.graphic_type.or(fallback.graphic_type);
        let table_decoration = if graphic_type == Some(ParagraphType::Table) {
            self.table_decoration
                .clone()
                .or_else(|| fallback.table_decoration.clone())
        } else {
            None
        };
        Self {
            spacing: self.spacing.or(fallback.spacing),
            alignment: self.alignment.or(fallback.alignment),
            top_inset: self.top_inset.or(fallback.top_inset),
            right_inset: self.right_inset.or(fallback.right_inset),
            bottom_inset: self.bottom_inset.or(fallback.bottom_inset),
            left_inset: self.left_inset.or(fallback.left_inset),
            indentation_level: self.indentation_level.or(fallback.indentation_level),
            graphic_type,
            table_decoration,
        }
    }

    /// Check that every scalar field is set.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        self.spacing.is_some()
            && self.alignment.is_some()
            && self.top_inset.is_some()
            && self.right_inset.is_some()
            && self.bottom_inset.is_some()
            && self.left_inset.is_some()
            && self.indentation_level.is_some()
            && self.graphic_type.is_some()
    }

    /// Check if this paragraph is a table with a grid.
    #[must_use]
    pub fn is_table(&self) -> bool {
        self.graphic_type == Some(ParagraphType::Table) && self.table_decoration.is_some()
    }
}

/// Builder for partial paragraph decorations.
#[derive(Clone, Debug, Default)]
pub struct ParagraphDecorationBuilder {
    decoration: ParagraphDecoration,
}

impl ParagraphDecorationBuilder {
    #[must_use]
    pub fn spacing(mut self, spacing: f64) -> Self {
        self.decoration.spacing = Some(spacing);
        self
    }

    #[must_use]
    pub fn alignment(mut self, alignment: TextAlignment) -> Self {
        self.decoration.alignment = Some(alignment);
        self
    }

    /// Set all four insets (top, right, bottom, left).
    #[must_use]
    pub fn insets(mut self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        self.decoration.top_inset = Some(top);
        self.decoration.right_inset = Some(right);
        self.decoration.bottom_inset = Some(bottom);
        self.decoration.left_inset = Some(left);
        self
    }

    #[must_use]
    pub fn indentation_level(mut self, level: u32) -> Self {
        self.decoration.indentation_level = Some(level);
        self
    }

    #[must_use]
    pub fn graphic_type(mut self, graphic_type: ParagraphType) -> Self {
        self.decoration.graphic_type = Some(graphic_type);
        self
    }

    /// Set the table grid; also marks the paragraph as a table.
    #[must_use]
    pub fn table_decoration(mut self, table: TableDecoration) -> Self {
        self.decoration.graphic_type = Some(ParagraphType::Table);
        self.decoration.table_decoration = Some(table);
        self
    }

    /// Build the decoration.
    #[must_use]
    pub fn build(self) -> ParagraphDecoration {
        self.decoration
    }
}

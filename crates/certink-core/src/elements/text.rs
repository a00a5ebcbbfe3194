//! Text element.

use super::{ElementBase, ElementId};
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Average glyph advance as a fraction of the font size, used when the
/// measured width is not known.
pub const CHAR_WIDTH_FACTOR: f64 = 0.6;
/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Horizontal alignment; also decides what the stored `x` anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// `x` is the left edge.
    #[default]
    Left,
    /// `x` is the horizontal midpoint.
    Center,
    /// `x` is the right edge.
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Kind of text content. Everything except `Custom` is a token the
/// rendering service replaces with recipient data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderType {
    #[default]
    Custom,
    Name,
    Number,
    Date,
    Instructure,
    RoleCaption,
    Title,
}

impl PlaceholderType {
    /// The literal token stored as text, `None` for custom text.
    pub fn token(&self) -> Option<&'static str> {
        match self {
            PlaceholderType::Custom => None,
            PlaceholderType::Name => Some("{{name}}"),
            PlaceholderType::Number => Some("{{number}}"),
            PlaceholderType::Date => Some("{{date}}"),
            PlaceholderType::Instructure => Some("{{instructure}}"),
            PlaceholderType::RoleCaption => Some("{{role_caption}}"),
            PlaceholderType::Title => Some("{{title}}"),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, PlaceholderType::Custom)
    }

    pub fn all() -> &'static [PlaceholderType] {
        &[
            PlaceholderType::Custom,
            PlaceholderType::Name,
            PlaceholderType::Number,
            PlaceholderType::Date,
            PlaceholderType::Instructure,
            PlaceholderType::RoleCaption,
            PlaceholderType::Title,
        ]
    }
}

/// A text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    #[serde(flatten)]
    pub base: ElementBase,
    pub text: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Logical family name, resolved to an asset on save.
    pub font_family: String,
    /// CSS-style weight as entered (`"400"`, `"700"`, `"bold"`, ...).
    #[serde(default = "default_font_weight")]
    pub font_weight: String,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default)]
    pub placeholder_type: PlaceholderType,
    /// Measured width in pixels, when the front-end has laid the text out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

fn default_font_weight() -> String {
    "400".to_string()
}

impl TextElement {
    pub const DEFAULT_FONT_SIZE: f64 = 24.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "Roboto";

    /// Create custom text.
    pub fn new(id: ElementId, x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            base: ElementBase::new(id, x, y),
            text: text.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            font_weight: default_font_weight(),
            font_style: FontStyle::Normal,
            text_align: TextAlign::Left,
            placeholder_type: PlaceholderType::Custom,
            width: None,
        }
    }

    /// Create a placeholder text carrying the kind's token.
    pub fn placeholder(id: ElementId, x: f64, y: f64, kind: PlaceholderType) -> Self {
        let mut text = Self::new(id, x, y, "");
        text.set_placeholder(kind);
        text
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }

    /// Text of placeholder kinds cannot be edited directly.
    pub fn is_read_only(&self) -> bool {
        !self.placeholder_type.is_custom()
    }

    /// Replace the text of a custom element.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), ValidationError> {
        if self.is_read_only() {
            return Err(ValidationError::ReadOnlyPlaceholder(self.base.id.clone()));
        }
        self.text = text.into();
        self.width = None;
        Ok(())
    }

    /// Switch placeholder kind. Non-custom kinds overwrite the text with
    /// their token; switching back to custom clears the token.
    pub fn set_placeholder(&mut self, kind: PlaceholderType) {
        let was_placeholder = self.is_read_only();
        self.placeholder_type = kind;
        match kind.token() {
            Some(token) => self.text = token.to_string(),
            None if was_placeholder => self.text.clear(),
            None => {}
        }
        self.width = None;
    }

    /// Estimated width from character count and font size.
    pub fn estimated_width(&self) -> f64 {
        let longest = self
            .text
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        longest as f64 * self.font_size * CHAR_WIDTH_FACTOR
    }

    /// Measured width if known, otherwise the estimate.
    pub fn width_or_estimate(&self) -> f64 {
        self.width.unwrap_or_else(|| self.estimated_width())
    }

    pub fn estimated_height(&self) -> f64 {
        let lines = self.text.lines().count().max(1);
        let lines = if self.text.ends_with('\n') { lines + 1 } else { lines };
        lines as f64 * self.font_size * LINE_HEIGHT_FACTOR
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.placeholder_type.is_custom() && self.text.trim().is_empty() {
            return Err(ValidationError::EmptyCustomText(self.base.id.clone()));
        }
        Ok(())
    }
}

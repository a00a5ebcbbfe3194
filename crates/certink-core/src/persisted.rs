//! Persisted layout schema.
//!
//! This is what the data service stores and the rendering service reads:
//! every element in document space, left/top anchored, scale baked into the
//! sizes, fonts resolved and assets given as storage-relative paths.

use crate::elements::{
    ElementId, FontStyle, ImageSizeMode, PlaceholderType, SerializableColor, ShapeType, TextAlign,
};
use serde::{Deserialize, Serialize};

/// Fields shared by every persisted element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedBase {
    pub id: ElementId,
    /// Left edge in points.
    pub x: f64,
    /// Top edge in points.
    pub y: f64,
    #[serde(default)]
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedText {
    #[serde(flatten)]
    pub base: PersistedBase,
    pub text: String,
    pub font_size: f64,
    /// Resolved font asset reference (or the raw family when unmapped).
    pub font_family: String,
    #[serde(default)]
    pub font_weight: String,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default)]
    pub placeholder_type: PlaceholderType,
    /// Text width in points, needed to recover the visual anchor on load.
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedImage {
    #[serde(flatten)]
    pub base: PersistedBase,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub image_size_mode: ImageSizeMode,
    /// Storage-relative asset path.
    pub resolved_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedShape {
    #[serde(flatten)]
    pub base: PersistedBase,
    pub shape_type: ShapeType,
    pub width: f64,
    pub height: f64,
    pub fill_color: SerializableColor,
    pub stroke_color: SerializableColor,
    #[serde(default)]
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedQrCode {
    #[serde(flatten)]
    pub base: PersistedBase,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSignature {
    #[serde(flatten)]
    pub base: PersistedBase,
    /// Final rendered width in points.
    pub width: f64,
    pub height: f64,
    /// Storage-relative path or the signature placeholder token.
    pub resolved_path: String,
}

/// A document-space element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PersistedElement {
    Text(PersistedText),
    Image(PersistedImage),
    Shape(PersistedShape),
    #[serde(rename = "qrcode")]
    QrCode(PersistedQrCode),
    Signature(PersistedSignature),
}

impl PersistedElement {
    pub fn base(&self) -> &PersistedBase {
        match self {
            PersistedElement::Text(e) => &e.base,
            PersistedElement::Image(e) => &e.base,
            PersistedElement::Shape(e) => &e.base,
            PersistedElement::QrCode(e) => &e.base,
            PersistedElement::Signature(e) => &e.base,
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.base().id
    }
}

/// The persisted layout payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedLayout {
    pub name: String,
    /// Storage-relative background path.
    pub background: String,
    #[serde(default)]
    pub elements: Vec<PersistedElement>,
}

impl PersistedLayout {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

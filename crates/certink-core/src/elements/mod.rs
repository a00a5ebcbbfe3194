//! Layout elements.
//!
//! Every element is one variant of [`Element`]; all variants share an
//! [`ElementBase`] carrying the id, the anchor position in editor pixels and
//! the optional rotation/scale fields.

mod image;
mod qr;
mod shape;
mod signature;
mod text;

pub use image::{ImageElement, ImageFormat, ImageSizeMode};
pub use qr::QrCodeElement;
pub use shape::{ShapeElement, ShapeType, UnknownShapeType};
pub use signature::{SIGNATURE_HEIGHT, SIGNATURE_PLACEHOLDER, SIGNATURE_WIDTH, SignatureElement};
pub use text::{FontStyle, PlaceholderType, TextAlign, TextElement};

use crate::error::ValidationError;
use kurbo::{Affine, Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque element identifier, unique within a layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Serializable color representation (RGBA8), stored as a CSS hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or `transparent`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("transparent") {
            return Some(Self::transparent());
        }
        let hex = value.strip_prefix('#')?;
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(hex.get(0..1)?, 16).ok()? * 17;
                let g = u8::from_str_radix(hex.get(1..2)?, 16).ok()? * 17;
                let b = u8::from_str_radix(hex.get(2..3)?, 16).ok()? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Some(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 0 && self.r == 0 && self.g == 0 && self.b == 0 {
            "transparent".to_string()
        } else if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid color '{}'", value))
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_hex()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Normalize an angle in degrees into (-180, 180].
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Fields shared by every element variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementBase {
    pub id: ElementId,
    /// Anchor x in editor pixels (meaning depends on the variant).
    pub x: f64,
    /// Anchor y in editor pixels.
    pub y: f64,
    /// Clockwise rotation in degrees, kept in (-180, 180].
    #[serde(default)]
    pub rotation: f64,
    /// Uniform scale (1.0 = 100%).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
}

impl ElementBase {
    pub fn new(id: ElementId, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            rotation: 0.0,
            scale: None,
            scale_x: None,
            scale_y: None,
        }
    }

    /// Effective horizontal and vertical scale factors.
    ///
    /// The uniform `scale` multiplies the per-axis factors when both are set.
    pub fn effective_scale(&self) -> (f64, f64) {
        let uniform = self.scale.unwrap_or(1.0);
        (
            uniform * self.scale_x.unwrap_or(1.0),
            uniform * self.scale_y.unwrap_or(1.0),
        )
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_rotation(degrees);
    }
}

/// Position, size and rotation of an element, as captured for a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    /// Stored width (before scale); `None` for elements sized by content.
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: f64,
}

/// A layout element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Text(TextElement),
    Image(ImageElement),
    Shape(ShapeElement),
    #[serde(rename = "qrcode")]
    QrCode(QrCodeElement),
    Signature(SignatureElement),
}

impl Element {
    pub fn base(&self) -> &ElementBase {
        match self {
            Element::Text(e) => &e.base,
            Element::Image(e) => &e.base,
            Element::Shape(e) => &e.base,
            Element::QrCode(e) => &e.base,
            Element::Signature(e) => &e.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut ElementBase {
        match self {
            Element::Text(e) => &mut e.base,
            Element::Image(e) => &mut e.base,
            Element::Shape(e) => &mut e.base,
            Element::QrCode(e) => &mut e.base,
            Element::Signature(e) => &mut e.base,
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.base().id
    }

    /// Short lowercase name of the variant.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Text(_) => "text",
            Element::Image(_) => "image",
            Element::Shape(_) => "shape",
            Element::QrCode(_) => "qrcode",
            Element::Signature(_) => "signature",
        }
    }

    pub fn rotation(&self) -> f64 {
        self.base().rotation
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.base_mut().set_rotation(degrees);
    }

    /// Stored (unscaled) size, if the element has one.
    pub fn size(&self) -> Option<(f64, f64)> {
        match self {
            Element::Text(_) => None,
            Element::Image(e) => Some((e.width, e.height)),
            Element::Shape(e) => Some((e.width, e.height)),
            Element::QrCode(e) => Some((e.width, e.height)),
            Element::Signature(e) => Some((e.width, e.height)),
        }
    }

    /// Check that a sized element has a finite, positive width and height.
    pub fn validate_size(&self) -> Result<(), ValidationError> {
        let Some((width, height)) = self.size() else {
            return Ok(());
        };
        for (field, value) in [("width", width), ("height", height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::InvalidValue {
                    field,
                    reason: format!("{} {} must be positive, got {}", self.kind_name(), self.id(), value),
                });
            }
        }
        Ok(())
    }

    /// Whether interactive resize may change this element's size.
    ///
    /// Text is sized by its content, signatures only through `scale`, and
    /// full-mode images are locked to the asset's natural size.
    pub fn is_resizable(&self) -> bool {
        match self {
            Element::Shape(_) | Element::QrCode(_) => true,
            Element::Image(e) => e.image_size_mode == ImageSizeMode::Custom,
            Element::Text(_) | Element::Signature(_) => false,
        }
    }

    /// Capture position, size and rotation.
    pub fn geometry(&self) -> Geometry {
        let base = self.base();
        let size = self.size();
        Geometry {
            x: base.x,
            y: base.y,
            width: size.map(|(w, _)| w),
            height: size.map(|(_, h)| h),
            rotation: base.rotation,
        }
    }

    /// Write back a full geometry. Sizes are ignored for elements whose size
    /// is not freely settable.
    pub fn apply_geometry(&mut self, geometry: Geometry) {
        {
            let base = self.base_mut();
            base.x = geometry.x;
            base.y = geometry.y;
            base.set_rotation(geometry.rotation);
        }
        if let (Some(width), Some(height)) = (geometry.width, geometry.height) {
            match self {
                Element::Image(e) => {
                    e.width = width;
                    e.height = height;
                }
                Element::Shape(e) => {
                    e.width = width;
                    e.height = height;
                }
                Element::QrCode(e) => {
                    e.width = width;
                    e.height = height;
                }
                Element::Text(_) | Element::Signature(_) => {}
            }
        }
    }

    /// Rendered bounding box in editor space, before rotation.
    pub fn visual_bounds(&self) -> Rect {
        let base = self.base();
        let (sx, sy) = base.effective_scale();
        match self {
            Element::Text(t) => {
                let width = t.width_or_estimate() * sx;
                let height = t.estimated_height() * sy;
                let left = match t.text_align {
                    TextAlign::Left => base.x,
                    TextAlign::Center => base.x - width / 2.0,
                    TextAlign::Right => base.x - width,
                };
                Rect::new(left, base.y, left + width, base.y + height)
            }
            _ => {
                let (w, h) = self.size().unwrap_or((0.0, 0.0));
                Rect::new(base.x, base.y, base.x + w * sx, base.y + h * sy)
            }
        }
    }

    /// Midpoint of the rendered bounding box; the pivot for rotation.
    pub fn visual_center(&self) -> Point {
        self.visual_bounds().center()
    }

    /// Transform from un-rotated editor space to the rendered position.
    pub fn rotation_transform(&self) -> Affine {
        Affine::rotate_about(self.rotation().to_radians(), self.visual_center())
    }

    /// Check if a point (editor space) hits this element.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = self.rotation_transform().inverse() * point;
        self.visual_bounds()
            .inflate(tolerance, tolerance)
            .contains(local)
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            Element::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeElement> {
        match self {
            Element::Shape(s) => Some(s),
            _ => None,
        }
    }
}

impl From<TextElement> for Element {
    fn from(e: TextElement) -> Self {
        Element::Text(e)
    }
}

impl From<ImageElement> for Element {
    fn from(e: ImageElement) -> Self {
        Element::Image(e)
    }
}

impl From<ShapeElement> for Element {
    fn from(e: ShapeElement) -> Self {
        Element::Shape(e)
    }
}

impl From<QrCodeElement> for Element {
    fn from(e: QrCodeElement) -> Self {
        Element::QrCode(e)
    }
}

impl From<SignatureElement> for Element {
    fn from(e: SignatureElement) -> Self {
        Element::Signature(e)
    }
}

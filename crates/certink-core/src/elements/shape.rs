//! Shape element.

use super::{ElementBase, ElementId, SerializableColor};
use crate::geometry::{self, Outline};
use kurbo::{Affine, Rect};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Closed set of shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShapeType {
    #[default]
    Rectangle,
    Circle,
    Triangle,
    Star,
    Diamond,
    Pentagon,
    Hexagon,
    Line,
    Arrow,
    Heart,
    Cross,
}

impl ShapeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::Rectangle => "rectangle",
            ShapeType::Circle => "circle",
            ShapeType::Triangle => "triangle",
            ShapeType::Star => "star",
            ShapeType::Diamond => "diamond",
            ShapeType::Pentagon => "pentagon",
            ShapeType::Hexagon => "hexagon",
            ShapeType::Line => "line",
            ShapeType::Arrow => "arrow",
            ShapeType::Heart => "heart",
            ShapeType::Cross => "cross",
        }
    }

    pub fn all() -> &'static [ShapeType] {
        &[
            ShapeType::Rectangle,
            ShapeType::Circle,
            ShapeType::Triangle,
            ShapeType::Star,
            ShapeType::Diamond,
            ShapeType::Pentagon,
            ShapeType::Hexagon,
            ShapeType::Line,
            ShapeType::Arrow,
            ShapeType::Heart,
            ShapeType::Cross,
        ]
    }

    /// Parse a kind name, falling back to a rectangle for unknown names.
    pub fn from_name_lossy(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::warn!("Unknown shape type '{}', drawing a rectangle", name);
            ShapeType::Rectangle
        })
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for shape names outside the known set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownShapeType(pub String);

impl fmt::Display for UnknownShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown shape type '{}'", self.0)
    }
}

impl std::error::Error for UnknownShapeType {}

impl FromStr for ShapeType {
    type Err = UnknownShapeType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ShapeType::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| UnknownShapeType(s.to_string()))
    }
}

impl Serialize for ShapeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ShapeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(ShapeType::from_name_lossy(&name))
    }
}

/// A vector shape. Anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeElement {
    #[serde(flatten)]
    pub base: ElementBase,
    pub shape_type: ShapeType,
    pub width: f64,
    pub height: f64,
    #[serde(default = "SerializableColor::white")]
    pub fill_color: SerializableColor,
    #[serde(default = "SerializableColor::black")]
    pub stroke_color: SerializableColor,
    #[serde(default)]
    pub stroke_width: f64,
    /// Corner radius, rectangles only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    /// Opacity in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl ShapeElement {
    pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

    pub fn new(id: ElementId, shape_type: ShapeType, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            base: ElementBase::new(id, x, y),
            shape_type,
            width,
            height,
            fill_color: SerializableColor::white(),
            stroke_color: SerializableColor::black(),
            stroke_width: Self::DEFAULT_STROKE_WIDTH,
            border_radius: None,
            opacity: None,
        }
    }

    pub fn with_fill(mut self, color: SerializableColor) -> Self {
        self.fill_color = color;
        self
    }

    pub fn with_border_radius(mut self, radius: f64) -> Self {
        self.border_radius = Some(radius);
        self
    }

    /// Opacity clamped to [0, 1], fully opaque when unset.
    pub fn effective_opacity(&self) -> f64 {
        self.opacity.map_or(1.0, |o| o.clamp(0.0, 1.0))
    }

    /// Outline in local coordinates (`0..width`, `0..height`).
    pub fn outline(&self) -> Outline {
        let radius = match self.shape_type {
            ShapeType::Rectangle => self.border_radius,
            _ => None,
        };
        geometry::outline(self.shape_type, self.width, self.height, radius)
    }

    /// Outline placed on the canvas: scaled, moved to the anchor and rotated
    /// about the visual center.
    pub fn world_outline(&self) -> Outline {
        let (sx, sy) = self.base.effective_scale();
        let bounds = Rect::new(
            self.base.x,
            self.base.y,
            self.base.x + self.width * sx,
            self.base.y + self.height * sy,
        );
        let transform = Affine::rotate_about(self.base.rotation.to_radians(), bounds.center())
            * Affine::translate((self.base.x, self.base.y))
            * Affine::scale_non_uniform(sx, sy);
        let mut outline = self.outline();
        outline.transform(transform);
        outline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn test_shape_type_names() {
        for kind in ShapeType::all() {
            assert_eq!(kind.as_str().parse::<ShapeType>(), Ok(*kind));
        }
        assert_eq!("Hexagon".parse::<ShapeType>(), Ok(ShapeType::Hexagon));
        assert!("blob".parse::<ShapeType>().is_err());
    }

    #[test]
    fn test_unknown_kind_falls_back_to_rectangle() {
        let json = r#"{"id":"s","x":0,"y":0,"shapeType":"octagon","width":10,"height":10}"#;
        let shape: ShapeElement = serde_json::from_str(json).unwrap();
        assert_eq!(shape.shape_type, ShapeType::Rectangle);
        assert_eq!(shape.fill_color, SerializableColor::white());
    }

    #[test]
    fn test_border_radius_only_on_rectangles() {
        let rounded = ShapeElement::new(ElementId::new("r"), ShapeType::Rectangle, 0.0, 0.0, 40.0, 40.0)
            .with_border_radius(10.0);
        assert!(rounded.outline().area() < 1600.0);

        let mut diamond = rounded.clone();
        diamond.shape_type = ShapeType::Diamond;
        assert!((diamond.outline().area() - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_world_outline_placement() {
        let mut shape = ShapeElement::new(ElementId::new("s"), ShapeType::Rectangle, 100.0, 50.0, 40.0, 20.0);
        shape.base.scale = Some(2.0);
        let bbox = shape.world_outline().bounding_box();
        assert!((bbox.x0 - 100.0).abs() < 1e-9);
        assert!((bbox.width() - 80.0).abs() < 1e-9);

        shape.base.rotation = 90.0;
        let bbox = shape.world_outline().bounding_box();
        let center = Point::new(140.0, 70.0);
        assert!((bbox.center() - center).hypot() < 1e-9);
        assert!((bbox.width() - 40.0).abs() < 1e-9);
        assert!((bbox.height() - 80.0).abs() < 1e-9);
    }
}

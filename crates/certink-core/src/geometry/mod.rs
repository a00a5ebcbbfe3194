//! Procedural shape outlines.
//!
//! Every outline lives in local coordinates: the bounding box runs from
//! `(0, 0)` to `(w, h)` and the element transform places it on the canvas.
//! Degenerate boxes are not rejected; they produce zero-area paths.

mod curves;
mod polygons;

pub use curves::{ellipse, heart, line, rectangle};
pub use polygons::{arrow, cross, diamond, regular_polygon, star, triangle};

use crate::elements::ShapeType;
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape};

/// Flattening tolerance used when converting kurbo primitives to paths.
pub const PATH_TOLERANCE: f64 = 0.1;

/// Vector outline of a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub path: BezPath,
    /// Whether the outline is painted with the fill color. Lines are
    /// stroke-only.
    pub filled: bool,
}

impl Outline {
    pub fn filled(path: BezPath) -> Self {
        Self { path, filled: true }
    }

    pub fn stroked(path: BezPath) -> Self {
        Self {
            path,
            filled: false,
        }
    }

    /// Enclosed area (always non-negative).
    pub fn area(&self) -> f64 {
        self.path.area().abs()
    }

    pub fn bounding_box(&self) -> Rect {
        self.path.bounding_box()
    }

    /// Whether the outline encloses no area.
    pub fn is_degenerate(&self) -> bool {
        self.area() < 1e-9
    }

    pub fn transform(&mut self, affine: Affine) {
        self.path.apply_affine(affine);
    }

    /// SVG path data.
    pub fn to_svg(&self) -> String {
        self.path.to_svg()
    }
}

/// Build the outline for a shape kind in a `w` x `h` box.
///
/// `border_radius` only affects rectangles.
pub fn outline(kind: ShapeType, w: f64, h: f64, border_radius: Option<f64>) -> Outline {
    match kind {
        ShapeType::Rectangle => Outline::filled(rectangle(w, h, border_radius.unwrap_or(0.0))),
        ShapeType::Circle => Outline::filled(ellipse(w, h)),
        ShapeType::Triangle => Outline::filled(triangle(w, h)),
        ShapeType::Star => Outline::filled(star(w, h)),
        ShapeType::Diamond => Outline::filled(diamond(w, h)),
        ShapeType::Pentagon => Outline::filled(regular_polygon(w, h, 5)),
        ShapeType::Hexagon => Outline::filled(regular_polygon(w, h, 6)),
        ShapeType::Line => Outline::stroked(line(w, h)),
        ShapeType::Arrow => Outline::filled(arrow(w, h)),
        ShapeType::Heart => Outline::filled(heart(w, h)),
        ShapeType::Cross => Outline::filled(cross(w, h)),
    }
}

/// Closed polygon through the given points.
pub(crate) fn polygon(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for point in iter {
            path.line_to(*point);
        }
        path.close_path();
    }
    path
}

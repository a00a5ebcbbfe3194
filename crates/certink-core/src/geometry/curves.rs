//! Outlines with curved or open segments.

use super::PATH_TOLERANCE;
use kurbo::{BezPath, Ellipse, Point, Rect, RoundedRect, Shape as KurboShape};

/// Axis-aligned rectangle. The corner radius is clamped to half the short
/// side; negative radii are treated as zero.
pub fn rectangle(w: f64, h: f64, radius: f64) -> BezPath {
    let rect = Rect::new(0.0, 0.0, w, h);
    let radius = radius.max(0.0).min(w.min(h) / 2.0);
    if radius > 0.0 {
        RoundedRect::from_rect(rect, radius).to_path(PATH_TOLERANCE)
    } else {
        rect.to_path(PATH_TOLERANCE)
    }
}

/// Ellipse inscribed in the box; only circular when `w == h`.
pub fn ellipse(w: f64, h: f64) -> BezPath {
    Ellipse::from_rect(Rect::new(0.0, 0.0, w, h)).to_path(PATH_TOLERANCE)
}

/// Horizontal segment through the vertical middle.
pub fn line(w: f64, h: f64) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((0.0, h / 2.0));
    path.line_to((w, h / 2.0));
    path
}

/// Heart made of two mirrored lobes meeting at the bottom point.
///
/// Control points are given in the unit box and scaled by `(w, h)`.
pub fn heart(w: f64, h: f64) -> BezPath {
    let p = |x: f64, y: f64| Point::new(x * w, y * h);
    let mut path = BezPath::new();
    path.move_to(p(0.5, 0.25));
    // Left lobe
    path.curve_to(p(0.5, 0.1), p(0.35, 0.0), p(0.25, 0.0));
    path.curve_to(p(0.1, 0.0), p(0.0, 0.15), p(0.0, 0.3));
    path.curve_to(p(0.0, 0.55), p(0.25, 0.75), p(0.5, 1.0));
    // Right lobe
    path.curve_to(p(0.75, 0.75), p(1.0, 0.55), p(1.0, 0.3));
    path.curve_to(p(1.0, 0.15), p(0.9, 0.0), p(0.75, 0.0));
    path.curve_to(p(0.65, 0.0), p(0.5, 0.1), p(0.5, 0.25));
    path.close_path();
    path
}

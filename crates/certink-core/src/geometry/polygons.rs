//! Straight-edged outlines.

use super::polygon;
use kurbo::{BezPath, Point};
use std::f64::consts::{FRAC_PI_2, PI};

/// Number of vertices on the star (outer and inner alternating).
const STAR_POINTS: usize = 10;
/// Inner radius as a fraction of the outer radius.
const STAR_INNER_RATIO: f64 = 0.4;
/// Fraction of the width taken by the arrow shaft.
const ARROW_SHAFT_RATIO: f64 = 0.7;

/// Apex at the top middle, base along the bottom edge.
pub fn triangle(w: f64, h: f64) -> BezPath {
    polygon(&[
        Point::new(w / 2.0, 0.0),
        Point::new(w, h),
        Point::new(0.0, h),
    ])
}

/// Vertices at the midpoints of the box edges.
pub fn diamond(w: f64, h: f64) -> BezPath {
    polygon(&[
        Point::new(w / 2.0, 0.0),
        Point::new(w, h / 2.0),
        Point::new(w / 2.0, h),
        Point::new(0.0, h / 2.0),
    ])
}

/// Five-pointed star, ten vertices alternating between the outer radius
/// `min(w, h) / 2` and 40% of it, first point straight up.
pub fn star(w: f64, h: f64) -> BezPath {
    let center = Point::new(w / 2.0, h / 2.0);
    let outer = w.min(h) / 2.0;
    let inner = outer * STAR_INNER_RATIO;
    let step = 2.0 * PI / STAR_POINTS as f64;

    let points: Vec<Point> = (0..STAR_POINTS)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let angle = i as f64 * step - FRAC_PI_2;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect();
    polygon(&points)
}

/// Upright regular polygon inscribed at radius `min(w, h) / 2`.
pub fn regular_polygon(w: f64, h: f64, sides: usize) -> BezPath {
    let sides = sides.max(3);
    let center = Point::new(w / 2.0, h / 2.0);
    let radius = w.min(h) / 2.0;
    let step = 2.0 * PI / sides as f64;

    let points: Vec<Point> = (0..sides)
        .map(|i| {
            let angle = i as f64 * step - FRAC_PI_2;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect();
    polygon(&points)
}

/// Plus sign: union of a third-width vertical bar and a third-height
/// horizontal bar.
pub fn cross(w: f64, h: f64) -> BezPath {
    let (x1, x2) = (w / 3.0, 2.0 * w / 3.0);
    let (y1, y2) = (h / 3.0, 2.0 * h / 3.0);
    polygon(&[
        Point::new(x1, 0.0),
        Point::new(x2, 0.0),
        Point::new(x2, y1),
        Point::new(w, y1),
        Point::new(w, y2),
        Point::new(x2, y2),
        Point::new(x2, h),
        Point::new(x1, h),
        Point::new(x1, y2),
        Point::new(0.0, y2),
        Point::new(0.0, y1),
        Point::new(x1, y1),
    ])
}

/// Block arrow pointing right: shaft over the first 70% of the width,
/// triangular head over the rest.
pub fn arrow(w: f64, h: f64) -> BezPath {
    let neck = w * ARROW_SHAFT_RATIO;
    polygon(&[
        Point::new(0.0, h / 3.0),
        Point::new(neck, h / 3.0),
        Point::new(neck, 0.0),
        Point::new(w, h / 2.0),
        Point::new(neck, h),
        Point::new(neck, 2.0 * h / 3.0),
        Point::new(0.0, 2.0 * h / 3.0),
    ])
}

//! Manipulation handles.

use crate::elements::Element;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Handle hit tolerance in editor pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;
/// Distance from the top edge to the rotation handle.
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// Resize handle direction (compass point of the box it sits on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    Se,
    Sw,
}

impl Direction {
    pub fn all() -> [Direction; 8] {
        [
            Direction::Nw,
            Direction::N,
            Direction::Ne,
            Direction::E,
            Direction::Se,
            Direction::S,
            Direction::Sw,
            Direction::W,
        ]
    }

    pub fn touches_north(&self) -> bool {
        matches!(self, Direction::N | Direction::Ne | Direction::Nw)
    }

    pub fn touches_south(&self) -> bool {
        matches!(self, Direction::S | Direction::Se | Direction::Sw)
    }

    pub fn touches_east(&self) -> bool {
        matches!(self, Direction::E | Direction::Ne | Direction::Se)
    }

    pub fn touches_west(&self) -> bool {
        matches!(self, Direction::W | Direction::Nw | Direction::Sw)
    }

    /// Handle position on an un-rotated box.
    fn anchor(&self, bounds: Rect) -> Point {
        let x = if self.touches_west() {
            bounds.x0
        } else if self.touches_east() {
            bounds.x1
        } else {
            bounds.center().x
        };
        let y = if self.touches_north() {
            bounds.y0
        } else if self.touches_south() {
            bounds.y1
        } else {
            bounds.center().y
        };
        Point::new(x, y)
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "n" => Ok(Direction::N),
            "s" => Ok(Direction::S),
            "e" => Ok(Direction::E),
            "w" => Ok(Direction::W),
            "ne" => Ok(Direction::Ne),
            "nw" => Ok(Direction::Nw),
            "se" => Ok(Direction::Se),
            "sw" => Ok(Direction::Sw),
            _ => Err(format!("unknown handle direction '{}'", s)),
        }
    }
}

/// The kind of handle, which determines the gesture it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Resize(Direction),
    Rotate,
}

/// A handle with its position in editor space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    pub position: Point,
}

impl Handle {
    pub fn new(kind: HandleKind, position: Point) -> Self {
        Self { kind, position }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// Handles for an element, rotated with it.
///
/// Resizable elements get eight resize handles plus the rotation handle;
/// the others only the rotation handle.
pub fn handles_for(element: &Element) -> Vec<Handle> {
    let bounds = element.visual_bounds();
    let transform = element.rotation_transform();
    let mut handles = Vec::with_capacity(9);

    if element.is_resizable() {
        for direction in Direction::all() {
            handles.push(Handle::new(
                HandleKind::Resize(direction),
                transform * direction.anchor(bounds),
            ));
        }
    }

    let rotate = Point::new(bounds.center().x, bounds.y0 - ROTATE_HANDLE_OFFSET);
    handles.push(Handle::new(HandleKind::Rotate, transform * rotate));
    handles
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(element: &Element, point: Point, tolerance: f64) -> Option<HandleKind> {
    handles_for(element)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

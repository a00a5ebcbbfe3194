//! Direct manipulation: drag, resize and rotate gestures.
//!
//! A gesture captures an immutable [`GestureSnapshot`] when it starts. Every
//! pointer move recomputes the element geometry from that snapshot and the
//! total pointer delta, so rounding never accumulates across frames.

use crate::elements::{Element, ElementId, Geometry, normalize_rotation};
use crate::error::EditorError;
use crate::widget::Direction;
use kurbo::{Affine, Point, Vec2};

/// Pre-gesture state of the targeted element.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSnapshot {
    pub element_id: ElementId,
    /// Pointer position when the gesture started.
    pub origin: Point,
    pub geometry: Geometry,
    /// Effective (sx, sy) scale at gesture start.
    pub scale: (f64, f64),
    /// Visual center at gesture start; the rotation pivot.
    pub center: Point,
}

impl GestureSnapshot {
    pub fn capture(element: &Element, origin: Point) -> Self {
        Self {
            element_id: element.id().clone(),
            origin,
            geometry: element.geometry(),
            scale: element.base().effective_scale(),
            center: element.visual_center(),
        }
    }

    /// Pointer delta against the gesture origin.
    pub fn delta(&self, pointer: Point) -> Vec2 {
        pointer - self.origin
    }
}

/// Kind of an active gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize(Direction),
    Rotate,
}

/// Geometry after dragging by `delta`.
pub fn drag_geometry(snapshot: &GestureSnapshot, delta: Vec2) -> Geometry {
    Geometry {
        x: snapshot.geometry.x + delta.x,
        y: snapshot.geometry.y + delta.y,
        ..snapshot.geometry
    }
}

/// Geometry after pulling the `direction` handle by `delta`.
///
/// The delta is taken into the element's local (un-rotated) frame first.
/// East/south edges grow the size with it, west/north edges shrink it, and
/// sizes never drop below `min_size`. The delta is in displayed pixels and
/// is divided by the element's scale to get the stored size. The handle
/// opposite `direction` keeps its on-screen position, even though the
/// rotation pivot moves with the new bounds.
pub fn resize_geometry(
    snapshot: &GestureSnapshot,
    direction: Direction,
    delta: Vec2,
    min_size: f64,
) -> Geometry {
    let mut geometry = snapshot.geometry;
    let (Some(width), Some(height)) = (geometry.width, geometry.height) else {
        return geometry;
    };
    let (sx, sy) = snapshot.scale;
    let (sx, sy) = (sx.max(f64::EPSILON), sy.max(f64::EPSILON));
    let rotate = Affine::rotate(geometry.rotation.to_radians());
    let local = (rotate.inverse() * delta.to_point()).to_vec2();

    if direction.touches_east() {
        geometry.width = Some((width + local.x / sx).max(min_size));
    } else if direction.touches_west() {
        let new_width = (width - local.x / sx).max(min_size);
        geometry.x += (width - new_width) * sx;
        geometry.width = Some(new_width);
    }

    if direction.touches_south() {
        geometry.height = Some((height + local.y / sy).max(min_size));
    } else if direction.touches_north() {
        let new_height = (height - local.y / sy).max(min_size);
        geometry.y += (height - new_height) * sy;
        geometry.height = Some(new_height);
    }

    // The un-rotated anchor is fixed already; undo the pivot shift.
    if geometry.rotation != 0.0 {
        let center = |g: &Geometry| {
            Point::new(
                g.x + g.width.unwrap_or(width) * sx / 2.0,
                g.y + g.height.unwrap_or(height) * sy / 2.0,
            )
        };
        let shift = center(&geometry) - center(&snapshot.geometry);
        let correction = (rotate * shift.to_point()).to_vec2() - shift;
        geometry.x += correction.x;
        geometry.y += correction.y;
    }

    geometry
}

/// Geometry after rotating the pointer from the snapshot origin to
/// `pointer` around the snapshot center.
pub fn rotate_geometry(snapshot: &GestureSnapshot, pointer: Point) -> Geometry {
    let start = snapshot.origin - snapshot.center;
    let current = pointer - snapshot.center;
    let swept = current.atan2() - start.atan2();
    Geometry {
        rotation: normalize_rotation(snapshot.geometry.rotation + swept.to_degrees()),
        ..snapshot.geometry
    }
}

/// What a finished gesture did.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureOutcome {
    pub element_id: ElementId,
    pub kind: GestureKind,
    pub before: Geometry,
    pub after: Geometry,
}

impl GestureOutcome {
    pub fn changed(&self) -> bool {
        self.before != self.after
    }
}

#[derive(Debug, Clone)]
struct ActiveGesture {
    kind: GestureKind,
    snapshot: GestureSnapshot,
    /// Latest pointer position of a drag not yet written to the element.
    pending: Option<Point>,
}

/// The single gesture slot.
#[derive(Debug, Clone)]
pub struct ManipulationEngine {
    active: Option<ActiveGesture>,
    min_size: f64,
}

impl ManipulationEngine {
    pub fn new(min_size: f64) -> Self {
        Self {
            active: None,
            min_size,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn kind(&self) -> Option<GestureKind> {
        self.active.as_ref().map(|g| g.kind)
    }

    /// Element targeted by the active gesture.
    pub fn target(&self) -> Option<&ElementId> {
        self.active.as_ref().map(|g| &g.snapshot.element_id)
    }

    pub fn snapshot(&self) -> Option<&GestureSnapshot> {
        self.active.as_ref().map(|g| &g.snapshot)
    }

    /// Start a gesture on an element.
    pub fn begin(
        &mut self,
        kind: GestureKind,
        element: &Element,
        origin: Point,
    ) -> Result<(), EditorError> {
        if self.active.is_some() {
            return Err(EditorError::GestureActive);
        }
        if matches!(kind, GestureKind::Resize(_)) && !element.is_resizable() {
            return Err(EditorError::NotResizable(element.id().clone()));
        }
        let snapshot = GestureSnapshot::capture(element, origin);
        log::debug!("Begin {:?} on {} at {:?}", kind, snapshot.element_id, origin);
        self.active = Some(ActiveGesture {
            kind,
            snapshot,
            pending: None,
        });
        Ok(())
    }

    fn geometry_at(&self, gesture: &ActiveGesture, pointer: Point) -> Geometry {
        let snapshot = &gesture.snapshot;
        match gesture.kind {
            GestureKind::Drag => drag_geometry(snapshot, snapshot.delta(pointer)),
            GestureKind::Resize(direction) => {
                resize_geometry(snapshot, direction, snapshot.delta(pointer), self.min_size)
            }
            GestureKind::Rotate => rotate_geometry(snapshot, pointer),
        }
    }

    /// Feed a pointer move. Resize and rotate write immediately; drag
    /// positions are held until the next [`Self::flush`].
    ///
    /// Returns whether the element was written.
    pub fn update(&mut self, element: &mut Element, pointer: Point) -> bool {
        let Some(gesture) = self.active.as_ref() else {
            return false;
        };
        if gesture.snapshot.element_id != *element.id() {
            return false;
        }
        if gesture.kind == GestureKind::Drag {
            if let Some(gesture) = self.active.as_mut() {
                gesture.pending = Some(pointer);
            }
            return false;
        }
        let geometry = self.geometry_at(gesture, pointer);
        element.apply_geometry(geometry);
        true
    }

    /// Whether a drag position is waiting for the next frame.
    pub fn has_pending(&self) -> bool {
        self.active.as_ref().is_some_and(|g| g.pending.is_some())
    }

    /// Write the held drag position, once per animation frame.
    pub fn flush(&mut self, element: &mut Element) -> bool {
        let Some(gesture) = self.active.as_ref() else {
            return false;
        };
        if gesture.snapshot.element_id != *element.id() {
            return false;
        }
        let Some(pointer) = gesture.pending else {
            return false;
        };
        let geometry = self.geometry_at(gesture, pointer);
        element.apply_geometry(geometry);
        if let Some(gesture) = self.active.as_mut() {
            gesture.pending = None;
        }
        true
    }

    /// Release the pointer: write the final geometry and return to idle.
    pub fn end(&mut self, element: &mut Element, pointer: Point) -> Option<GestureOutcome> {
        let gesture = self.active.take()?;
        if gesture.snapshot.element_id != *element.id() {
            self.active = Some(gesture);
            return None;
        }
        let geometry = self.geometry_at(&gesture, pointer);
        element.apply_geometry(geometry);
        let outcome = GestureOutcome {
            element_id: gesture.snapshot.element_id,
            kind: gesture.kind,
            before: gesture.snapshot.geometry,
            after: element.geometry(),
        };
        log::debug!(
            "Commit {:?} on {}: {:?} -> {:?}",
            outcome.kind,
            outcome.element_id,
            outcome.before,
            outcome.after
        );
        Some(outcome)
    }

    /// Drop the gesture without touching any element. Used when the
    /// targeted element disappears mid-gesture.
    pub fn abandon(&mut self) -> Option<ElementId> {
        self.active.take().map(|g| g.snapshot.element_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ShapeElement, ShapeType, TextElement};

    const MIN: f64 = 10.0;

    fn shape(x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::Shape(ShapeElement::new(ElementId::new("s"), ShapeType::Rectangle, x, y, w, h))
    }

    fn snapshot(element: &Element) -> GestureSnapshot {
        GestureSnapshot::capture(element, Point::new(0.0, 0.0))
    }

    #[test]
    fn test_nw_resize_keeps_opposite_corner() {
        let element = shape(100.0, 100.0, 80.0, 60.0);
        let g = resize_geometry(&snapshot(&element), Direction::Nw, Vec2::new(15.0, -5.0), MIN);
        assert!((g.width.unwrap() - 65.0).abs() < 1e-9);
        assert!((g.height.unwrap() - 65.0).abs() < 1e-9);
        assert!((g.x - 115.0).abs() < 1e-9);
        assert!((g.y - 95.0).abs() < 1e-9);
        // Bottom-right corner unchanged.
        assert!((g.x + g.width.unwrap() - 180.0).abs() < 1e-9);
        assert!((g.y + g.height.unwrap() - 160.0).abs() < 1e-9);
    }

    #[test]
    fn test_se_resize_keeps_position() {
        let element = shape(100.0, 100.0, 80.0, 60.0);
        let g = resize_geometry(&snapshot(&element), Direction::Se, Vec2::new(20.0, 10.0), MIN);
        assert!((g.width.unwrap() - 100.0).abs() < 1e-9);
        assert!((g.height.unwrap() - 70.0).abs() < 1e-9);
        assert!((g.x - 100.0).abs() < f64::EPSILON);
        assert!((g.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_edge_resize_touches_one_axis() {
        let element = shape(0.0, 0.0, 80.0, 60.0);
        let g = resize_geometry(&snapshot(&element), Direction::N, Vec2::new(30.0, 20.0), MIN);
        assert!((g.width.unwrap() - 80.0).abs() < f64::EPSILON);
        assert!((g.height.unwrap() - 40.0).abs() < 1e-9);
        assert!((g.x).abs() < f64::EPSILON);
        assert!((g.y - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_floor() {
        let element = shape(0.0, 0.0, 50.0, 50.0);
        let snap = snapshot(&element);
        for direction in Direction::all() {
            for delta in [
                Vec2::new(-1e6, -1e6),
                Vec2::new(1e6, 1e6),
                Vec2::new(-45.0, 45.0),
                Vec2::new(45.0, -45.0),
            ] {
                let g = resize_geometry(&snap, direction, delta, MIN);
                assert!(g.width.unwrap() >= MIN, "{:?} {:?}", direction, delta);
                assert!(g.height.unwrap() >= MIN, "{:?} {:?}", direction, delta);
            }
        }
        // Clamped west edge stops with the east edge still fixed.
        let g = resize_geometry(&snap, Direction::W, Vec2::new(500.0, 0.0), MIN);
        assert!((g.x + MIN - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_respects_scale() {
        let mut element = shape(0.0, 0.0, 50.0, 50.0);
        element.base_mut().scale = Some(2.0);
        let g = resize_geometry(&snapshot(&element), Direction::W, Vec2::new(20.0, 0.0), MIN);
        assert!((g.width.unwrap() - 40.0).abs() < 1e-9);
        assert!((g.x - 20.0).abs() < 1e-9);
    }

    /// On-screen position of the local point `(u, v)` of `geometry`.
    fn screen_point(geometry: Geometry, u: f64, v: f64) -> Point {
        let mut element = shape(geometry.x, geometry.y, geometry.width.unwrap(), geometry.height.unwrap());
        element.base_mut().rotation = geometry.rotation;
        element.rotation_transform() * Point::new(geometry.x + u, geometry.y + v)
    }

    #[test]
    fn test_resize_upside_down_grows_outward() {
        let mut element = shape(100.0, 100.0, 100.0, 50.0);
        element.base_mut().rotation = 180.0;
        let snap = snapshot(&element);
        let anchor = screen_point(snap.geometry, 100.0, 50.0);

        // The local north-west corner is drawn bottom-right; pull it further out.
        let g = resize_geometry(&snap, Direction::Nw, Vec2::new(20.0, 20.0), MIN);
        assert!((g.width.unwrap() - 120.0).abs() < 1e-9);
        assert!((g.height.unwrap() - 70.0).abs() < 1e-9);

        let moved = screen_point(g, 120.0, 70.0);
        assert!((moved - anchor).hypot() < 1e-9, "{:?} vs {:?}", moved, anchor);
        let dragged = screen_point(g, 0.0, 0.0);
        assert!((dragged - Point::new(220.0, 170.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_resize_quarter_turn_keeps_opposite_corner() {
        let mut element = shape(100.0, 100.0, 50.0, 50.0);
        element.base_mut().rotation = 90.0;
        let snap = snapshot(&element);
        let anchor = screen_point(snap.geometry, 0.0, 0.0);

        // Local +x points down the screen and local +y points left.
        let g = resize_geometry(&snap, Direction::Se, Vec2::new(-10.0, 20.0), MIN);
        assert!((g.width.unwrap() - 70.0).abs() < 1e-9);
        assert!((g.height.unwrap() - 60.0).abs() < 1e-9);
        assert!((g.x - 85.0).abs() < 1e-9);
        assert!((g.y - 105.0).abs() < 1e-9);
        assert!((screen_point(g, 0.0, 0.0) - anchor).hypot() < 1e-9);
    }

    #[test]
    fn test_rotation_from_pointer_sweep() {
        let element = shape(0.0, 0.0, 100.0, 100.0);
        // Center is (50, 50); start directly above, move to the right.
        let snap = GestureSnapshot::capture(&element, Point::new(50.0, 0.0));
        let g = rotate_geometry(&snap, Point::new(100.0, 50.0));
        assert!((g.rotation - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_stays_normalized() {
        let mut element = shape(0.0, 0.0, 100.0, 100.0);
        let mut engine = ManipulationEngine::new(MIN);
        let center = Point::new(50.0, 50.0);
        let mut angle: f64 = 0.0;
        for step in 0..40 {
            let start = center + Vec2::new(angle.cos(), angle.sin()) * 40.0;
            angle += 0.7 + step as f64 * 0.13;
            let end = center + Vec2::new(angle.cos(), angle.sin()) * 40.0;
            engine.begin(GestureKind::Rotate, &element, start).unwrap();
            engine.update(&mut element, end);
            engine.end(&mut element, end);
            let rotation = element.rotation();
            assert!(rotation > -180.0 && rotation <= 180.0, "{}", rotation);
        }
    }

    #[test]
    fn test_drag_coalesces_until_flush() {
        let mut element = shape(10.0, 10.0, 20.0, 20.0);
        let mut engine = ManipulationEngine::new(MIN);
        engine.begin(GestureKind::Drag, &element, Point::new(15.0, 15.0)).unwrap();

        assert!(!engine.update(&mut element, Point::new(20.0, 15.0)));
        assert!(!engine.update(&mut element, Point::new(25.0, 20.0)));
        assert!((element.base().x - 10.0).abs() < f64::EPSILON);
        assert!(engine.has_pending());

        assert!(engine.flush(&mut element));
        assert!((element.base().x - 20.0).abs() < 1e-9);
        assert!((element.base().y - 15.0).abs() < 1e-9);
        assert!(!engine.flush(&mut element));

        let outcome = engine.end(&mut element, Point::new(35.0, 15.0)).unwrap();
        assert!(outcome.changed());
        assert!((element.base().x - 30.0).abs() < 1e-9);
        assert!(!engine.is_active());
    }

    #[test]
    fn test_single_gesture_slot() {
        let element = shape(0.0, 0.0, 20.0, 20.0);
        let mut engine = ManipulationEngine::new(MIN);
        engine.begin(GestureKind::Drag, &element, Point::ZERO).unwrap();
        assert!(matches!(
            engine.begin(GestureKind::Rotate, &element, Point::ZERO),
            Err(EditorError::GestureActive)
        ));
    }

    #[test]
    fn test_text_cannot_resize() {
        let text = Element::Text(TextElement::new(ElementId::new("t"), 0.0, 0.0, "Hi"));
        let mut engine = ManipulationEngine::new(MIN);
        assert!(matches!(
            engine.begin(GestureKind::Resize(Direction::Se), &text, Point::ZERO),
            Err(EditorError::NotResizable(_))
        ));
        assert!(!engine.is_active());
    }

    #[test]
    fn test_gesture_touches_only_its_target() {
        let target = shape(0.0, 0.0, 20.0, 20.0);
        let mut other = Element::Shape(ShapeElement::new(
            ElementId::new("other"),
            ShapeType::Circle,
            50.0,
            50.0,
            20.0,
            20.0,
        ));
        let before = other.clone();
        let mut engine = ManipulationEngine::new(MIN);
        engine.begin(GestureKind::Resize(Direction::Se), &target, Point::ZERO).unwrap();
        assert!(!engine.update(&mut other, Point::new(30.0, 30.0)));
        assert!(engine.end(&mut other, Point::new(30.0, 30.0)).is_none());
        assert_eq!(other, before);
        assert!(engine.is_active());
    }
}

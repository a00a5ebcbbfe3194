//! Gesture and keyboard sequences driven through the editor.

use certink_core::input::{Key, MouseButton};
use certink_core::panel::PanelDetails;
use certink_core::{
    Editor, EditorConfig, Element, ElementId, KeyEvent, PanelEdit, PointerEvent, ShapeElement,
    ShapeType, TextElement,
};
use kurbo::Point;

fn id(s: &str) -> ElementId {
    ElementId::new(s)
}

fn editor_with_square() -> Editor {
    let mut editor = Editor::new(EditorConfig::default()).unwrap();
    editor
        .add_element(ShapeElement::new(id("sq"), ShapeType::Rectangle, 100.0, 100.0, 50.0, 50.0).into())
        .unwrap();
    editor
}

fn gesture(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) {
    let down = PointerEvent::Down {
        position: Point::new(from.0, from.1),
        button: MouseButton::Left,
    };
    editor.handle_pointer(down).unwrap();
    editor
        .handle_pointer(PointerEvent::Move {
            position: Point::new(to.0, to.1),
        })
        .unwrap();
    editor.begin_frame();
    editor
        .handle_pointer(PointerEvent::Up {
            position: Point::new(to.0, to.1),
            button: MouseButton::Left,
        })
        .unwrap();
}

fn square(editor: &Editor) -> &Element {
    editor.layout().get(&id("sq")).unwrap()
}

#[test]
fn test_nw_resize_keeps_opposite_corner() {
    let mut editor = editor_with_square();
    gesture(&mut editor, (100.0, 100.0), (110.0, 95.0));

    let base = square(&editor).base();
    assert!((base.x - 110.0).abs() < 1e-9);
    assert!((base.y - 95.0).abs() < 1e-9);
    assert_eq!(square(&editor).size(), Some((40.0, 55.0)));

    let bounds = square(&editor).visual_bounds();
    assert!((bounds.x1 - 150.0).abs() < 1e-9);
    assert!((bounds.y1 - 150.0).abs() < 1e-9);
}

fn rotated_rectangle(width: f64, height: f64, rotation: f64) -> Editor {
    let mut editor = Editor::new(EditorConfig::default()).unwrap();
    let mut element: Element =
        ShapeElement::new(id("sq"), ShapeType::Rectangle, 100.0, 100.0, width, height).into();
    element.base_mut().rotation = rotation;
    editor.add_element(element).unwrap();
    editor
}

fn assert_size(element: &Element, width: f64, height: f64) {
    let (w, h) = element.size().unwrap();
    assert!((w - width).abs() < 1e-9, "width {}", w);
    assert!((h - height).abs() < 1e-9, "height {}", h);
}

/// On-screen position of the element's local point `(u, v)`.
fn on_screen(element: &Element, u: f64, v: f64) -> Point {
    let base = element.base();
    element.rotation_transform() * Point::new(base.x + u, base.y + v)
}

#[test]
fn test_resize_upside_down_element_grows_outward() {
    let mut editor = rotated_rectangle(100.0, 50.0, 180.0);
    // The local top-left handle is drawn at the bottom-right corner.
    gesture(&mut editor, (200.0, 150.0), (220.0, 170.0));

    assert_size(square(&editor), 120.0, 70.0);
    assert!((on_screen(square(&editor), 120.0, 70.0) - Point::new(100.0, 100.0)).hypot() < 1e-9);
    assert!((on_screen(square(&editor), 0.0, 0.0) - Point::new(220.0, 170.0)).hypot() < 1e-9);
}

#[test]
fn test_resize_quarter_turned_element_keeps_opposite_corner() {
    let mut editor = rotated_rectangle(50.0, 50.0, 90.0);
    let anchor = on_screen(square(&editor), 0.0, 0.0);
    // The local bottom-right handle sits at (100, 150) after a quarter turn.
    gesture(&mut editor, (100.0, 150.0), (90.0, 170.0));

    assert_size(square(&editor), 70.0, 60.0);
    assert!((on_screen(square(&editor), 0.0, 0.0) - anchor).hypot() < 1e-9);
    assert!((square(&editor).rotation() - 90.0).abs() < 1e-9);
}

#[test]
fn test_resize_never_goes_below_floor() {
    let mut editor = editor_with_square();
    gesture(&mut editor, (150.0, 150.0), (-400.0, -900.0));
    assert_eq!(square(&editor).size(), Some((10.0, 10.0)));
    assert_eq!(square(&editor).base().x, 100.0);
}

#[test]
fn test_repeated_rotation_stays_normalized() {
    let mut editor = editor_with_square();
    // Each gesture grabs the rotation handle where it currently is and
    // sweeps it a quarter turn clockwise around the centre (125, 125).
    gesture(&mut editor, (125.0, 75.0), (175.0, 125.0));
    assert!((square(&editor).rotation() - 90.0).abs() < 1e-6);

    gesture(&mut editor, (175.0, 125.0), (125.0, 175.0));
    assert!((square(&editor).rotation() - 180.0).abs() < 1e-6);

    gesture(&mut editor, (125.0, 175.0), (75.0, 125.0));
    let rotation = square(&editor).rotation();
    assert!((rotation + 90.0).abs() < 1e-6);
    assert!(rotation > -180.0 && rotation <= 180.0);
}

#[test]
fn test_drag_then_undo() {
    let mut editor = editor_with_square();
    gesture(&mut editor, (125.0, 125.0), (225.0, 145.0));
    assert_eq!(square(&editor).base().x, 200.0);
    assert_eq!(square(&editor).base().y, 120.0);

    editor.undo().unwrap();
    assert_eq!(square(&editor).base().x, 100.0);
    assert_eq!(square(&editor).base().y, 100.0);
}

#[test]
fn test_keyboard_delete_clears_selection_and_panel() {
    let mut editor = editor_with_square();
    editor
        .add_element(TextElement::new(id("caption"), 300.0, 300.0, "Awarded to").into())
        .unwrap();

    assert!(editor.handle_key(&KeyEvent::new(Key::Delete)).unwrap());
    assert!(editor.layout().get(&id("caption")).is_none());
    assert_eq!(editor.selected(), None);
    assert!(editor.panel().is_none());
    assert!(!editor.handle_key(&KeyEvent::new(Key::Delete)).unwrap());
    assert_eq!(editor.layout().len(), 1);
}

#[test]
fn test_panel_follows_element_after_gesture() {
    let mut editor = editor_with_square();
    gesture(&mut editor, (150.0, 150.0), (170.0, 190.0));

    let panel = editor.panel().unwrap();
    assert_eq!(panel.width, Some(70.0));
    assert_eq!(panel.height, Some(90.0));

    editor
        .apply_panel_edit(PanelEdit::ShapeType(ShapeType::Hexagon))
        .unwrap();
    let PanelDetails::Shape { shape_type, .. } = editor.panel().unwrap().details else {
        panic!("expected shape details");
    };
    assert_eq!(shape_type, ShapeType::Hexagon);

    editor.undo().unwrap();
    assert_eq!(square(&editor).as_shape().unwrap().shape_type, ShapeType::Rectangle);
    assert_eq!(square(&editor).size(), Some((70.0, 90.0)));
}

#[test]
fn test_text_gets_rotate_handle_only() {
    let mut editor = Editor::new(EditorConfig::default()).unwrap();
    editor
        .add_element(TextElement::new(id("t"), 100.0, 100.0, "Hello").into())
        .unwrap();
    let text = editor.selected_element().unwrap();
    assert_eq!(editor.widgets().handles(text).len(), 1);

    // Dragging where a corner handle would be moves the text instead.
    gesture(&mut editor, (101.0, 101.0), (111.0, 101.0));
    assert_eq!(editor.layout().get(&id("t")).unwrap().base().x, 110.0);
}

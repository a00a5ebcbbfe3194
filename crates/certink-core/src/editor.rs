//! Editor controller.
//!
//! Owns the layout and routes pointer, keyboard and panel input to it.
//! Selection and inline editing live in the [`WidgetManager`], the active
//! gesture in the [`ManipulationEngine`]. Nothing else holds element state.

use crate::canvas::{Layout, LayoutMode};
use crate::config::EditorConfig;
use crate::elements::{Element, ElementId, ImageFormat};
use crate::error::{EditorError, EditorResult, LayoutError, StorageError, ValidationError};
use crate::input::{Key, KeyEvent, MouseButton, PointerEvent};
use crate::panel::{PanelEdit, PropertyPanel, apply_edit};
use crate::persisted::PersistedLayout;
use crate::reconcile::Reconciler;
use crate::selection::{GestureKind, GestureOutcome, ManipulationEngine};
use crate::storage::{Storage, validate_upload};
use crate::widget::{HANDLE_HIT_TOLERANCE, HandleKind, WidgetManager, hit_test_handles};
use kurbo::Point;

/// Tolerance for hitting an element body, in editor pixels.
pub const HIT_TOLERANCE: f64 = 5.0;

/// Paint-order moves for the selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrder {
    Front,
    Back,
    Forward,
    Backward,
}

/// The layout editor.
#[derive(Debug)]
pub struct Editor {
    layout: Layout,
    widgets: WidgetManager,
    engine: ManipulationEngine,
    config: EditorConfig,
    reconciler: Reconciler,
    mode: LayoutMode,
}

impl Editor {
    /// Start an empty layout in create mode.
    pub fn new(config: EditorConfig) -> EditorResult<Self> {
        Self::with_layout(Layout::default(), LayoutMode::Create, config)
    }

    /// Hydrate a persisted layout for editing under its storage key.
    pub fn open(
        persisted: &PersistedLayout,
        key: impl Into<String>,
        config: EditorConfig,
    ) -> EditorResult<Self> {
        config.validate()?;
        let reconciler = Reconciler::new(&config.coordinates);
        let layout = reconciler.load(persisted)?;
        Self::with_layout(layout, LayoutMode::Edit { id: key.into() }, config)
    }

    fn with_layout(layout: Layout, mode: LayoutMode, config: EditorConfig) -> EditorResult<Self> {
        config.validate()?;
        Ok(Self {
            layout,
            widgets: WidgetManager::new(),
            engine: ManipulationEngine::new(config.min_element_size),
            reconciler: Reconciler::new(&config.coordinates),
            config,
            mode,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn mode(&self) -> &LayoutMode {
        &self.mode
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn widgets(&self) -> &WidgetManager {
        &self.widgets
    }

    pub fn engine(&self) -> &ManipulationEngine {
        &self.engine
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.layout.name = name.into();
    }

    // ============================================================================
    // Selection
    // ============================================================================

    pub fn selected(&self) -> Option<&ElementId> {
        self.widgets.selected()
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.widgets.selected().and_then(|id| self.layout.get(id))
    }

    pub fn editing(&self) -> Option<&ElementId> {
        self.widgets.editing()
    }

    /// Select an element, committing any inline edit on another one.
    pub fn select(&mut self, id: &ElementId) -> EditorResult<()> {
        if self.engine.is_active() {
            return Err(EditorError::GestureActive);
        }
        if self.layout.get(id).is_none() {
            return Err(LayoutError::NotFound(id.clone()).into());
        }
        if self.widgets.editing().is_some_and(|editing| editing != id) {
            self.commit_text_edit()?;
        }
        self.widgets.select(id.clone());
        Ok(())
    }

    pub fn clear_selection(&mut self) -> EditorResult<()> {
        if self.engine.is_active() {
            return Err(EditorError::GestureActive);
        }
        if self.widgets.is_editing() {
            self.commit_text_edit()?;
        }
        self.widgets.clear_selection();
        Ok(())
    }

    // ============================================================================
    // Element lifecycle
    // ============================================================================

    /// Add an element on top of the paint order and select it.
    pub fn add_element(&mut self, element: Element) -> EditorResult<()> {
        let id = element.id().clone();
        if self.layout.is_known_id(&id) {
            return Err(LayoutError::DuplicateId(id).into());
        }
        element.validate_size()?;
        self.layout.push_undo();
        self.layout.add_element(element)?;
        log::debug!("Added {} ({} elements)", id, self.layout.len());
        if !self.engine.is_active() {
            self.widgets.select(id);
        }
        Ok(())
    }

    /// Remove an element. Selection, inline editing and any gesture on it
    /// end with it.
    pub fn remove_element(&mut self, id: &ElementId) -> EditorResult<Element> {
        if self.layout.get(id).is_none() {
            return Err(LayoutError::NotFound(id.clone()).into());
        }
        if self.engine.target() == Some(id) {
            self.engine.abandon();
        }
        self.layout.push_undo();
        let removed = self
            .layout
            .remove_element(id)
            .ok_or_else(|| LayoutError::NotFound(id.clone()))?;
        self.widgets.remove(id);
        log::debug!("Removed {}", id);
        Ok(removed)
    }

    pub fn delete_selected(&mut self) -> EditorResult<Element> {
        let id = self.widgets.selected().cloned().ok_or(EditorError::NoSelection)?;
        self.remove_element(&id)
    }

    /// Move the selected element in paint order. Returns false when it is
    /// already in place.
    pub fn reorder(&mut self, order: ZOrder) -> EditorResult<bool> {
        let id = self.widgets.selected().cloned().ok_or(EditorError::NoSelection)?;
        let index = self
            .layout
            .index_of(&id)
            .ok_or_else(|| LayoutError::NotFound(id.clone()))?;
        let movable = match order {
            ZOrder::Front | ZOrder::Forward => index + 1 < self.layout.len(),
            ZOrder::Back | ZOrder::Backward => index > 0,
        };
        if !movable {
            return Ok(false);
        }
        self.layout.push_undo();
        Ok(match order {
            ZOrder::Front => self.layout.bring_to_front(&id),
            ZOrder::Back => self.layout.send_to_back(&id),
            ZOrder::Forward => self.layout.bring_forward(&id),
            ZOrder::Backward => self.layout.send_backward(&id),
        })
    }

    /// Record an undo step for a change already written to `id`, given the
    /// element as it was before.
    fn record_change(&mut self, id: &ElementId, before: Element) {
        let Some(element) = self.layout.get_mut(id) else {
            return;
        };
        let after = std::mem::replace(element, before);
        self.layout.push_undo();
        if let Some(element) = self.layout.get_mut(id) {
            *element = after;
        }
    }

    // ============================================================================
    // Inline text editing
    // ============================================================================

    /// Start editing a custom text element in place.
    pub fn begin_text_edit(&mut self, id: &ElementId) -> EditorResult<()> {
        if self.engine.is_active() {
            return Err(EditorError::GestureActive);
        }
        let text = match self.layout.get(id) {
            Some(Element::Text(text)) => text,
            Some(other) => {
                return Err(ValidationError::FieldNotApplicable {
                    field: "text",
                    kind: other.kind_name(),
                }
                .into());
            }
            None => return Err(LayoutError::NotFound(id.clone()).into()),
        };
        if text.is_read_only() {
            return Err(ValidationError::ReadOnlyPlaceholder(id.clone()).into());
        }
        let initial = text.text.clone();
        self.select(id)?;
        self.widgets.enter_editing(id.clone(), initial);
        Ok(())
    }

    /// Uncommitted inline text, writable by the front-end.
    pub fn edit_buffer_mut(&mut self) -> Option<&mut String> {
        self.widgets.edit_buffer_mut()
    }

    /// Write the edit buffer to the element. Returns whether it changed.
    pub fn commit_text_edit(&mut self) -> EditorResult<bool> {
        let Some((id, buffer)) = self.widgets.finish_editing() else {
            return Ok(false);
        };
        let Some(Element::Text(text)) = self.layout.get(&id) else {
            log::warn!("Edited element {} is gone; dropping its text", id);
            return Ok(false);
        };
        if text.text == buffer {
            return Ok(false);
        }
        let before = Element::Text(text.clone());
        if let Some(Element::Text(text)) = self.layout.get_mut(&id) {
            text.set_text(buffer)?;
        }
        self.record_change(&id, before);
        Ok(true)
    }

    pub fn cancel_text_edit(&mut self) {
        self.widgets.discard_editing();
    }

    // ============================================================================
    // Keyboard
    // ============================================================================

    /// Handle a key press. Returns whether the editor consumed it.
    pub fn handle_key(&mut self, event: &KeyEvent) -> EditorResult<bool> {
        let command = event.modifiers.command();
        if self.widgets.is_editing() {
            return match &event.key {
                Key::Escape => {
                    self.cancel_text_edit();
                    Ok(true)
                }
                Key::Enter if command => {
                    self.commit_text_edit()?;
                    Ok(true)
                }
                Key::Enter => Ok(self.edit_buffer_mut().map(|b| b.push('\n')).is_some()),
                Key::Backspace => Ok(self.edit_buffer_mut().map(|b| b.pop()).is_some()),
                Key::Character(c) if !command => {
                    Ok(self.edit_buffer_mut().map(|b| b.push_str(c)).is_some())
                }
                _ => Ok(false),
            };
        }

        match &event.key {
            key if key.is_delete() => {
                if self.widgets.selected().is_none() {
                    return Ok(false);
                }
                self.delete_selected()?;
                Ok(true)
            }
            Key::Escape => {
                let had_selection = self.widgets.selected().is_some();
                self.clear_selection()?;
                Ok(had_selection)
            }
            Key::Character(c) if command && c.eq_ignore_ascii_case("z") => {
                if event.modifiers.shift {
                    self.redo()
                } else {
                    self.undo()
                }
            }
            Key::Character(c) if command && c.eq_ignore_ascii_case("y") => self.redo(),
            _ => Ok(false),
        }
    }

    // ============================================================================
    // Pointer
    // ============================================================================

    pub fn handle_pointer(&mut self, event: PointerEvent) -> EditorResult<Option<GestureOutcome>> {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_down(position, button)?;
                Ok(None)
            }
            PointerEvent::Move { position } => {
                self.pointer_move(position);
                Ok(None)
            }
            PointerEvent::Up { position, .. } => Ok(self.pointer_up(position)),
            PointerEvent::DoubleClick { position } => {
                self.double_click(position)?;
                Ok(None)
            }
        }
    }

    /// Pointer press: handles of the selection first, then element bodies
    /// top-most first, then empty canvas.
    pub fn pointer_down(&mut self, position: Point, button: MouseButton) -> EditorResult<()> {
        if button != MouseButton::Left {
            return Ok(());
        }
        if self.engine.is_active() {
            return Err(EditorError::GestureActive);
        }

        let hit = self.layout.element_at(position, HIT_TOLERANCE).cloned();
        if let Some(editing) = self.widgets.editing() {
            if hit.as_ref() == Some(editing) {
                return Ok(());
            }
            self.commit_text_edit()?;
        }

        let selected = self.widgets.selected().and_then(|id| self.layout.get(id));
        if let Some(selected) = selected {
            let gesture = match hit_test_handles(selected, position, HANDLE_HIT_TOLERANCE) {
                Some(HandleKind::Resize(direction)) => Some(GestureKind::Resize(direction)),
                Some(HandleKind::Rotate) => Some(GestureKind::Rotate),
                None => None,
            };
            if let Some(kind) = gesture {
                return self.engine.begin(kind, selected, position);
            }
        }

        match hit {
            Some(id) => {
                self.widgets.select(id.clone());
                let element = self
                    .layout
                    .get(&id)
                    .ok_or_else(|| LayoutError::NotFound(id.clone()))?;
                self.engine.begin(GestureKind::Drag, element, position)
            }
            None => {
                self.widgets.clear_selection();
                Ok(())
            }
        }
    }

    /// Pointer move. Returns whether an element was written.
    pub fn pointer_move(&mut self, position: Point) -> bool {
        let Some(target) = self.engine.target().cloned() else {
            return false;
        };
        match self.layout.get_mut(&target) {
            Some(element) => self.engine.update(element, position),
            None => {
                log::warn!("Gesture target {} disappeared; abandoning gesture", target);
                self.engine.abandon();
                false
            }
        }
    }

    /// Once per animation frame: write the coalesced drag position.
    pub fn begin_frame(&mut self) -> bool {
        let Some(target) = self.engine.target().cloned() else {
            return false;
        };
        match self.layout.get_mut(&target) {
            Some(element) => self.engine.flush(element),
            None => false,
        }
    }

    /// Pointer release commits the gesture.
    pub fn pointer_up(&mut self, position: Point) -> Option<GestureOutcome> {
        let target = self.engine.target().cloned()?;
        let Some(element) = self.layout.get_mut(&target) else {
            log::warn!("Gesture target {} disappeared before release", target);
            self.engine.abandon();
            return None;
        };
        let outcome = self.engine.end(element, position)?;
        if outcome.changed() {
            let mut before = element.clone();
            before.apply_geometry(outcome.before);
            self.record_change(&target, before);
        }
        Some(outcome)
    }

    /// Double-click on custom text starts inline editing.
    pub fn double_click(&mut self, position: Point) -> EditorResult<bool> {
        let Some(id) = self.layout.element_at(position, HIT_TOLERANCE).cloned() else {
            return Ok(false);
        };
        if !matches!(self.layout.get(&id), Some(Element::Text(_))) {
            return Ok(false);
        }
        self.begin_text_edit(&id)?;
        Ok(true)
    }

    // ============================================================================
    // Property panel
    // ============================================================================

    /// Panel values for the current selection, derived on every call.
    pub fn panel(&self) -> Option<PropertyPanel> {
        self.selected_element().map(PropertyPanel::from_element)
    }

    /// Write a panel edit to the selected element.
    pub fn apply_panel_edit(&mut self, edit: PanelEdit) -> EditorResult<bool> {
        let id = self.widgets.selected().cloned().ok_or(EditorError::NoSelection)?;
        if self.engine.target() == Some(&id) {
            return Err(EditorError::GestureActive);
        }
        if self.widgets.is_editing() && matches!(edit, PanelEdit::Text(_)) {
            return Err(EditorError::EditingActive);
        }
        let element = self
            .layout
            .get_mut(&id)
            .ok_or_else(|| LayoutError::NotFound(id.clone()))?;
        let before = element.clone();
        let changed = apply_edit(element, edit)?;
        if changed {
            self.record_change(&id, before);
        }
        Ok(changed)
    }

    // ============================================================================
    // Assets
    // ============================================================================

    /// Natural dimensions of an image arrived after it was added.
    pub fn image_loaded(&mut self, id: &ElementId, width: f64, height: f64) -> bool {
        match self.layout.get_mut(id) {
            Some(Element::Image(image)) => {
                let applied = image.apply_natural_size(width, height);
                if !applied {
                    log::debug!("Ignoring natural size for {} ({:?} mode)", id, image.image_size_mode);
                }
                applied
            }
            Some(other) => {
                log::warn!("Natural size arrived for non-image {} ({})", id, other.kind_name());
                false
            }
            None => {
                log::warn!("Natural size arrived for removed element {}", id);
                false
            }
        }
    }

    /// Set the background URL. Re-setting the current one is a no-op.
    pub fn set_background(&mut self, url: impl Into<String>) {
        let url = url.into();
        if self.layout.background.as_deref() == Some(url.as_str()) {
            return;
        }
        self.layout.push_undo();
        self.layout.background = Some(url);
    }

    /// Validate an uploaded background and hand it to `upload`, which
    /// returns the storage path the data service assigned. The background
    /// is only replaced when both steps succeed.
    pub fn upload_background<F>(&mut self, bytes: &[u8], upload: F) -> EditorResult<ImageFormat>
    where
        F: FnOnce(&[u8], ImageFormat) -> Result<String, StorageError>,
    {
        let format = validate_upload(bytes, self.config.max_upload_bytes)?;
        let path = upload(bytes, format)?;
        let url = self.reconciler.absolute_url(&path);
        log::debug!("Background uploaded as {} ({})", url, format.mime_type());
        self.set_background(url);
        Ok(format)
    }

    // ============================================================================
    // History
    // ============================================================================

    fn ensure_idle(&self) -> EditorResult<()> {
        if self.engine.is_active() {
            return Err(EditorError::GestureActive);
        }
        if self.widgets.is_editing() {
            return Err(EditorError::EditingActive);
        }
        Ok(())
    }

    fn drop_stale_selection(&mut self) {
        if let Some(id) = self.widgets.selected().cloned() {
            if self.layout.get(&id).is_none() {
                self.widgets.remove(&id);
            }
        }
    }

    pub fn undo(&mut self) -> EditorResult<bool> {
        self.ensure_idle()?;
        let undone = self.layout.undo();
        self.drop_stale_selection();
        Ok(undone)
    }

    pub fn redo(&mut self) -> EditorResult<bool> {
        self.ensure_idle()?;
        let redone = self.layout.redo();
        self.drop_stale_selection();
        Ok(redone)
    }

    // ============================================================================
    // Persistence
    // ============================================================================

    /// Validate and convert the layout to document space.
    pub fn to_document(&self) -> EditorResult<PersistedLayout> {
        Ok(self.reconciler.save(&self.layout)?)
    }

    /// Persist the layout under `key`. A pending inline edit is committed
    /// first; on failure nothing else in the editor changes.
    pub async fn save(&mut self, storage: &dyn Storage, key: &str) -> EditorResult<PersistedLayout> {
        if self.engine.is_active() {
            return Err(EditorError::GestureActive);
        }
        self.commit_text_edit()?;
        let persisted = self.to_document()?;
        storage.save(key, &persisted).await?;
        log::info!(
            "Saved layout '{}' as {} ({} elements)",
            persisted.name,
            key,
            persisted.elements.len()
        );
        self.mode = LayoutMode::Edit {
            id: key.to_string(),
        };
        Ok(persisted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{
        ImageElement, ImageSizeMode, PlaceholderType, QrCodeElement, ShapeElement, ShapeType,
        SignatureElement, TextElement,
    };
    use crate::input::Modifiers;
    use crate::storage::MemoryStorage;
    use pollster::block_on;

    fn id(s: &str) -> ElementId {
        ElementId::new(s)
    }

    fn editor() -> Editor {
        Editor::new(EditorConfig::default()).unwrap()
    }

    fn square(name: &str, x: f64, y: f64) -> Element {
        ShapeElement::new(id(name), ShapeType::Rectangle, x, y, 50.0, 50.0).into()
    }

    fn position(editor: &Editor, name: &str) -> (f64, f64) {
        let base = editor.layout().get(&id(name)).unwrap().base();
        (base.x, base.y)
    }

    #[test]
    fn test_deleting_selection_clears_it() {
        let mut editor = editor();
        editor.add_element(square("a", 0.0, 0.0)).unwrap();
        assert_eq!(editor.selected(), Some(&id("a")));

        editor.delete_selected().unwrap();
        assert_eq!(editor.selected(), None);
        assert!(editor.panel().is_none());
        assert!(matches!(editor.delete_selected(), Err(EditorError::NoSelection)));
    }

    #[test]
    fn test_deleting_edited_text_discards_buffer() {
        let mut editor = editor();
        editor
            .add_element(TextElement::new(id("t"), 10.0, 10.0, "Hello").into())
            .unwrap();
        editor.begin_text_edit(&id("t")).unwrap();
        editor.edit_buffer_mut().unwrap().push_str(" world");

        editor.remove_element(&id("t")).unwrap();
        assert_eq!(editor.editing(), None);
        assert_eq!(editor.selected(), None);
        assert!(editor.edit_buffer_mut().is_none());
    }

    #[test]
    fn test_delete_key_ignored_while_editing() {
        let mut editor = editor();
        editor
            .add_element(TextElement::new(id("t"), 10.0, 10.0, "Hi").into())
            .unwrap();
        editor.begin_text_edit(&id("t")).unwrap();

        assert!(editor.handle_key(&KeyEvent::new(Key::Backspace)).unwrap());
        assert_eq!(editor.layout().len(), 1);
        assert_eq!(editor.widgets().edit_buffer(), Some("H"));

        editor.handle_key(&KeyEvent::new(Key::Escape)).unwrap();
        assert!(editor.handle_key(&KeyEvent::new(Key::Delete)).unwrap());
        assert!(editor.layout().is_empty());
    }

    #[test]
    fn test_inline_edit_commit() {
        let mut editor = editor();
        editor
            .add_element(TextElement::new(id("t"), 10.0, 10.0, "Hi").into())
            .unwrap();
        assert!(editor.double_click(Point::new(15.0, 20.0)).unwrap());
        editor
            .handle_key(&KeyEvent::new(Key::Character("!".into())))
            .unwrap();
        let commit = KeyEvent::new(Key::Enter).with_modifiers(Modifiers {
            ctrl: true,
            ..Default::default()
        });
        editor.handle_key(&commit).unwrap();

        let text = editor.layout().get(&id("t")).unwrap().as_text().unwrap();
        assert_eq!(text.text, "Hi!");
        assert_eq!(editor.editing(), None);

        editor.undo().unwrap();
        let text = editor.layout().get(&id("t")).unwrap().as_text().unwrap();
        assert_eq!(text.text, "Hi");
    }

    #[test]
    fn test_placeholder_cannot_be_edited_inline() {
        let mut editor = editor();
        editor
            .add_element(TextElement::placeholder(id("n"), 10.0, 10.0, PlaceholderType::Name).into())
            .unwrap();
        assert!(matches!(
            editor.begin_text_edit(&id("n")),
            Err(EditorError::Validation(ValidationError::ReadOnlyPlaceholder(_)))
        ));
    }

    #[test]
    fn test_drag_is_coalesced_per_frame() {
        let mut editor = editor();
        editor.add_element(square("a", 100.0, 100.0)).unwrap();

        editor.pointer_down(Point::new(125.0, 125.0), MouseButton::Left).unwrap();
        assert!(!editor.pointer_move(Point::new(130.0, 130.0)));
        assert!(!editor.pointer_move(Point::new(135.0, 140.0)));
        assert_eq!(position(&editor, "a"), (100.0, 100.0));

        assert!(editor.begin_frame());
        assert_eq!(position(&editor, "a"), (110.0, 115.0));
        assert!(!editor.begin_frame());

        let outcome = editor.pointer_up(Point::new(140.0, 140.0)).unwrap();
        assert!(outcome.changed());
        assert_eq!(position(&editor, "a"), (115.0, 115.0));
        assert!(!editor.engine().is_active());
    }

    #[test]
    fn test_gesture_undo_restores_pre_gesture_geometry() {
        let mut editor = editor();
        editor.add_element(square("a", 100.0, 100.0)).unwrap();

        editor.pointer_down(Point::new(150.0, 150.0), MouseButton::Left).unwrap();
        assert_eq!(editor.engine().kind(), Some(GestureKind::Resize(crate::widget::Direction::Se)));
        editor.pointer_move(Point::new(170.0, 160.0));
        assert!(matches!(editor.undo(), Err(EditorError::GestureActive)));
        editor.pointer_up(Point::new(170.0, 160.0));

        assert_eq!(editor.layout().get(&id("a")).unwrap().size(), Some((70.0, 60.0)));
        editor.undo().unwrap();
        assert_eq!(editor.layout().get(&id("a")).unwrap().size(), Some((50.0, 50.0)));
        editor.redo().unwrap();
        assert_eq!(editor.layout().get(&id("a")).unwrap().size(), Some((70.0, 60.0)));
    }

    #[test]
    fn test_click_without_motion_keeps_redo() {
        let mut editor = editor();
        editor.add_element(square("a", 100.0, 100.0)).unwrap();
        editor.add_element(square("b", 300.0, 100.0)).unwrap();
        editor.undo().unwrap();
        assert!(editor.layout().can_redo());

        editor.pointer_down(Point::new(125.0, 125.0), MouseButton::Left).unwrap();
        let outcome = editor.pointer_up(Point::new(125.0, 125.0)).unwrap();
        assert!(!outcome.changed());
        assert!(editor.layout().can_redo());
    }

    #[test]
    fn test_pointer_routing() {
        let mut editor = editor();
        editor.add_element(square("a", 100.0, 100.0)).unwrap();
        editor.add_element(square("b", 300.0, 100.0)).unwrap();
        assert_eq!(editor.selected(), Some(&id("b")));

        editor.pointer_down(Point::new(120.0, 120.0), MouseButton::Left).unwrap();
        assert_eq!(editor.selected(), Some(&id("a")));
        editor.pointer_up(Point::new(120.0, 120.0));

        editor.pointer_down(Point::new(125.0, 75.0), MouseButton::Left).unwrap();
        assert_eq!(editor.engine().kind(), Some(GestureKind::Rotate));
        editor.pointer_up(Point::new(125.0, 75.0));

        editor.pointer_down(Point::new(600.0, 600.0), MouseButton::Left).unwrap();
        assert_eq!(editor.selected(), None);
        assert!(!editor.engine().is_active());
    }

    #[test]
    fn test_removed_target_abandons_gesture() {
        let mut editor = editor();
        editor.add_element(square("a", 100.0, 100.0)).unwrap();
        editor.pointer_down(Point::new(125.0, 125.0), MouseButton::Left).unwrap();
        editor.remove_element(&id("a")).unwrap();
        assert!(!editor.engine().is_active());
        assert!(editor.pointer_up(Point::new(140.0, 140.0)).is_none());
    }

    #[test]
    fn test_signature_panel_pins_size() {
        let mut editor = editor();
        editor
            .add_element(SignatureElement::new(id("sig"), 0.0, 0.0).into())
            .unwrap();
        assert!(!editor.apply_panel_edit(PanelEdit::Width(500.0)).unwrap());
        assert!(editor.apply_panel_edit(PanelEdit::Scale(1.5)).unwrap());
        let panel = editor.panel().unwrap();
        assert_eq!(panel.width, Some(200.0));
        assert_eq!(panel.scale, Some(1.5));
    }

    #[test]
    fn test_late_image_size() {
        let mut editor = editor();
        editor
            .add_element(ImageElement::new(id("img"), 0.0, 0.0, "https://x/a.png", 1.0, 1.0).into())
            .unwrap();
        assert!(editor.image_loaded(&id("img"), 640.0, 480.0));
        assert_eq!(editor.layout().get(&id("img")).unwrap().size(), Some((640.0, 480.0)));

        editor
            .apply_panel_edit(PanelEdit::ImageSizeMode(ImageSizeMode::Custom))
            .unwrap();
        assert!(!editor.image_loaded(&id("img"), 10.0, 10.0));

        editor.delete_selected().unwrap();
        assert!(!editor.image_loaded(&id("img"), 640.0, 480.0));
    }

    #[test]
    fn test_upload_background() {
        let mut editor = editor();
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

        let result = editor.upload_background(b"GIF89a", |_, _| Ok("storage/x.gif".into()));
        assert!(matches!(result, Err(EditorError::Asset(_))));
        assert_eq!(editor.layout().background, None);

        let result = editor.upload_background(&png, |_, _| {
            Err(StorageError::Rejected {
                status: 500,
                message: "disk full".into(),
            })
        });
        assert!(matches!(result, Err(EditorError::Storage(_))));
        assert_eq!(editor.layout().background, None);

        let format = editor
            .upload_background(&png, |_, _| Ok("storage/bg.png".into()))
            .unwrap();
        assert_eq!(format, ImageFormat::Png);
        assert_eq!(editor.layout().background.as_deref(), Some("storage/bg.png"));
    }

    #[test]
    fn test_same_background_records_no_undo() {
        let mut editor = editor();
        editor.set_background("storage/bg.png");
        editor.undo().unwrap();
        assert_eq!(editor.layout().background, None);
        editor.redo().unwrap();

        editor.set_background("storage/bg.png");
        editor.undo().unwrap();
        assert_eq!(editor.layout().background, None);
        assert!(!editor.layout().can_undo());
    }

    #[test]
    fn test_add_rejects_unsized_element() {
        let mut editor = editor();
        let flat = ShapeElement::new(id("flat"), ShapeType::Star, 0.0, 0.0, -5.0, 0.0);
        assert!(matches!(
            editor.add_element(flat.into()),
            Err(EditorError::Validation(ValidationError::InvalidValue { field: "width", .. }))
        ));
        assert!(editor.layout().is_empty());
        assert!(!editor.layout().can_undo());
        assert_eq!(editor.selected(), None);

        let qr = QrCodeElement::new(id("qr"), 0.0, 0.0);
        editor.add_element(qr.into()).unwrap();
        assert_eq!(editor.layout().len(), 1);
    }

    #[test]
    fn test_failed_save_keeps_create_mode() {
        let mut editor = editor();
        let storage = MemoryStorage::new();
        assert!(matches!(
            block_on(editor.save(&storage, "award")),
            Err(EditorError::Validation(ValidationError::MissingBackground))
        ));

        editor.set_background("storage/bg.png");
        storage.reject_saves(Some((503, "unavailable".into())));
        assert!(matches!(
            block_on(editor.save(&storage, "award")),
            Err(EditorError::Storage(StorageError::Rejected { status: 503, .. }))
        ));
        assert_eq!(editor.mode(), &LayoutMode::Create);

        storage.reject_saves(None);
        block_on(editor.save(&storage, "award")).unwrap();
        assert_eq!(
            editor.mode(),
            &LayoutMode::Edit {
                id: "award".into()
            }
        );
    }

    #[test]
    fn test_reorder_selected() {
        let mut editor = editor();
        editor.add_element(square("a", 0.0, 0.0)).unwrap();
        editor.add_element(square("b", 0.0, 0.0)).unwrap();
        assert!(!editor.reorder(ZOrder::Front).unwrap());
        assert!(editor.reorder(ZOrder::Back).unwrap());
        assert_eq!(editor.layout().elements()[0].id(), &id("b"));
    }
}

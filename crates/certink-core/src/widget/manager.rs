//! Widget manager for tracking selection and inline editing.

use super::handles::{Handle, handles_for};
use super::state::WidgetState;
use crate::elements::{Element, ElementId};

/// Tracks the selected element and the element being edited inline.
///
/// At most one element is selected and at most one is edited; the edited
/// element is always the selected one.
#[derive(Debug, Clone, Default)]
pub struct WidgetManager {
    selected: Option<ElementId>,
    editing: Option<ElementId>,
    /// Uncommitted inline text.
    edit_buffer: String,
}

impl WidgetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the state of an element.
    pub fn state(&self, id: &ElementId) -> WidgetState {
        if self.editing.as_ref() == Some(id) {
            WidgetState::Editing
        } else if self.selected.as_ref() == Some(id) {
            WidgetState::Selected
        } else {
            WidgetState::Normal
        }
    }

    pub fn selected(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Select a single element. Selecting another element ends any inline
    /// edit without committing it.
    pub fn select(&mut self, id: ElementId) {
        if self.editing.as_ref().is_some_and(|editing| *editing != id) {
            self.discard_editing();
        }
        self.selected = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.discard_editing();
        self.selected = None;
    }

    /// The element being edited inline, if any.
    pub fn editing(&self) -> Option<&ElementId> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Enter inline editing; the element becomes the selection.
    pub fn enter_editing(&mut self, id: ElementId, initial_text: impl Into<String>) {
        self.selected = Some(id.clone());
        self.editing = Some(id);
        self.edit_buffer = initial_text.into();
    }

    pub fn edit_buffer(&self) -> Option<&str> {
        self.editing.as_ref().map(|_| self.edit_buffer.as_str())
    }

    pub fn edit_buffer_mut(&mut self) -> Option<&mut String> {
        if self.editing.is_some() {
            Some(&mut self.edit_buffer)
        } else {
            None
        }
    }

    /// Leave editing mode, handing back the element id and the buffer.
    pub fn finish_editing(&mut self) -> Option<(ElementId, String)> {
        let id = self.editing.take()?;
        Some((id, std::mem::take(&mut self.edit_buffer)))
    }

    /// Leave editing mode and drop the buffer.
    pub fn discard_editing(&mut self) {
        self.editing = None;
        self.edit_buffer.clear();
    }

    /// Forget a deleted element.
    pub fn remove(&mut self, id: &ElementId) {
        if self.editing.as_ref() == Some(id) {
            self.discard_editing();
        }
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
    }

    /// Handles of an element, empty unless it is selected.
    pub fn handles(&self, element: &Element) -> Vec<Handle> {
        if !self.is_selected(element.id()) {
            return vec![];
        }
        handles_for(element)
    }
}

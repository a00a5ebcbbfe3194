//! Layout document and history.

use crate::elements::{Element, ElementId};
use crate::error::{LayoutError, ValidationError};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Maximum number of undo states to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// Whether the layout is new or hydrated from a saved one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LayoutMode {
    #[default]
    Create,
    /// Editing a persisted layout; `id` is the storage key it came from.
    Edit { id: String },
}

/// A snapshot of the element sequence for undo/redo.
#[derive(Debug, Clone)]
struct LayoutSnapshot {
    elements: Vec<Element>,
    background: Option<String>,
}

/// A certificate layout in editor space.
///
/// Element order is paint order: later elements are drawn on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub name: String,
    /// Background asset URL.
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    elements: Vec<Element>,
    /// Every id ever held, including deleted ones.
    #[serde(skip)]
    known_ids: HashSet<ElementId>,
    #[serde(skip)]
    undo_stack: Vec<LayoutSnapshot>,
    #[serde(skip)]
    redo_stack: Vec<LayoutSnapshot>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Layout {
    /// Create a new empty layout.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background: None,
            elements: Vec::new(),
            known_ids: HashSet::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Build a layout from an existing element sequence.
    pub fn with_elements(
        name: impl Into<String>,
        background: Option<String>,
        elements: Vec<Element>,
    ) -> Result<Self, LayoutError> {
        let mut layout = Self::new(name);
        layout.background = background;
        for element in elements {
            layout.add_element(element)?;
        }
        Ok(layout)
    }

    fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            elements: self.elements.clone(),
            background: self.background.clone(),
        }
    }

    fn restore(&mut self, snapshot: LayoutSnapshot) {
        self.elements = snapshot.elements;
        self.background = snapshot.background;
        for element in &self.elements {
            self.known_ids.insert(element.id().clone());
        }
    }

    /// Push current state to undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last change. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.redo_stack.push(current);
        self.restore(snapshot);
        true
    }

    /// Redo the last undone change. Returns false if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.undo_stack.push(current);
        self.restore(snapshot);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Append an element on top. Ids that are in use or were used before
    /// are rejected, and so are sized elements without a positive width and
    /// height.
    pub fn add_element(&mut self, element: Element) -> Result<(), LayoutError> {
        let id = element.id().clone();
        if self.known_ids.contains(&id) {
            return Err(LayoutError::DuplicateId(id));
        }
        element.validate_size()?;
        self.known_ids.insert(id);
        self.elements.push(element);
        Ok(())
    }

    /// Remove an element. Its id stays retired.
    pub fn remove_element(&mut self, id: &ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        Some(self.elements.remove(index))
    }

    /// Whether an id was ever used in this layout.
    pub fn is_known_id(&self, id: &ElementId) -> bool {
        self.known_ids.contains(id)
    }

    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    pub fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    /// Elements in paint order (back to front).
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Bring an element to the front (topmost).
    pub fn bring_to_front(&mut self, id: &ElementId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let element = self.elements.remove(index);
        self.elements.push(element);
        true
    }

    /// Send an element to the back (bottommost).
    pub fn send_to_back(&mut self, id: &ElementId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let element = self.elements.remove(index);
        self.elements.insert(0, element);
        true
    }

    /// Move an element one layer forward. Returns false if already at front.
    pub fn bring_forward(&mut self, id: &ElementId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos + 1 < self.elements.len() => {
                self.elements.swap(pos, pos + 1);
                true
            }
            _ => false,
        }
    }

    /// Move an element one layer backward. Returns false if already at back.
    pub fn send_backward(&mut self, id: &ElementId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos > 0 => {
                self.elements.swap(pos, pos - 1);
                true
            }
            _ => false,
        }
    }

    /// Top-most element under a point.
    pub fn element_at(&self, point: Point, tolerance: f64) -> Option<&ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.hit_test(point, tolerance))
            .map(|e| e.id())
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check everything that must hold before a save is attempted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.background.as_deref().is_none_or(|b| b.trim().is_empty()) {
            return Err(ValidationError::MissingBackground);
        }
        for element in &self.elements {
            element.validate_size()?;
            if let Element::Text(text) = element {
                text.validate()?;
            }
        }
        Ok(())
    }

    /// Serialize the layout to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a layout from JSON. Duplicate ids are rejected.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let parsed: Layout = serde_json::from_str(json)?;
        Self::with_elements(parsed.name, parsed.background, parsed.elements)
            .map_err(serde::de::Error::custom)
    }
}

//! CertInk Core Library
//!
//! Platform-agnostic layout authoring engine for CertInk certificate
//! templates: the element model, shape outlines, direct manipulation, and
//! the conversion between editor space and document space.

pub mod canvas;
pub mod config;
pub mod editor;
pub mod elements;
pub mod error;
pub mod geometry;
pub mod input;
pub mod panel;
pub mod persisted;
pub mod reconcile;
pub mod selection;
pub mod storage;
pub mod widget;

pub use canvas::{Layout, LayoutMode};
pub use config::{CoordinateConfig, EditorConfig};
pub use editor::{Editor, ZOrder};
pub use elements::{
    Element, ElementBase, ElementId, ImageElement, QrCodeElement, SerializableColor,
    ShapeElement, ShapeType, SignatureElement, TextElement,
};
pub use error::{
    AssetError, ConfigError, EditorError, EditorResult, LayoutError, StorageError,
    ValidationError,
};
pub use geometry::{Outline, outline};
pub use input::{KeyEvent, PointerEvent};
pub use panel::{PanelEdit, PropertyPanel};
pub use persisted::{PersistedElement, PersistedLayout};
pub use reconcile::Reconciler;
pub use selection::{GestureKind, GestureOutcome, GestureSnapshot, ManipulationEngine};
pub use storage::{MemoryStorage, Storage};
pub use widget::{Direction, HandleKind, WidgetManager, WidgetState};

//! Error types for layout authoring.
//!
//! Every failure here is recoverable: the operator fixes the input or
//! retries, and the editor state is left untouched.

use crate::elements::ElementId;
use thiserror::Error;

/// Input the operator must fix before a save is attempted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Text element {0} has empty custom text")]
    EmptyCustomText(ElementId),
    #[error("No background has been set")]
    MissingBackground,
    #[error("Layout name is empty")]
    EmptyName,
    #[error("Field '{field}' does not apply to {kind} elements")]
    FieldNotApplicable {
        field: &'static str,
        kind: &'static str,
    },
    #[error("Placeholder text of element {0} is read-only")]
    ReadOnlyPlaceholder(ElementId),
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}

/// Uploaded or referenced assets that could not be used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssetError {
    #[error("Unsupported file type")]
    UnsupportedType,
    #[error("File is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },
    #[error("File is empty")]
    Empty,
    #[error("Asset failed to load: {0}")]
    LoadFailed(String),
}

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Layout not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Save rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Structural errors on the element sequence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Element id {0} is already in use or was retired")]
    DuplicateId(ElementId),
    #[error("Element not found: {0}")]
    NotFound(ElementId),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Configuration values that cannot produce a usable transform.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("Backend origin is not an absolute URL: {0}")]
    InvalidOrigin(String),
    #[error("Could not read config: {0}")]
    Read(String),
}

/// Errors surfaced by the editor controller.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("A gesture is already in progress")]
    GestureActive,
    #[error("Inline text editing is active")]
    EditingActive,
    #[error("Element {0} cannot be resized")]
    NotResizable(ElementId),
    #[error("Nothing is selected")]
    NoSelection,
}

pub type EditorResult<T> = Result<T, EditorError>;

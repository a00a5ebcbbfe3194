//! Interactive state of layout elements.
//!
//! Elements remain pure data. The widget layer tracks which element is
//! selected or being edited inline and where its manipulation handles sit.

mod handles;
mod manager;
mod state;

pub use handles::{
    Direction, HANDLE_HIT_TOLERANCE, Handle, HandleKind, ROTATE_HANDLE_OFFSET, handles_for,
    hit_test_handles,
};
pub use manager::WidgetManager;
pub use state::WidgetState;

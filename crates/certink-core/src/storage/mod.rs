//! Storage abstraction for persisted layouts.
//!
//! The data service owning layouts is external; this trait is the seam the
//! editor saves through. Local backends cover tests and the CLI.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

pub use crate::error::{StorageError, StorageResult};

use crate::elements::ImageFormat;
use crate::error::AssetError;
use crate::persisted::PersistedLayout;
use std::future::Future;
use std::pin::Pin;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for layout storage backends.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Save a layout under a key, replacing any previous version.
    fn save(&self, id: &str, layout: &PersistedLayout) -> BoxFuture<'_, StorageResult<()>>;

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<PersistedLayout>>;

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all layout keys.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Trait for layout storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    fn save(&self, id: &str, layout: &PersistedLayout) -> BoxFuture<'_, StorageResult<()>>;
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<PersistedLayout>>;
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Check an uploaded image before handing it to the data service.
pub fn validate_upload(bytes: &[u8], limit: usize) -> Result<ImageFormat, AssetError> {
    if bytes.is_empty() {
        return Err(AssetError::Empty);
    }
    if bytes.len() > limit {
        return Err(AssetError::TooLarge {
            size: bytes.len(),
            limit,
        });
    }
    ImageFormat::from_magic_bytes(bytes).ok_or(AssetError::UnsupportedType)
}

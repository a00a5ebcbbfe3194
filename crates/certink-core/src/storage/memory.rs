//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::persisted::PersistedLayout;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    layouts: RwLock<HashMap<String, PersistedLayout>>,
    /// When set, saves fail as if the service answered with this status.
    rejection: RwLock<Option<(u16, String)>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent saves fail with a service error, or succeed again
    /// with `None`.
    pub fn reject_saves(&self, rejection: Option<(u16, String)>) {
        if let Ok(mut slot) = self.rejection.write() {
            *slot = rejection;
        }
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, layout: &PersistedLayout) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let layout = layout.clone();
        Box::pin(async move {
            if let Some((status, message)) = self.rejection.read().map_err(lock_error)?.clone() {
                return Err(StorageError::Rejected { status, message });
            }
            let mut layouts = self.layouts.write().map_err(lock_error)?;
            layouts.insert(id, layout);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<PersistedLayout>> {
        let id = id.to_string();
        Box::pin(async move {
            let layouts = self.layouts.read().map_err(lock_error)?;
            layouts
                .get(&id)
                .cloned()
                .ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut layouts = self.layouts.write().map_err(lock_error)?;
            layouts.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let layouts = self.layouts.read().map_err(lock_error)?;
            let mut ids: Vec<String> = layouts.keys().cloned().collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let layouts = self.layouts.read().map_err(lock_error)?;
            Ok(layouts.contains_key(&id))
        })
    }
}

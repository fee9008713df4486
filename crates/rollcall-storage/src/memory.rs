//! In-memory store for tests and dry runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use rollcall_core::error::StorageError;
use rollcall_core::traits::Persistence;

/// A `Persistence` backend that keeps blobs in a shared map.
///
/// Clones share the same map, so a test can hand one clone to a tracker and
/// inspect what was saved through another.
#[derive(Clone, Default)]
pub struct MemoryStore {
    blobs: Arc<Mutex<HashMap<String, String>>>,
    /// Number of successful saves.
    save_count: Arc<AtomicU32>,
    /// When set, every save fails with `StorageError::Unavailable`.
    fail_saves: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with blobs.
    pub fn with_blobs<'a>(blobs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        {
            let mut map = store.lock();
            for (key, blob) in blobs {
                map.insert(key.to_string(), blob.to_string());
            }
        }
        store
    }

    /// The blob stored under `key`, if any.
    pub fn blob(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    /// Get the number of successful saves.
    pub fn save_count(&self) -> u32 {
        self.save_count.load(Ordering::Relaxed)
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::Relaxed);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a consistent map of strings.
        self.blobs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Persistence for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.blob(key))
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::Relaxed) {
            return Err(StorageError::Unavailable(format!(
                "memory store is refusing saves ({key})"
            )));
        }
        self.lock().insert(key.to_string(), blob.to_string());
        self.save_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

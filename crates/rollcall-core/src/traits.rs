//! The persistence seam.
//!
//! Backends live in `rollcall-storage`. The core only ever hands them opaque
//! JSON blobs under the two keys below.

use crate::error::StorageError;

/// Blob key holding the roster snapshot.
pub const STUDENTS_KEY: &str = "students";

/// Blob key holding the attendance log snapshot.
pub const ATTENDANCE_KEY: &str = "attendance";

/// Durable key-value storage for roster and attendance snapshots.
///
/// `save` must be atomic: either the new blob is stored or the old one stays.
pub trait Persistence: Send + Sync {
    /// Human-readable backend name (e.g. "file").
    fn name(&self) -> &str;

    /// Load a blob. `Ok(None)` means nothing has been stored under `key` yet.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store a blob, replacing any previous value.
    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError>;
}

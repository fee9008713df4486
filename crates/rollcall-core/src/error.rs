//! Error types for roster, attendance, and persistence operations.
//!
//! `StorageError` is what a `Persistence` backend reports. The tracker wraps it
//! in `AttendanceError::Persistence` together with the blob key that failed.

use thiserror::Error;

/// Errors surfaced by core operations.
#[derive(Debug, Error)]
pub enum AttendanceError {
    /// A student with this id is already on the roster.
    #[error("student with ID {0} already exists")]
    DuplicateId(String),

    /// No student with this id is on the roster.
    #[error("no student with ID {0}")]
    NotFound(String),

    /// The string is not a zero-padded `DD/MM/YYYY` calendar date.
    #[error("invalid date '{0}', expected DD/MM/YYYY")]
    InvalidDate(String),

    /// Loading or saving a blob failed.
    #[error("persistence failure for '{key}': {source}")]
    Persistence {
        key: String,
        #[source]
        source: StorageError,
    },
}

impl AttendanceError {
    /// Returns `true` for errors the user can fix by changing their input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AttendanceError::DuplicateId(_)
                | AttendanceError::NotFound(_)
                | AttendanceError::InvalidDate(_)
        )
    }

    pub(crate) fn persistence(key: &str, source: impl Into<StorageError>) -> Self {
        AttendanceError::Persistence {
            key: key.to_string(),
            source: source.into(),
        }
    }
}

/// Errors reported by a persistence backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored blob could not be encoded or decoded.
    #[error("malformed blob: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, AttendanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_are_classified() {
        assert!(AttendanceError::DuplicateId("101".into()).is_user_error());
        assert!(AttendanceError::InvalidDate("2025-01-01".into()).is_user_error());
        let err = AttendanceError::persistence("students", StorageError::Unavailable("disk full".into()));
        assert!(!err.is_user_error());
    }

    #[test]
    fn persistence_error_names_key() {
        let err = AttendanceError::persistence("attendance", StorageError::Unavailable("read-only".into()));
        let msg = err.to_string();
        assert!(msg.contains("attendance"));
        assert!(msg.contains("read-only"));
    }
}

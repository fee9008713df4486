//! rollcall-core: Roster, attendance log, and statistics engine.
//!
//! This crate defines the student and attendance data model, the derived
//! statistics, and the persistence seam that the rest of rollcall builds on.

pub mod attendance;
pub mod error;
pub mod model;
pub mod report;
pub mod roster;
pub mod statistics;
pub mod tracker;
pub mod traits;

pub use attendance::AttendanceLog;
pub use error::{AttendanceError, StorageError};
pub use model::{AttendanceDate, AttendanceStatus, CourseFilter, Student};
pub use roster::Roster;
pub use statistics::{StatisticsConfig, StatisticsEngine};
pub use tracker::{EditDraft, Tracker};
pub use traits::Persistence;

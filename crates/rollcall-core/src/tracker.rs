//! Application state: the roster, the attendance log, and where they are saved.
//!
//! Every mutating operation applies the change in memory and then writes the
//! affected snapshot through to the store. A failed save is returned to the
//! caller but the in-memory change is kept; the next successful save brings
//! the store back in line.

use tracing::{debug, info, warn};

use crate::attendance::AttendanceLog;
use crate::error::{AttendanceError, Result};
use crate::model::{sample_students, AttendanceDate, AttendanceStatus, CourseFilter, Student};
use crate::roster::{decode_roster, Roster};
use crate::statistics::{StatisticsConfig, StatisticsEngine};
use crate::traits::{Persistence, ATTENDANCE_KEY, STUDENTS_KEY};

/// A pending edit of one student.
///
/// The student stays on the roster, unchanged, until the draft is committed.
/// Dropping the draft abandons the edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    original_id: String,
    pub id: String,
    pub name: String,
    pub course: String,
}

impl EditDraft {
    /// The id the student had when the edit began.
    pub fn original_id(&self) -> &str {
        &self.original_id
    }
}

/// Owns the roster and the attendance log and keeps the store in sync.
pub struct Tracker {
    roster: Roster,
    log: AttendanceLog,
    store: Box<dyn Persistence>,
    statistics: StatisticsConfig,
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("students", &self.roster.len())
            .field("days", &self.log.len())
            .field("store", &self.store.name())
            .finish()
    }
}

impl Tracker {
    /// Load both snapshots from `store`.
    ///
    /// A missing or empty roster is seeded with the sample students and saved.
    /// Legacy `class` records are migrated and the roster saved back. If that
    /// save fails the tracker still opens with the in-memory roster; the next
    /// successful write persists it.
    pub fn open(store: Box<dyn Persistence>) -> Result<Self> {
        let (roster, roster_dirty) = match store
            .load(STUDENTS_KEY)
            .map_err(|e| AttendanceError::persistence(STUDENTS_KEY, e))?
        {
            None => {
                info!("no stored roster, seeding sample students");
                (seed_roster()?, true)
            }
            Some(blob) => {
                let loaded =
                    decode_roster(&blob).map_err(|e| AttendanceError::persistence(STUDENTS_KEY, e))?;
                if loaded.roster.is_empty() {
                    info!("stored roster is empty, seeding sample students");
                    (seed_roster()?, true)
                } else {
                    if loaded.migrated > 0 {
                        info!(migrated = loaded.migrated, "renamed legacy 'class' fields to 'course'");
                    }
                    (loaded.roster, loaded.migrated > 0)
                }
            }
        };

        let log = match store
            .load(ATTENDANCE_KEY)
            .map_err(|e| AttendanceError::persistence(ATTENDANCE_KEY, e))?
        {
            Some(blob) => serde_json::from_str(&blob)
                .map_err(|e| AttendanceError::persistence(ATTENDANCE_KEY, e))?,
            None => AttendanceLog::new(),
        };

        let tracker = Self {
            roster,
            log,
            store,
            statistics: StatisticsConfig::default(),
        };

        if roster_dirty {
            if let Err(e) = tracker.save_students() {
                warn!("seeded or migrated roster not saved: {e}");
            }
        }

        debug!(
            students = tracker.roster.len(),
            days = tracker.log.len(),
            store = tracker.store.name(),
            "tracker opened"
        );
        Ok(tracker)
    }

    pub fn with_statistics_config(mut self, config: StatisticsConfig) -> Self {
        self.statistics = config;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn log(&self) -> &AttendanceLog {
        &self.log
    }

    /// Statistics over the current state.
    pub fn stats(&self) -> StatisticsEngine<'_> {
        StatisticsEngine::with_config(&self.roster, &self.log, self.statistics)
    }

    pub fn add_student(&mut self, id: &str, name: &str, course: &str) -> Result<()> {
        self.roster.add(id, name, course)?;
        info!(id, course, "student added");
        self.save_students()
    }

    /// Remove a student. Their attendance history is kept.
    ///
    /// Unknown ids are a silent no-op and nothing is saved.
    pub fn remove_student(&mut self, id: &str) -> Result<Option<Student>> {
        let Some(removed) = self.roster.remove(id) else {
            debug!(id, "remove of unknown student ignored");
            return Ok(None);
        };
        info!(id, "student removed");
        self.save_students()?;
        Ok(Some(removed))
    }

    /// Start editing a student. The roster is not touched.
    pub fn begin_edit(&self, id: &str) -> Result<EditDraft> {
        let student = self
            .roster
            .find_by_id(id)
            .ok_or_else(|| AttendanceError::NotFound(id.to_string()))?;
        Ok(EditDraft {
            original_id: student.id.clone(),
            id: student.id.clone(),
            name: student.name.clone(),
            course: student.course.clone(),
        })
    }

    /// Apply an edit in place.
    ///
    /// Changing the id to one owned by another student fails with
    /// `DuplicateId`. If the student was removed while the draft was open the
    /// draft is added back as a new record. History recorded under the old id
    /// stays under the old id.
    pub fn commit_edit(&mut self, draft: EditDraft) -> Result<()> {
        let student = Student::new(draft.id, draft.name, draft.course);
        if self.roster.contains(&draft.original_id) {
            self.roster.replace(&draft.original_id, student)?;
        } else {
            self.roster.insert(student)?;
        }
        info!(id = %draft.original_id, "student edited");
        self.save_students()
    }

    pub fn set_status(
        &mut self,
        date: AttendanceDate,
        student_id: &str,
        status: AttendanceStatus,
    ) -> Result<()> {
        self.log.set_status(date, student_id, status);
        debug!(%date, student_id, %status, "status recorded");
        self.save_attendance()
    }

    /// Mark every student in the selected course. Returns how many were marked.
    pub fn bulk_set_status(
        &mut self,
        date: AttendanceDate,
        filter: &CourseFilter,
        status: AttendanceStatus,
    ) -> Result<usize> {
        let ids: Vec<&str> = self
            .roster
            .filter_by_course(filter)
            .into_iter()
            .map(|s| s.id.as_str())
            .collect();
        let marked = self.log.bulk_set_status(date, ids, status);
        info!(%date, course = %filter, %status, marked, "bulk status recorded");
        if marked == 0 {
            return Ok(0);
        }
        self.save_attendance()?;
        Ok(marked)
    }

    /// Write both snapshots, e.g. after an earlier save failed.
    pub fn save_all(&self) -> Result<()> {
        self.save_students()?;
        self.save_attendance()
    }

    fn save_students(&self) -> Result<()> {
        self.save_blob(STUDENTS_KEY, serde_json::to_string(&self.roster))
    }

    fn save_attendance(&self) -> Result<()> {
        self.save_blob(ATTENDANCE_KEY, serde_json::to_string(&self.log))
    }

    fn save_blob(&self, key: &str, encoded: serde_json::Result<String>) -> Result<()> {
        let blob = encoded.map_err(|e| AttendanceError::persistence(key, e))?;
        self.store
            .save(key, &blob)
            .map_err(|e| AttendanceError::persistence(key, e))?;
        debug!(key, bytes = blob.len(), "snapshot saved");
        Ok(())
    }
}

fn seed_roster() -> Result<Roster> {
    Roster::from_students(sample_students())
}

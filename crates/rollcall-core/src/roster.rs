//! The roster of enrolled students.
//!
//! Students keep their insertion order; every filtered view is a stable
//! subsequence of it.

use serde::{Deserialize, Serialize};

use crate::error::{AttendanceError, Result};
use crate::model::{CourseFilter, Student};

/// The set of enrolled students, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    students: Vec<Student>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from records, rejecting the first duplicate id.
    pub fn from_students(students: impl IntoIterator<Item = Student>) -> Result<Self> {
        let mut roster = Self::new();
        for student in students {
            roster.insert(student)?;
        }
        Ok(roster)
    }

    /// Add a student. Fails without touching the roster if the id is taken.
    pub fn add(&mut self, id: &str, name: &str, course: &str) -> Result<()> {
        self.insert(Student::new(id, name, course))
    }

    pub fn insert(&mut self, student: Student) -> Result<()> {
        if self.contains(&student.id) {
            return Err(AttendanceError::DuplicateId(student.id));
        }
        self.students.push(student);
        Ok(())
    }

    /// Remove a student by id. Unknown ids are a no-op and return `None`.
    pub fn remove(&mut self, id: &str) -> Option<Student> {
        let index = self.position(id)?;
        Some(self.students.remove(index))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Students in the selected course, in insertion order.
    pub fn filter_by_course(&self, filter: &CourseFilter) -> Vec<&Student> {
        self.students.iter().filter(|s| filter.matches(s)).collect()
    }

    /// Distinct course labels in first-seen order.
    pub fn courses(&self) -> Vec<&str> {
        let mut courses: Vec<&str> = Vec::new();
        for student in &self.students {
            if !courses.contains(&student.course.as_str()) {
                courses.push(&student.course);
            }
        }
        courses
    }

    /// Overwrite the record stored under `id`, keeping its position.
    ///
    /// The replacement may carry a new id as long as no other student owns it.
    pub(crate) fn replace(&mut self, id: &str, student: Student) -> Result<()> {
        let index = self
            .position(id)
            .ok_or_else(|| AttendanceError::NotFound(id.to_string()))?;
        if student.id != id && self.contains(&student.id) {
            return Err(AttendanceError::DuplicateId(student.id));
        }
        self.students[index] = student;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Student> {
        self.students.iter()
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.students.iter().position(|s| s.id == id)
    }
}

/// A stored student record that may predate the `class` → `course` rename.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredStudent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
}

impl StoredStudent {
    /// Whether loading this record rewrites a legacy `class` field.
    pub fn is_legacy(&self) -> bool {
        self.course.is_none() && self.class.is_some()
    }

    /// Convert to the current shape. An existing `course` always wins over `class`.
    pub fn migrate(self) -> Student {
        Student {
            id: self.id,
            name: self.name,
            course: self.course.or(self.class).unwrap_or_default(),
        }
    }
}

/// Outcome of decoding a stored roster blob.
#[derive(Debug, Clone)]
pub struct LoadedRoster {
    pub roster: Roster,
    /// How many records were rewritten from `class` to `course`.
    pub migrated: usize,
}

/// Decode a stored roster blob, migrating legacy records.
///
/// Duplicate ids in stored data keep the first occurrence.
pub fn decode_roster(blob: &str) -> std::result::Result<LoadedRoster, serde_json::Error> {
    let records: Vec<StoredStudent> = serde_json::from_str(blob)?;
    let migrated = records.iter().filter(|r| r.is_legacy()).count();

    let mut roster = Roster::new();
    for record in records {
        let student = record.migrate();
        if let Err(e) = roster.insert(student) {
            tracing::warn!("dropping stored record: {e}");
        }
    }

    Ok(LoadedRoster { roster, migrated })
}

//! Core data model types for rollcall.
//!
//! Students, attendance statuses, boundary dates, and the course selector
//! used by every filtered view.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::AttendanceError;

/// Boundary format for every date the core accepts or stores.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Selector value meaning "every course".
pub const ALL_COURSES: &str = "all";

/// An enrolled student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// User-assigned identifier, unique across the roster.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Enrollment group label (e.g. "BCA").
    pub course: String,
}

impl Student {
    pub fn new(id: impl Into<String>, name: impl Into<String>, course: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            course: course.into(),
        }
    }

    /// First character of the name, used for avatars.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next()
    }
}

/// The built-in roster written on first run.
pub fn sample_students() -> Vec<Student> {
    vec![
        Student::new("101", "Alok Sharma", "BCA"),
        Student::new("102", "Bhavna Kumari", "B.Com"),
        Student::new("103", "Chirag Gupta", "B.Tech"),
    ]
}

/// A recorded attendance status.
///
/// A student with no record for a date has no status at all; that case is
/// represented as `None` by lookups, never as `Absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "present"),
            AttendanceStatus::Absent => write!(f, "absent"),
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "present" | "p" => Ok(AttendanceStatus::Present),
            "absent" | "a" => Ok(AttendanceStatus::Absent),
            other => Err(format!("unknown attendance status: {other}")),
        }
    }
}

/// A local calendar day, written as `DD/MM/YYYY` at every boundary.
///
/// Ordering follows the calendar, not the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttendanceDate(NaiveDate);

impl AttendanceDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from day, month, and year; `None` if not a real date.
    pub fn from_dmy(day: u32, month: u32, year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Today in the local timezone.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for AttendanceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for AttendanceDate {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono accepts unpadded fields; the boundary format does not.
        let bytes = s.as_bytes();
        let shaped = bytes.len() == 10
            && bytes[2] == b'/'
            && bytes[5] == b'/'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit());
        if !shaped {
            return Err(AttendanceError::InvalidDate(s.to_string()));
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Self)
            .map_err(|_| AttendanceError::InvalidDate(s.to_string()))
    }
}

impl TryFrom<String> for AttendanceDate {
    type Error = AttendanceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AttendanceDate> for String {
    fn from(date: AttendanceDate) -> Self {
        date.to_string()
    }
}

/// Which students a filtered view covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CourseFilter {
    #[default]
    All,
    Course(String),
}

impl CourseFilter {
    pub fn matches(&self, student: &Student) -> bool {
        match self {
            CourseFilter::All => true,
            CourseFilter::Course(course) => student.course == *course,
        }
    }
}

impl fmt::Display for CourseFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseFilter::All => write!(f, "{ALL_COURSES}"),
            CourseFilter::Course(course) => write!(f, "{course}"),
        }
    }
}

impl From<&str> for CourseFilter {
    /// `"all"` and the empty string select every course.
    fn from(value: &str) -> Self {
        if value.is_empty() || value == ALL_COURSES {
            CourseFilter::All
        } else {
            CourseFilter::Course(value.to_string())
        }
    }
}

impl FromStr for CourseFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CourseFilter::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_and_parse() {
        assert_eq!(AttendanceStatus::Present.to_string(), "present");
        assert_eq!("Absent".parse::<AttendanceStatus>().unwrap(), AttendanceStatus::Absent);
        assert_eq!("p".parse::<AttendanceStatus>().unwrap(), AttendanceStatus::Present);
        assert!("late".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&AttendanceStatus::Present).unwrap();
        assert_eq!(json, "\"present\"");
    }

    #[test]
    fn date_parse_and_display() {
        let date: AttendanceDate = "01/01/2025".parse().unwrap();
        assert_eq!(date, AttendanceDate::from_dmy(1, 1, 2025).unwrap());
        assert_eq!(date.to_string(), "01/01/2025");
    }

    #[test]
    fn date_rejects_iso_and_unpadded() {
        assert!("2025-01-01".parse::<AttendanceDate>().is_err());
        assert!("1/1/2025".parse::<AttendanceDate>().is_err());
        assert!("31/02/2025".parse::<AttendanceDate>().is_err());
        assert!("".parse::<AttendanceDate>().is_err());
    }

    #[test]
    fn dates_order_by_calendar_not_text() {
        let earlier: AttendanceDate = "31/12/2024".parse().unwrap();
        let later: AttendanceDate = "01/01/2025".parse().unwrap();
        assert!(earlier < later);
        // As text the order is the other way round.
        assert!("31/12/2024" > "01/01/2025");
    }

    #[test]
    fn date_serializes_as_boundary_string() {
        let date = AttendanceDate::from_dmy(5, 3, 2025).unwrap();
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"05/03/2025\"");
        let back: AttendanceDate = serde_json::from_str("\"05/03/2025\"").unwrap();
        assert_eq!(back, date);
        assert!(serde_json::from_str::<AttendanceDate>("\"2025-03-05\"").is_err());
    }

    #[test]
    fn course_filter_sentinels() {
        assert_eq!(CourseFilter::from("all"), CourseFilter::All);
        assert_eq!(CourseFilter::from(""), CourseFilter::All);
        assert_eq!(CourseFilter::from("BCA"), CourseFilter::Course("BCA".into()));
        let student = Student::new("1", "A", "BCA");
        assert!(CourseFilter::All.matches(&student));
        assert!(!CourseFilter::from("B.Com").matches(&student));
    }

    #[test]
    fn sample_roster_has_three_students() {
        let students = sample_students();
        assert_eq!(students.len(), 3);
        assert_eq!(students[0].id, "101");
        assert_eq!(students[1].course, "B.Com");
        assert_eq!(students[2].initial(), Some('C'));
    }
}

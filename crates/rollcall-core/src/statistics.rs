//! Derived attendance statistics.
//!
//! Everything here is recomputed from the roster and the log on each call.
//! Nothing is cached and nothing is written, so the engine can be queried at
//! any point, including halfway through a batch of updates.

use serde::{Deserialize, Serialize};

use crate::attendance::AttendanceLog;
use crate::model::{AttendanceDate, AttendanceStatus, CourseFilter, Student};
use crate::roster::Roster;

/// Streak length that raises the consecutive-absence warning.
pub const DEFAULT_STREAK_THRESHOLD: usize = 3;

/// Percentage at or above which a student's attendance counts as good.
pub const DEFAULT_GOOD_ATTENDANCE_PERCENT: u32 = 80;

/// Thresholds used when classifying students.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsConfig {
    pub streak_threshold: usize,
    pub good_attendance_percent: u32,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            streak_threshold: DEFAULT_STREAK_THRESHOLD,
            good_attendance_percent: DEFAULT_GOOD_ATTENDANCE_PERCENT,
        }
    }
}

/// `round(part / whole * 100)`, rounding halves up. Zero when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = part as u64;
    let whole = whole as u64;
    ((part * 200 + whole) / (whole * 2)) as u32
}

/// Alert text for students on a long absence streak, or `None` if there are none.
///
/// "A has been..." for one name, "A, B have been..." for several.
pub fn absence_alert_message(names: &[&str], threshold: usize) -> Option<String> {
    if names.is_empty() {
        return None;
    }
    let verb = if names.len() == 1 { "has" } else { "have" };
    Some(format!(
        "{} {verb} been absent for {threshold} consecutive days.",
        names.join(", ")
    ))
}

/// Headline numbers for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub date: AttendanceDate,
    pub total_students: usize,
    pub present_today: usize,
    /// Integer percentage of the roster marked present.
    pub attendance_rate: u32,
}

/// Overall standing of a student in the historical report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    Good,
    AtRisk,
}

impl std::fmt::Display for Standing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Standing::Good => write!(f, "good"),
            Standing::AtRisk => write!(f, "at risk"),
        }
    }
}

/// One row of the historical report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentReport {
    pub student: Student,
    pub present_days: usize,
    pub absent_days: usize,
    /// Days with a record for this student; unset days are not counted.
    pub total_days: usize,
    pub percentage: u32,
    pub standing: Standing,
    pub consecutive_absences: usize,
    /// Set when the current streak reaches the configured threshold.
    pub streak_warning: bool,
}

/// One row of the daily attendance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRow {
    pub student: Student,
    /// Status to show; unset reads as absent.
    pub status: AttendanceStatus,
    /// Whether a status was actually recorded for this day.
    pub recorded: bool,
    pub consecutive_absences: usize,
    pub streak_warning: bool,
}

/// The daily attendance view for one course selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSheet {
    pub date: AttendanceDate,
    pub course_filter: String,
    pub rows: Vec<SheetRow>,
    /// Alert text when some listed student is on a long absence streak.
    pub alert: Option<String>,
}

/// Read-only queries over a roster and an attendance log.
#[derive(Debug, Clone, Copy)]
pub struct StatisticsEngine<'a> {
    roster: &'a Roster,
    log: &'a AttendanceLog,
    config: StatisticsConfig,
}

impl<'a> StatisticsEngine<'a> {
    pub fn new(roster: &'a Roster, log: &'a AttendanceLog) -> Self {
        Self::with_config(roster, log, StatisticsConfig::default())
    }

    pub fn with_config(roster: &'a Roster, log: &'a AttendanceLog, config: StatisticsConfig) -> Self {
        Self {
            roster,
            log,
            config,
        }
    }

    pub fn config(&self) -> StatisticsConfig {
        self.config
    }

    /// Roster students marked present on `date`.
    ///
    /// Unset students are simply not counted. Only students currently on the
    /// roster are counted: present records kept for removed students are
    /// ignored, unlike a raw count of the day's present records, so the rate
    /// never exceeds 100.
    pub fn today_present_count(&self, date: AttendanceDate) -> usize {
        let Some(day) = self.log.day(date) else {
            return 0;
        };
        self.roster
            .iter()
            .filter(|s| day.get(&s.id) == Some(&AttendanceStatus::Present))
            .count()
    }

    /// Percentage of the roster present on `date`; 0 for an empty roster.
    pub fn attendance_rate(&self, date: AttendanceDate) -> u32 {
        percentage(self.today_present_count(date), self.roster.len())
    }

    pub fn dashboard(&self, date: AttendanceDate) -> DashboardSummary {
        DashboardSummary {
            date,
            total_students: self.roster.len(),
            present_today: self.today_present_count(date),
            attendance_rate: self.attendance_rate(date),
        }
    }

    /// Length of the absence streak ending at the most recent recorded date.
    ///
    /// A present status or a missing record both end the streak.
    pub fn consecutive_absences(&self, student_id: &str) -> usize {
        self.log
            .days_descending()
            .take_while(|(_, day)| day.get(student_id) == Some(&AttendanceStatus::Absent))
            .count()
    }

    /// The students whose streak is at least `threshold`, in input order.
    pub fn students_with_long_absence_streak<'s>(
        &self,
        students: impl IntoIterator<Item = &'s Student>,
        threshold: usize,
    ) -> Vec<&'s Student> {
        students
            .into_iter()
            .filter(|s| self.consecutive_absences(&s.id) >= threshold)
            .collect()
    }

    /// Alert text for the given students using the configured threshold.
    pub fn absence_alert<'s>(&self, students: impl IntoIterator<Item = &'s Student>) -> Option<String> {
        let threshold = self.config.streak_threshold;
        let flagged = self.students_with_long_absence_streak(students, threshold);
        let names: Vec<&str> = flagged.iter().map(|s| s.name.as_str()).collect();
        absence_alert_message(&names, threshold)
    }

    /// Historical counts and standing for each student, in input order.
    pub fn course_report<'s>(&self, students: impl IntoIterator<Item = &'s Student>) -> Vec<StudentReport> {
        students
            .into_iter()
            .map(|student| self.student_report(student))
            .collect()
    }

    pub fn student_report(&self, student: &Student) -> StudentReport {
        let mut present_days = 0;
        let mut absent_days = 0;
        for (_, day) in self.log.days_descending() {
            match day.get(&student.id) {
                Some(AttendanceStatus::Present) => present_days += 1,
                Some(AttendanceStatus::Absent) => absent_days += 1,
                None => {}
            }
        }

        let total_days = present_days + absent_days;
        let pct = percentage(present_days, total_days);
        let streak = self.consecutive_absences(&student.id);

        StudentReport {
            student: student.clone(),
            present_days,
            absent_days,
            total_days,
            percentage: pct,
            standing: if pct >= self.config.good_attendance_percent {
                Standing::Good
            } else {
                Standing::AtRisk
            },
            consecutive_absences: streak,
            streak_warning: streak >= self.config.streak_threshold,
        }
    }

    /// The daily attendance view for `date` and a course selector.
    pub fn attendance_sheet(&self, date: AttendanceDate, filter: &CourseFilter) -> AttendanceSheet {
        let students = self.roster.filter_by_course(filter);

        let rows = students
            .iter()
            .map(|student| {
                let recorded = self.log.get_status(date, &student.id);
                let streak = self.consecutive_absences(&student.id);
                SheetRow {
                    student: (*student).clone(),
                    status: recorded.unwrap_or(AttendanceStatus::Absent),
                    recorded: recorded.is_some(),
                    consecutive_absences: streak,
                    streak_warning: streak >= self.config.streak_threshold,
                }
            })
            .collect();

        AttendanceSheet {
            date,
            course_filter: filter.to_string(),
            rows,
            alert: self.absence_alert(students.iter().copied()),
        }
    }
}

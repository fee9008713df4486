//! Historical attendance reports with JSON persistence and markdown output.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{AttendanceDate, CourseFilter};
use crate::statistics::{DashboardSummary, Standing, StudentReport};
use crate::tracker::Tracker;

/// A complete attendance report for one course selector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceReport {
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Course selector the rows were filtered by ("all" for everyone).
    pub course_filter: String,
    /// Headline numbers for the report date.
    pub dashboard: DashboardSummary,
    /// Days with at least one record.
    pub recorded_days: usize,
    /// Per-student rows in roster order.
    pub rows: Vec<StudentReport>,
}

impl AttendanceReport {
    /// Build a report from the current tracker state.
    pub fn generate(tracker: &Tracker, date: AttendanceDate, filter: &CourseFilter) -> Self {
        let stats = tracker.stats();
        let students = tracker.roster().filter_by_course(filter);
        Self {
            created_at: Utc::now(),
            course_filter: filter.to_string(),
            dashboard: stats.dashboard(date),
            recorded_days: tracker.log().len(),
            rows: stats.course_report(students),
        }
    }

    /// Rows flagged at risk or on a long absence streak.
    pub fn flagged(&self) -> impl Iterator<Item = &StudentReport> {
        self.rows
            .iter()
            .filter(|r| r.standing == Standing::AtRisk || r.streak_warning)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AttendanceReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Attendance report** for `{}` on {}: {} students, {} present ({}%), {} recorded days\n\n",
            self.course_filter,
            self.dashboard.date,
            self.dashboard.total_students,
            self.dashboard.present_today,
            self.dashboard.attendance_rate,
            self.recorded_days,
        ));

        if self.rows.is_empty() {
            md.push_str("_No students in this course._\n");
            return md;
        }

        md.push_str("| ID | Name | Course | Present | Absent | Attendance | Status |\n");
        md.push_str("|----|------|--------|---------|--------|------------|--------|\n");
        for r in &self.rows {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {}% | {} |\n",
                escape_cell(&r.student.id),
                escape_cell(&r.student.name),
                escape_cell(&r.student.course),
                r.present_days,
                r.absent_days,
                r.percentage,
                status_label(r),
            ));
        }

        md
    }
}

/// Escape `|` so a value cannot split a markdown table cell.
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}

/// Short status text for a report row.
pub fn status_label(row: &StudentReport) -> String {
    if row.streak_warning {
        format!("{} consecutive absences", row.consecutive_absences)
    } else {
        match row.standing {
            Standing::Good => "Good".to_string(),
            Standing::AtRisk => "At risk".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::error::StorageError;
    use crate::model::AttendanceStatus;
    use crate::traits::Persistence;

    #[derive(Default)]
    struct ScratchStore(Mutex<HashMap<String, String>>);

    impl Persistence for ScratchStore {
        fn name(&self) -> &str {
            "scratch"
        }

        fn load(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            Ok(self.0.lock().unwrap().get(key).cloned())
        }

        fn save(&self, key: &str, blob: &str) -> std::result::Result<(), StorageError> {
            self.0.lock().unwrap().insert(key.into(), blob.into());
            Ok(())
        }
    }

    fn make_tracker() -> Tracker {
        let mut tracker = Tracker::open(Box::<ScratchStore>::default()).unwrap();
        for (d, status) in [
            ("01/01/2025", AttendanceStatus::Present),
            ("02/01/2025", AttendanceStatus::Absent),
            ("03/01/2025", AttendanceStatus::Absent),
        ] {
            tracker.set_status(d.parse().unwrap(), "101", status).unwrap();
        }
        tracker
            .set_status("03/01/2025".parse().unwrap(), "102", AttendanceStatus::Present)
            .unwrap();
        tracker
    }

    #[test]
    fn generate_filters_rows() {
        let tracker = make_tracker();
        let date = "03/01/2025".parse().unwrap();
        let report = AttendanceReport::generate(&tracker, date, &CourseFilter::from("BCA"));
        assert_eq!(report.course_filter, "BCA");
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].percentage, 33);
        assert_eq!(report.recorded_days, 3);
        assert_eq!(report.dashboard.present_today, 1);
        assert_eq!(report.dashboard.total_students, 3);
    }

    #[test]
    fn flagged_rows() {
        let tracker = make_tracker();
        let report =
            AttendanceReport::generate(&tracker, "03/01/2025".parse().unwrap(), &CourseFilter::All);
        let flagged: Vec<&str> = report.flagged().map(|r| r.student.id.as_str()).collect();
        // 101 is at 33%, 103 has no records; 102 is always present.
        assert_eq!(flagged, vec!["101", "103"]);
    }

    #[test]
    fn json_roundtrip() {
        let tracker = make_tracker();
        let report =
            AttendanceReport::generate(&tracker, "03/01/2025".parse().unwrap(), &CourseFilter::All);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = AttendanceReport::load_json(&path).unwrap();

        assert_eq!(loaded.rows, report.rows);
        assert_eq!(loaded.dashboard, report.dashboard);
    }

    #[test]
    fn markdown_output() {
        let tracker = make_tracker();
        let report =
            AttendanceReport::generate(&tracker, "03/01/2025".parse().unwrap(), &CourseFilter::All);
        let md = report.to_markdown();
        assert!(md.contains("| 101 | Alok Sharma | BCA | 1 | 2 | 33% | At risk |"));
        assert!(md.contains("| 102 | Bhavna Kumari | B.Com | 1 | 0 | 100% | Good |"));
    }

    #[test]
    fn markdown_escapes_pipes() {
        let mut tracker = make_tracker();
        tracker.add_student("104", "Dev | Ops", "B|Sc").unwrap();
        let report =
            AttendanceReport::generate(&tracker, "03/01/2025".parse().unwrap(), &CourseFilter::All);
        let md = report.to_markdown();
        assert!(md.contains(r"| 104 | Dev \| Ops | B\|Sc | 0 | 0 | 0% | At risk |"));
    }

    #[test]
    fn markdown_for_empty_course() {
        let tracker = make_tracker();
        let report = AttendanceReport::generate(
            &tracker,
            "03/01/2025".parse().unwrap(),
            &CourseFilter::from("MBA"),
        );
        assert!(report.to_markdown().contains("No students"));
    }
}

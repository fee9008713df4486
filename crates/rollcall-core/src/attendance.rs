//! Per-day attendance records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{AttendanceDate, AttendanceStatus};

/// Statuses recorded on one day, keyed by student id.
pub type DayRecord = BTreeMap<String, AttendanceStatus>;

/// Attendance statuses by date, then by student id.
///
/// A date appears only once something has been recorded for it. Nothing is
/// ever removed, and ids are not checked against the roster, so history for
/// deleted students survives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceLog {
    days: BTreeMap<AttendanceDate, DayRecord>,
}

impl AttendanceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a status, creating the day entry if needed.
    pub fn set_status(&mut self, date: AttendanceDate, student_id: &str, status: AttendanceStatus) {
        self.days
            .entry(date)
            .or_default()
            .insert(student_id.to_string(), status);
    }

    /// The recorded status, or `None` when nothing was recorded.
    pub fn get_status(&self, date: AttendanceDate, student_id: &str) -> Option<AttendanceStatus> {
        self.days.get(&date)?.get(student_id).copied()
    }

    /// Status as shown on the daily sheet: unset reads as absent.
    pub fn display_status(&self, date: AttendanceDate, student_id: &str) -> AttendanceStatus {
        self.get_status(date, student_id).unwrap_or(AttendanceStatus::Absent)
    }

    /// Record the same status for every id. Returns how many ids were written.
    ///
    /// An empty id list leaves the log untouched.
    pub fn bulk_set_status<'a>(
        &mut self,
        date: AttendanceDate,
        student_ids: impl IntoIterator<Item = &'a str>,
        status: AttendanceStatus,
    ) -> usize {
        let mut written = 0;
        for id in student_ids {
            self.set_status(date, id, status);
            written += 1;
        }
        written
    }

    /// Every recorded date, newest first.
    pub fn dates_descending(&self) -> impl Iterator<Item = AttendanceDate> + '_ {
        self.days.keys().rev().copied()
    }

    pub fn day(&self, date: AttendanceDate) -> Option<&DayRecord> {
        self.days.get(&date)
    }

    /// Every day with its records, newest first.
    pub fn days_descending(&self) -> impl Iterator<Item = (AttendanceDate, &DayRecord)> {
        self.days.iter().rev().map(|(date, day)| (*date, day))
    }

    pub fn most_recent_date(&self) -> Option<AttendanceDate> {
        self.days.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> AttendanceDate {
        s.parse().unwrap()
    }

    #[test]
    fn set_and_get_status() {
        let mut log = AttendanceLog::new();
        log.set_status(date("01/01/2025"), "101", AttendanceStatus::Present);
        assert_eq!(
            log.get_status(date("01/01/2025"), "101"),
            Some(AttendanceStatus::Present)
        );
        log.set_status(date("01/01/2025"), "101", AttendanceStatus::Absent);
        assert_eq!(
            log.get_status(date("01/01/2025"), "101"),
            Some(AttendanceStatus::Absent)
        );
    }

    #[test]
    fn missing_record_is_unset_not_absent() {
        let mut log = AttendanceLog::new();
        log.set_status(date("01/01/2025"), "101", AttendanceStatus::Present);
        assert_eq!(log.get_status(date("01/01/2025"), "102"), None);
        assert_eq!(log.get_status(date("02/01/2025"), "101"), None);
        assert_eq!(
            log.display_status(date("01/01/2025"), "102"),
            AttendanceStatus::Absent
        );
        // Display lookups never write.
        assert!(log.day(date("01/01/2025")).unwrap().get("102").is_none());
    }

    #[test]
    fn lookups_do_not_create_days() {
        let log = AttendanceLog::new();
        assert_eq!(log.get_status(date("01/01/2025"), "101"), None);
        assert!(log.is_empty());
    }

    #[test]
    fn status_for_unknown_student_is_accepted() {
        let mut log = AttendanceLog::new();
        log.set_status(date("01/01/2025"), "ghost", AttendanceStatus::Present);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn bulk_set_writes_every_id() {
        let mut log = AttendanceLog::new();
        let written = log.bulk_set_status(
            date("03/02/2025"),
            ["101", "102", "103"],
            AttendanceStatus::Present,
        );
        assert_eq!(written, 3);
        assert_eq!(log.day(date("03/02/2025")).unwrap().len(), 3);

        assert_eq!(
            log.bulk_set_status(date("04/02/2025"), [], AttendanceStatus::Absent),
            0
        );
        assert!(log.day(date("04/02/2025")).is_none());
    }

    #[test]
    fn dates_descending_uses_calendar_order() {
        let mut log = AttendanceLog::new();
        for d in ["02/01/2025", "31/12/2024", "15/01/2025", "01/02/2024"] {
            log.set_status(date(d), "101", AttendanceStatus::Present);
        }
        let dates: Vec<String> = log.dates_descending().map(|d| d.to_string()).collect();
        assert_eq!(
            dates,
            vec!["15/01/2025", "02/01/2025", "31/12/2024", "01/02/2024"]
        );
        assert_eq!(log.most_recent_date(), Some(date("15/01/2025")));
    }

    #[test]
    fn serializes_as_date_keyed_map() {
        let mut log = AttendanceLog::new();
        log.set_status(date("01/01/2025"), "101", AttendanceStatus::Present);
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json, serde_json::json!({"01/01/2025": {"101": "present"}}));

        let back: AttendanceLog = serde_json::from_value(json).unwrap();
        assert_eq!(back, log);
    }
}

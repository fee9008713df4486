//! Whole-workflow tests of the tracker against the real storage backends.

use rollcall_core::report::AttendanceReport;
use rollcall_core::statistics::Standing;
use rollcall_core::traits::{ATTENDANCE_KEY, STUDENTS_KEY};
use rollcall_core::{AttendanceDate, AttendanceError, AttendanceStatus, CourseFilter, Tracker};
use rollcall_storage::{create_store, JsonFileStore, MemoryStore, RollcallConfig, StoreConfig};

fn date(s: &str) -> AttendanceDate {
    s.parse().unwrap()
}

fn open(store: &MemoryStore) -> Tracker {
    Tracker::open(Box::new(store.clone())).unwrap()
}

#[test]
fn term_of_attendance() {
    let store = MemoryStore::new();
    let mut tracker = open(&store);
    tracker.add_student("104", "Divya Rao", "BCA").unwrap();

    let days = ["03/02/2025", "04/02/2025", "05/02/2025", "06/02/2025", "07/02/2025"];
    for day in days {
        tracker
            .bulk_set_status(date(day), &CourseFilter::All, AttendanceStatus::Present)
            .unwrap();
    }
    // Divya misses the last three days.
    for day in &days[2..] {
        tracker
            .set_status(date(day), "104", AttendanceStatus::Absent)
            .unwrap();
    }

    let stats = tracker.stats();
    assert_eq!(stats.consecutive_absences("104"), 3);
    assert_eq!(stats.consecutive_absences("101"), 0);
    assert_eq!(stats.today_present_count(date("07/02/2025")), 3);
    assert_eq!(stats.attendance_rate(date("07/02/2025")), 75);

    let bca = tracker.roster().filter_by_course(&CourseFilter::from("BCA"));
    assert_eq!(
        stats.absence_alert(bca).as_deref(),
        Some("Divya Rao has been absent for 3 consecutive days.")
    );

    let report = AttendanceReport::generate(&tracker, date("07/02/2025"), &CourseFilter::All);
    let divya = report.rows.iter().find(|r| r.student.id == "104").unwrap();
    assert_eq!((divya.present_days, divya.absent_days), (2, 3));
    assert_eq!(divya.percentage, 40);
    assert_eq!(divya.standing, Standing::AtRisk);
    assert!(divya.streak_warning);
    assert_eq!(report.flagged().count(), 1);

    // One seed save, one add, five bulk marks, three single marks.
    assert_eq!(store.save_count(), 10);
}

#[test]
fn history_of_removed_student_is_kept() {
    let store = MemoryStore::new();
    let mut tracker = open(&store);
    tracker
        .set_status(date("01/04/2025"), "103", AttendanceStatus::Present)
        .unwrap();
    tracker.remove_student("103").unwrap();

    let tracker = open(&store);
    assert!(!tracker.roster().contains("103"));
    assert_eq!(
        tracker.log().get_status(date("01/04/2025"), "103"),
        Some(AttendanceStatus::Present)
    );
    // The removed student no longer counts towards today's numbers.
    assert_eq!(tracker.stats().today_present_count(date("01/04/2025")), 0);
}

#[test]
fn failed_save_is_reported_and_recovered() {
    let store = MemoryStore::new();
    let mut tracker = open(&store);
    store.set_fail_saves(true);

    let err = tracker.add_student("104", "Divya Rao", "BCA").unwrap_err();
    assert!(matches!(err, AttendanceError::Persistence { ref key, .. } if key == STUDENTS_KEY));
    assert!(tracker.roster().contains("104"));
    assert!(!store.blob(STUDENTS_KEY).unwrap().contains("Divya"));

    store.set_fail_saves(false);
    tracker.save_all().unwrap();
    assert!(store.blob(STUDENTS_KEY).unwrap().contains("Divya"));
    assert_eq!(store.blob(ATTENDANCE_KEY).as_deref(), Some("{}"));
}

#[test]
fn file_store_round_trips_between_sessions() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = JsonFileStore::new(dir.path()).unwrap();
        let mut tracker = Tracker::open(Box::new(store)).unwrap();
        tracker
            .set_status(date("09/09/2025"), "102", AttendanceStatus::Absent)
            .unwrap();
        let mut draft = tracker.begin_edit("102").unwrap();
        draft.name = "Bhavna K.".into();
        tracker.commit_edit(draft).unwrap();
    }

    let store = create_store(&StoreConfig::File {
        data_dir: dir.path().to_path_buf(),
    })
    .unwrap();
    let tracker = Tracker::open(store).unwrap();
    assert_eq!(tracker.roster().find_by_id("102").unwrap().name, "Bhavna K.");
    assert_eq!(
        tracker.log().display_status(date("09/09/2025"), "102"),
        AttendanceStatus::Absent
    );
    assert_eq!(
        tracker.log().display_status(date("09/09/2025"), "101"),
        AttendanceStatus::Absent
    );
    assert_eq!(tracker.log().get_status(date("09/09/2025"), "101"), None);
}

#[test]
fn configured_thresholds_reach_the_engine() {
    let config = RollcallConfig {
        streak_threshold: 2,
        good_attendance_percent: 50,
        ..RollcallConfig::default()
    };
    let store = MemoryStore::new();
    let mut tracker = open(&store).with_statistics_config(config.statistics());
    for day in ["01/05/2025", "02/05/2025"] {
        tracker
            .set_status(date(day), "101", AttendanceStatus::Absent)
            .unwrap();
    }
    tracker
        .set_status(date("01/05/2025"), "102", AttendanceStatus::Present)
        .unwrap();
    tracker
        .set_status(date("02/05/2025"), "102", AttendanceStatus::Absent)
        .unwrap();

    let stats = tracker.stats();
    let alok = stats.student_report(tracker.roster().find_by_id("101").unwrap());
    assert!(alok.streak_warning);
    let bhavna = stats.student_report(tracker.roster().find_by_id("102").unwrap());
    assert_eq!(bhavna.percentage, 50);
    assert_eq!(bhavna.standing, Standing::Good);
}

#[test]
fn read_only_store_still_opens_with_seed() {
    let store = MemoryStore::new();
    store.set_fail_saves(true);

    let mut tracker = open(&store);
    assert_eq!(tracker.roster().len(), 3);
    assert_eq!(store.save_count(), 0);

    // Mutations still report the failure but keep the change.
    let err = tracker
        .set_status(date("02/06/2025"), "101", AttendanceStatus::Present)
        .unwrap_err();
    assert!(matches!(err, AttendanceError::Persistence { ref key, .. } if key == ATTENDANCE_KEY));
    assert_eq!(tracker.stats().today_present_count(date("02/06/2025")), 1);

    store.set_fail_saves(false);
    tracker.save_all().unwrap();
    assert!(store.blob(STUDENTS_KEY).unwrap().contains("Alok Sharma"));
}

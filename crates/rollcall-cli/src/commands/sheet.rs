//! The `rollcall sheet` command.

use anyhow::Result;
use comfy_table::{Cell, Color, Table};

use rollcall_core::AttendanceStatus;

use super::{resolve_course, resolve_date, Session};

pub fn execute(session: &Session, course: Option<String>, date: Option<String>) -> Result<()> {
    let date = resolve_date(date)?;
    let (tracker, config) = session.open()?;
    let filter = resolve_course(course, &config);
    let sheet = tracker.stats().attendance_sheet(date, &filter);

    println!("Attendance for {} ({})", sheet.date, sheet.course_filter);
    if sheet.rows.is_empty() {
        println!("No students in course '{}'.", sheet.course_filter);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Course", "Status", "Absence streak"]);
    for row in &sheet.rows {
        let status = match (row.status, row.recorded) {
            (AttendanceStatus::Present, _) => Cell::new("present").fg(Color::Green),
            (AttendanceStatus::Absent, true) => Cell::new("absent").fg(Color::Red),
            (AttendanceStatus::Absent, false) => Cell::new("absent (unmarked)"),
        };
        let streak = if row.streak_warning {
            Cell::new(format!("{} days", row.consecutive_absences)).fg(Color::Red)
        } else {
            Cell::new(row.consecutive_absences)
        };
        table.add_row(vec![
            Cell::new(&row.student.id),
            Cell::new(&row.student.name),
            Cell::new(&row.student.course),
            status,
            streak,
        ]);
    }
    println!("{table}");

    if let Some(alert) = &sheet.alert {
        println!("{alert}");
    }
    Ok(())
}

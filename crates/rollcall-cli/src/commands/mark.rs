//! The `rollcall mark` and `rollcall mark-all` commands.

use anyhow::Result;

use rollcall_core::AttendanceError;

use super::{parse_status, resolve_course, resolve_date, Session};

pub fn one(session: &Session, id: &str, status: &str, date: Option<String>) -> Result<()> {
    let status = parse_status(status)?;
    let date = resolve_date(date)?;
    let (mut tracker, _) = session.open()?;

    let Some(student) = tracker.roster().find_by_id(id).cloned() else {
        return Err(AttendanceError::NotFound(id.to_string()).into());
    };
    tracker.set_status(date, id, status)?;

    println!("Marked {} ({id}) {status} on {date}", student.name);
    if let Some(alert) = tracker.stats().absence_alert([&student]) {
        println!("{alert}");
    }
    Ok(())
}

pub fn all(
    session: &Session,
    status: &str,
    course: Option<String>,
    date: Option<String>,
) -> Result<()> {
    let status = parse_status(status)?;
    let date = resolve_date(date)?;
    let (mut tracker, config) = session.open()?;
    let filter = resolve_course(course, &config);

    let marked = tracker.bulk_set_status(date, &filter, status)?;
    if marked == 0 {
        println!("No students in course '{filter}', nothing marked");
    } else {
        println!("Marked {marked} student(s) in '{filter}' {status} on {date}");
    }
    Ok(())
}

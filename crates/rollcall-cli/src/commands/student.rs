//! The `rollcall student` commands.

use anyhow::{bail, Result};
use comfy_table::{Cell, Table};

use super::{resolve_course, Session};

pub fn list(session: &Session, course: Option<String>) -> Result<()> {
    let (tracker, config) = session.open()?;
    let filter = resolve_course(course, &config);
    let students = tracker.roster().filter_by_course(&filter);

    if students.is_empty() {
        println!("No students in course '{filter}'.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["", "ID", "Name", "Course"]);
    for s in &students {
        table.add_row(vec![
            Cell::new(s.initial().map(String::from).unwrap_or_default()),
            Cell::new(&s.id),
            Cell::new(&s.name),
            Cell::new(&s.course),
        ]);
    }
    println!("{table}");
    println!(
        "{} student(s); courses: {}",
        students.len(),
        tracker.roster().courses().join(", ")
    );
    Ok(())
}

pub fn add(session: &Session, id: &str, name: &str, course: &str) -> Result<()> {
    require_non_empty(id, name, course)?;
    let (mut tracker, _) = session.open()?;
    tracker.add_student(id, name, course)?;
    println!("Added {name} ({id}) to {course}");
    Ok(())
}

pub fn remove(session: &Session, id: &str) -> Result<()> {
    let (mut tracker, _) = session.open()?;
    match tracker.remove_student(id)? {
        Some(student) => println!("Removed {} ({}); attendance history kept", student.name, student.id),
        None => println!("No student with ID {id}, nothing removed"),
    }
    Ok(())
}

pub fn edit(
    session: &Session,
    id: &str,
    new_id: Option<String>,
    name: Option<String>,
    course: Option<String>,
) -> Result<()> {
    let (mut tracker, _) = session.open()?;
    let mut draft = tracker.begin_edit(id)?;
    if let Some(new_id) = new_id {
        draft.id = new_id;
    }
    if let Some(name) = name {
        draft.name = name;
    }
    if let Some(course) = course {
        draft.course = course;
    }
    require_non_empty(&draft.id, &draft.name, &draft.course)?;

    let summary = format!("{} ({}, {})", draft.name, draft.id, draft.course);
    tracker.commit_edit(draft)?;
    println!("Updated {id}: {summary}");
    Ok(())
}

fn require_non_empty(id: &str, name: &str, course: &str) -> Result<()> {
    for (field, value) in [("ID", id), ("name", name), ("course", course)] {
        if value.trim().is_empty() {
            bail!("student {field} must not be empty");
        }
    }
    Ok(())
}

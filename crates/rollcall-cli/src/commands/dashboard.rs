//! The `rollcall dashboard` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::{resolve_date, Session};

pub fn execute(session: &Session, date: Option<String>) -> Result<()> {
    let date = resolve_date(date)?;
    let (tracker, _) = session.open()?;
    let summary = tracker.stats().dashboard(date);

    let mut table = Table::new();
    table.set_header(vec!["Date", "Total students", "Present", "Attendance rate"]);
    table.add_row(vec![
        Cell::new(summary.date),
        Cell::new(summary.total_students),
        Cell::new(summary.present_today),
        Cell::new(format!("{}%", summary.attendance_rate)),
    ]);
    println!("{table}");
    Ok(())
}

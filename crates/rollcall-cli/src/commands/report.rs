//! The `rollcall report` command.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use comfy_table::{Cell, Color, Table};

use rollcall_core::report::{status_label, AttendanceReport};
use rollcall_core::statistics::Standing;
use rollcall_core::AttendanceDate;
use rollcall_report::html::{generate_html, write_html_report};

use super::{resolve_course, Session};

pub fn execute(
    session: &Session,
    course: Option<String>,
    format: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    if !matches!(format, "text" | "json" | "markdown" | "html") {
        bail!("unknown format '{format}', expected one of: text, json, markdown, html");
    }

    let (tracker, config) = session.open()?;
    let filter = resolve_course(course, &config);
    let report = AttendanceReport::generate(&tracker, AttendanceDate::today(), &filter);
    tracing::info!(course = %filter, rows = report.rows.len(), format, "report generated");

    match (format, output) {
        ("json", Some(path)) => {
            report.save_json(&path)?;
            println!("Report written to {}", path.display());
        }
        ("html", Some(path)) => {
            write_html_report(&report, &path)?;
            println!("Report written to {}", path.display());
        }
        (_, Some(path)) => {
            std::fs::write(&path, render(&report, format)?)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        (_, None) => println!("{}", render(&report, format)?),
    }
    Ok(())
}

fn render(report: &AttendanceReport, format: &str) -> Result<String> {
    Ok(match format {
        "json" => serde_json::to_string_pretty(report)?,
        "markdown" => report.to_markdown(),
        "html" => generate_html(report),
        _ => render_text(report),
    })
}

fn render_text(report: &AttendanceReport) -> String {
    let mut out = format!(
        "Attendance report for '{}': {} recorded day(s)\n",
        report.course_filter, report.recorded_days
    );
    if report.rows.is_empty() {
        out.push_str("No students in this course.");
        return out;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID",
        "Name",
        "Course",
        "Present",
        "Absent",
        "Attendance",
        "Status",
    ]);
    for r in &report.rows {
        let color = if r.streak_warning {
            Color::Red
        } else if r.standing == Standing::AtRisk {
            Color::Yellow
        } else {
            Color::Green
        };
        table.add_row(vec![
            Cell::new(&r.student.id),
            Cell::new(&r.student.name),
            Cell::new(&r.student.course),
            Cell::new(r.present_days),
            Cell::new(r.absent_days),
            Cell::new(format!("{}%", r.percentage)),
            Cell::new(status_label(r)).fg(color),
        ]);
    }
    out.push_str(&table.to_string());

    let flagged = report.flagged().count();
    if flagged > 0 {
        out.push_str(&format!("\n{flagged} student(s) need attention"));
    }
    out
}

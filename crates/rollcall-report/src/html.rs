//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use rollcall_core::report::{status_label, AttendanceReport};
use rollcall_core::statistics::{Standing, StudentReport};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn row_class(row: &StudentReport) -> &'static str {
    if row.streak_warning {
        "streak"
    } else {
        match row.standing {
            Standing::Good => "good",
            Standing::AtRisk => "at-risk",
        }
    }
}

/// Generate an HTML page from an attendance report.
pub fn generate_html(report: &AttendanceReport) -> String {
    let mut html = String::new();
    let dash = &report.dashboard;

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>rollcall report: {}</title>\n",
        html_escape(&report.course_filter)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str("<h1>Attendance report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Course: <strong>{}</strong> | {} recorded days | generated {}</p>\n",
        html_escape(&report.course_filter),
        report.recorded_days,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    html.push_str("<section class=\"dashboard\">\n");
    html.push_str(&format!("<h2>Today ({})</h2>\n", dash.date));
    html.push_str("<div class=\"cards\">\n");
    for (label, value) in [
        ("Total students", dash.total_students.to_string()),
        ("Present today", dash.present_today.to_string()),
        ("Attendance rate", format!("{}%", dash.attendance_rate)),
    ] {
        html.push_str(&format!(
            "<div class=\"card\"><span class=\"label\">{label}</span><span class=\"value\">{value}</span></div>\n"
        ));
    }
    html.push_str("</div>\n");
    if !report.rows.is_empty() {
        html.push_str(&generate_bar_chart(&report.rows));
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Students</h2>\n");
    if report.rows.is_empty() {
        html.push_str("<p class=\"empty\">No students in this course.</p>\n");
    } else {
        html.push_str("<table class=\"results-table\" id=\"results\">\n");
        html.push_str("<thead><tr><th onclick=\"sortTable(0)\">ID</th><th onclick=\"sortTable(1)\">Name</th><th onclick=\"sortTable(2)\">Course</th><th onclick=\"sortTable(3)\">Present</th><th onclick=\"sortTable(4)\">Absent</th><th onclick=\"sortTable(5)\">Attendance</th><th onclick=\"sortTable(6)\">Status</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for r in &report.rows {
            html.push_str(&format!(
                "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}%</td><td>{}</td></tr>\n",
                row_class(r),
                html_escape(&r.student.id),
                html_escape(&r.student.name),
                html_escape(&r.student.course),
                r.present_days,
                r.absent_days,
                r.percentage,
                html_escape(&status_label(r)),
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &AttendanceReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn generate_bar_chart(rows: &[StudentReport]) -> String {
    let bar_height = 24;
    let max_width = 400;
    let padding = 8;
    let label_width = 200;

    let total_height = rows.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, row) in rows.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = row.percentage as usize * max_width / 100;

        let color = match (row.streak_warning, row.standing) {
            (true, _) => "#ef4444",
            (false, Standing::AtRisk) => "#eab308",
            (false, Standing::Good) => "#22c55e",
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&row.student.name)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            row.percentage
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --good: #dcfce7; --risk: #fef9c3; --streak: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --good: #064e3b; --risk: #713f12; --streak: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta, .empty { color: #6b7280; }
.cards { display: flex; gap: 1rem; }
.card { border: 1px solid var(--border); border-radius: 8px; padding: 1rem 1.5rem; display: flex; flex-direction: column; }
.card .value { font-size: 1.75rem; font-weight: bold; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.good { background: var(--good); }
.at-risk { background: var(--risk); }
.streak { background: var(--streak); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const cmp = va.localeCompare(vb, undefined, { numeric: true });
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

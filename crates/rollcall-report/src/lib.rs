//! rollcall-report: Renders attendance reports for people rather than programs.

pub mod html;

pub use html::{generate_html, write_html_report};

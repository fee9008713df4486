pub mod dashboard;
pub mod init;
pub mod mark;
pub mod report;
pub mod sheet;
pub mod student;

use std::path::PathBuf;

use anyhow::{Context, Result};

use rollcall_core::{AttendanceDate, AttendanceStatus, CourseFilter, Tracker};
use rollcall_storage::{create_store, load_config_from, RollcallConfig};

/// Global flags shared by every command that touches stored data.
pub struct Session {
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
}

impl Session {
    pub fn new(config_path: Option<PathBuf>, data_dir: Option<PathBuf>) -> Self {
        Self {
            config_path,
            data_dir,
        }
    }

    /// Load the config, with `--data-dir` taking precedence over it.
    pub fn config(&self) -> Result<RollcallConfig> {
        let config = load_config_from(self.config_path.as_deref())?;
        Ok(match &self.data_dir {
            Some(dir) => config.with_data_dir(dir),
            None => config,
        })
    }

    /// Open the tracker against the configured store.
    pub fn open(&self) -> Result<(Tracker, RollcallConfig)> {
        let config = self.config()?;
        let store = create_store(&config.store)?;
        let tracker = Tracker::open(store)
            .context("failed to load attendance data")?
            .with_statistics_config(config.statistics());
        Ok((tracker, config))
    }
}

/// The date given on the command line, or today.
pub fn resolve_date(date: Option<String>) -> Result<AttendanceDate> {
    match date {
        Some(d) => Ok(d.parse()?),
        None => Ok(AttendanceDate::today()),
    }
}

/// The course given on the command line, or the configured default.
pub fn resolve_course(course: Option<String>, config: &RollcallConfig) -> CourseFilter {
    CourseFilter::from(course.as_deref().unwrap_or(&config.default_course))
}

pub fn parse_status(status: &str) -> Result<AttendanceStatus> {
    status.parse().map_err(anyhow::Error::msg)
}

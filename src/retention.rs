//! Deleting old log files.
//!
//! Files are matched by name only: `<stem>_YYYYMMDD...`. A file whose name
//! does not carry a valid date right after the stem is never deleted.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Local, NaiveDate};
use tracing::debug;

use crate::error::LogError;

/// Outcome of one sweep.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub deleted: Vec<PathBuf>,
    pub errors: Vec<LogError>,
}

/// Parses the 8-digit date that follows `<stem>_` in `file_name`.
pub fn parse_stamp_date(file_name: &str, stem: &str) -> Option<NaiveDate> {
    let rest = file_name.strip_prefix(stem)?.strip_prefix('_')?;
    let digits = rest.get(..8)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = digits[..4].parse().ok()?;
    let month = digits[4..6].parse().ok()?;
    let day = digits[6..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Whether a file dated `date` is older than `keep_days` days at `now`,
/// measured from local midnight of that date.
pub fn is_expired(date: NaiveDate, keep_days: u32, now: &DateTime<Local>) -> bool {
    let Some(midnight) = date.and_hms_opt(0, 0, 0) else {
        return false;
    };
    now.naive_local() - midnight > Duration::days(i64::from(keep_days))
}

/// Deletes regular files in `dir` named `<stem>_<date>...` whose date is more
/// than `keep_days` days before `now`.
pub fn sweep(dir: &Path, stem: &str, keep_days: u32, now: &DateTime<Local>) -> SweepReport {
    let mut report = SweepReport::default();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) => {
            report.errors.push(LogError::ListDir {
                path: dir.to_path_buf(),
                source,
            });
            return report;
        }
    };

    let prefix = format!("{stem}_");
    for entry in entries.flatten() {
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !name.starts_with(&prefix) {
            continue;
        }
        let Some(date) = parse_stamp_date(name, stem) else {
            continue;
        };
        if !is_expired(date, keep_days, now) {
            continue;
        }
        let path = entry.path();
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "deleted expired log file");
                report.deleted.push(path);
            }
            Err(source) => report.errors.push(LogError::Delete { path, source }),
        }
    }
    report
}

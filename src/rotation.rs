//! Rolling file output.
//!
//! The rotation manager owns the single open output file of a logger and
//! decides when to move to another one:
//!
//! * **size rolls**: a line that would push the file past `max_bytes` goes to
//!   the next roll index, and a file that reaches `max_bytes` is rolled right
//!   after the write that filled it;
//! * **wrap**: after `max_rolls` files the index returns to 1 and that file is
//!   truncated, so disk usage stays bounded;
//! * **day rollover**: a new calendar day starts a fresh dated sequence;
//! * **self-healing**: every `heal_interval` writes the open handle is
//!   compared with the file at its path, and reopened if the file was removed
//!   or replaced.
//!
//! Files are named `<prefix>_<stamp>_<index>.log`.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, trace};

use crate::discovery;
use crate::error::LogError;
use crate::file_sink::{self, FileSink, SinkKind};

pub const DEFAULT_MAX_ROLLS: u32 = 5;
pub const DEFAULT_MAX_BYTES: u64 = 100 * 1024 * 1024;
/// A removed or replaced file absorbs at most `DEFAULT_HEAL_INTERVAL - 1`
/// lines before the writer notices and reopens it.
pub const DEFAULT_HEAL_INTERVAL: u64 = 100;

/// Layout of the start timestamp embedded in file names.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum StampFormat {
    /// `YYYYMMDD`
    #[default]
    Day,
    /// `YYYYMMDDHHMM`
    Minute,
}

impl StampFormat {
    pub fn render(self, now: &DateTime<Local>) -> String {
        match self {
            StampFormat::Day => now.format("%Y%m%d").to_string(),
            StampFormat::Minute => now.format("%Y%m%d%H%M").to_string(),
        }
    }
}

/// Construction-time settings of a rotation manager.
#[derive(Clone, Debug)]
pub struct RotationSettings {
    /// Path prefix of the log files; `None` uses the discovered process name.
    pub prefix: Option<PathBuf>,
    pub max_rolls: u32,
    pub max_bytes: u64,
    pub stamp_format: StampFormat,
    pub sink_kind: SinkKind,
    /// Writes between identity checks; 0 disables self-healing.
    pub heal_interval: u64,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            prefix: None,
            max_rolls: DEFAULT_MAX_ROLLS,
            max_bytes: DEFAULT_MAX_BYTES,
            stamp_format: StampFormat::default(),
            sink_kind: SinkKind::default(),
            heal_interval: DEFAULT_HEAL_INTERVAL,
        }
    }
}

/// Bookkeeping of the current roll sequence.
#[derive(Clone, Debug)]
pub struct RotationState {
    pub prefix: Option<PathBuf>,
    pub stamp: String,
    pub stamp_format: StampFormat,
    /// 0 until the first file of the sequence is opened, then 1..=max_rolls.
    pub roll_index: u32,
    /// Set once the index has wrapped; later rolls truncate.
    pub is_roll: bool,
    /// On-disk length of the open file, re-read on every open.
    pub current_size: u64,
    pub max_rolls: u32,
    pub max_bytes: u64,
    pub current_path: Option<PathBuf>,
    /// Writes since the last identity check.
    pub heal_counter: u64,
    /// Whether the sequence has opened its first file.
    pub initialized: bool,
}

pub struct RotationManager {
    state: RotationState,
    sink: Option<Box<dyn FileSink>>,
    sink_kind: SinkKind,
    heal_interval: u64,
    heals: u64,
    /// A wrapped file still has to be truncated because its open failed.
    truncate_pending: bool,
    logger_name: String,
}

impl RotationManager {
    /// Creates a manager for `logger_name`. No file-system access happens
    /// until the first write.
    pub fn new(logger_name: &str, settings: RotationSettings) -> Self {
        Self {
            state: RotationState {
                prefix: settings.prefix,
                stamp: settings.stamp_format.render(&Local::now()),
                stamp_format: settings.stamp_format,
                roll_index: 0,
                is_roll: false,
                current_size: 0,
                max_rolls: settings.max_rolls.max(1),
                max_bytes: settings.max_bytes.max(1),
                current_path: None,
                heal_counter: 0,
                initialized: false,
            },
            sink: None,
            sink_kind: settings.sink_kind,
            heal_interval: settings.heal_interval,
            heals: 0,
            truncate_pending: false,
            logger_name: logger_name.to_string(),
        }
    }

    pub fn state(&self) -> &RotationState {
        &self.state
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.state.current_path.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.sink.is_some()
    }

    /// Number of times a removed or replaced file was reopened.
    pub fn heal_count(&self) -> u64 {
        self.heals
    }

    /// The configured prefix, or the discovered default if none was set.
    pub fn prefix(&self) -> PathBuf {
        match &self.state.prefix {
            Some(prefix) => prefix.clone(),
            None => discovery::default_prefix(&self.logger_name),
        }
    }

    pub fn set_stamp_format(&mut self, format: StampFormat) {
        self.state.stamp_format = format;
    }

    pub fn set_heal_interval(&mut self, interval: u64) {
        self.heal_interval = interval;
        self.state.heal_counter = 0;
    }

    /// Takes effect the next time a file is opened.
    pub fn set_sink_kind(&mut self, kind: SinkKind) {
        self.sink_kind = kind;
    }

    /// Starts a new roll sequence under `prefix`.
    ///
    /// The previous file is closed, but no directory is created and no file is
    /// opened here; that waits for the next write. `max_rolls` below 1 and
    /// `max_bytes` of 0 are raised to 1.
    pub fn set_log_file(
        &mut self,
        prefix: PathBuf,
        max_rolls: u32,
        max_bytes: u64,
        now: &DateTime<Local>,
    ) -> Result<(), LogError> {
        let closed = self.close();
        self.state.prefix = Some(prefix);
        self.state.max_rolls = max_rolls.max(1);
        self.state.max_bytes = max_bytes.max(1);
        self.reset_sequence(now);
        closed
    }

    /// Closes the current file and starts a fresh dated sequence for the day
    /// of `now`. Content already written stays untouched.
    pub fn roll_over_day(&mut self, now: &DateTime<Local>) -> Result<(), LogError> {
        let closed = self.close();
        self.reset_sequence(now);
        debug!(logger = %self.logger_name, stamp = %self.state.stamp, "day rollover");
        closed
    }

    /// Makes sure a file is open, opening the first file of the sequence or
    /// reopening the current one after a failure.
    pub fn ensure_open(&mut self) -> Result<(), LogError> {
        if self.sink.is_some() {
            return Ok(());
        }
        if !self.state.initialized {
            self.state.initialized = true;
            self.roll()
        } else {
            self.open_current(self.truncate_pending).map_err(into_reopen)
        }
    }

    /// Appends `bytes` to the current file, rolling before and after as
    /// needed.
    ///
    /// On error the bytes of this call may be lost, the handle is closed, and
    /// the next call starts by reopening.
    pub fn write(&mut self, bytes: &[u8], auto_flush: bool) -> Result<(), LogError> {
        self.ensure_open()?;
        self.check_health()?;

        let len = bytes.len() as u64;
        if self.state.current_size > 0 && self.state.current_size + len > self.state.max_bytes {
            self.roll()?;
        }

        let path = self.state.current_path.clone().unwrap_or_default();
        let Some(sink) = self.sink.as_mut() else {
            return Err(LogError::Write {
                path,
                source: io::Error::new(io::ErrorKind::NotConnected, "log file is not open"),
            });
        };
        if let Err(source) = sink.write_all(bytes) {
            self.sink = None;
            return Err(LogError::Write { path, source });
        }
        if auto_flush {
            if let Err(source) = sink.flush() {
                self.sink = None;
                return Err(LogError::Flush { path, source });
            }
        }
        self.state.current_size += len;

        if self.state.current_size >= self.state.max_bytes {
            self.roll()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), LogError> {
        let Some(sink) = self.sink.as_mut() else {
            return Ok(());
        };
        if let Err(source) = sink.flush() {
            self.sink = None;
            let path = self.state.current_path.clone().unwrap_or_default();
            return Err(LogError::Flush { path, source });
        }
        Ok(())
    }

    fn roll(&mut self) -> Result<(), LogError> {
        let closed = self.close();
        self.state.roll_index += 1;
        if self.state.roll_index > self.state.max_rolls {
            self.state.is_roll = true;
            self.state.roll_index = 1;
            debug!(logger = %self.logger_name, "roll index wrapped");
        }
        self.truncate_pending = self.state.is_roll;
        let opened = self.open_current(self.truncate_pending);
        trace!(
            logger = %self.logger_name,
            index = self.state.roll_index,
            truncate = self.state.is_roll,
            "rolled log file"
        );
        closed.and(opened)
    }

    fn check_health(&mut self) -> Result<(), LogError> {
        if self.heal_interval == 0 {
            return Ok(());
        }
        self.state.heal_counter += 1;
        if self.state.heal_counter < self.heal_interval {
            return Ok(());
        }
        self.state.heal_counter = 0;

        let (Some(sink), Some(path)) = (self.sink.as_ref(), self.state.current_path.as_ref()) else {
            return Ok(());
        };
        match (sink.identity(), file_sink::path_identity(path)) {
            (Ok(held), Ok(on_disk)) if held == on_disk => return Ok(()),
            (_, Err(err)) if err.kind() != io::ErrorKind::NotFound => {
                return Err(LogError::Inspect {
                    path: path.clone(),
                    source: err,
                });
            }
            _ => {}
        }

        debug!(logger = %self.logger_name, path = %path.display(), "log file removed or replaced, reopening");
        // The old file is gone from its path; failing to flush into it loses
        // nothing that is still reachable.
        let _ = self.close();
        self.heals += 1;
        self.open_current(false).map_err(into_reopen)
    }

    fn open_current(&mut self, truncate: bool) -> Result<(), LogError> {
        let prefix = match &self.state.prefix {
            Some(prefix) => prefix.clone(),
            None => {
                let prefix = discovery::default_prefix(&self.logger_name);
                self.state.prefix = Some(prefix.clone());
                prefix
            }
        };
        let path = file_name(&prefix, &self.state.stamp, self.state.roll_index);
        self.state.current_path = Some(path.clone());

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| LogError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut sink = self
            .sink_kind
            .open(&path, truncate)
            .map_err(|source| LogError::Open {
                path: path.clone(),
                source,
            })?;
        let size = sink.seek_to_end().map_err(|source| LogError::Open {
            path: path.clone(),
            source,
        })?;

        self.state.current_size = size;
        self.state.heal_counter = 0;
        self.truncate_pending = false;
        self.sink = Some(sink);
        Ok(())
    }

    fn close(&mut self) -> Result<(), LogError> {
        let Some(mut sink) = self.sink.take() else {
            return Ok(());
        };
        sink.flush().map_err(|source| LogError::Flush {
            path: self.state.current_path.clone().unwrap_or_default(),
            source,
        })
    }

    fn reset_sequence(&mut self, now: &DateTime<Local>) {
        self.state.stamp = self.state.stamp_format.render(now);
        self.state.roll_index = 0;
        self.state.is_roll = false;
        self.state.current_size = 0;
        self.state.current_path = None;
        self.state.heal_counter = 0;
        self.state.initialized = false;
        self.truncate_pending = false;
    }
}

/// `<prefix>_<stamp>_<index>.log`
pub fn file_name(prefix: &Path, stamp: &str, index: u32) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(format!("_{stamp}_{index}.log"));
    PathBuf::from(name)
}

fn into_reopen(err: LogError) -> LogError {
    match err {
        LogError::Open { path, source } => LogError::Reopen { path, source },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn manager(prefix: PathBuf, max_rolls: u32, max_bytes: u64) -> RotationManager {
        RotationManager::new(
            "test",
            RotationSettings {
                prefix: Some(prefix),
                max_rolls,
                max_bytes,
                heal_interval: 0,
                ..RotationSettings::default()
            },
        )
    }

    fn path_of(m: &RotationManager, index: u32) -> PathBuf {
        file_name(&m.prefix(), &m.state().stamp, index)
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            file_name(Path::new("logs/app"), "20250617", 3),
            PathBuf::from("logs/app_20250617_3.log")
        );
    }

    #[test]
    fn test_stamp_formats() {
        use chrono::TimeZone;
        let t = Local.with_ymd_and_hms(2025, 6, 17, 9, 7, 0).unwrap();
        assert_eq!(StampFormat::Day.render(&t), "20250617");
        assert_eq!(StampFormat::Minute.render(&t), "202506170907");
    }

    #[test]
    fn test_construction_does_no_io() {
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("nested/deeper/app");
        let mut m = manager(prefix.clone(), 3, 100);
        m.set_log_file(prefix, 3, 100, &Local::now()).unwrap();
        assert!(!dir.path().join("nested").exists());
        assert!(!m.is_open());
    }

    #[test]
    fn test_first_write_creates_directories() {
        let dir = tempdir().unwrap();
        let mut m = manager(dir.path().join("nested/app"), 3, 100);
        m.write(b"hello\n", true).unwrap();
        let path = path_of(&m, 1);
        assert_eq!(m.current_path(), Some(path.as_path()));
        assert_eq!(std::fs::read(&path).unwrap(), b"hello\n");
    }

    #[test]
    fn test_exact_fit_does_not_roll_early() {
        let dir = tempdir().unwrap();
        let mut m = manager(dir.path().join("app"), 5, 10);
        m.write(b"1234", true).unwrap();
        // 6 == max_bytes - current_size
        m.write(b"56789\n", true).unwrap();
        assert_eq!(std::fs::read(path_of(&m, 1)).unwrap(), b"123456789\n");
        // The file is full, so the manager already moved on
        assert_eq!(m.state().roll_index, 2);
        assert_eq!(m.state().current_size, 0);
    }

    #[test]
    fn test_one_byte_over_rolls_first() {
        let dir = tempdir().unwrap();
        let mut m = manager(dir.path().join("app"), 5, 10);
        m.write(b"1234", true).unwrap();
        m.write(b"567890\n", true).unwrap();
        assert_eq!(std::fs::read(path_of(&m, 1)).unwrap(), b"1234");
        assert_eq!(std::fs::read(path_of(&m, 2)).unwrap(), b"567890\n");
        assert_eq!(m.state().roll_index, 2);
    }

    #[test]
    fn test_wrap_truncates_oldest_file() {
        let dir = tempdir().unwrap();
        let mut m = manager(dir.path().join("app"), 3, 10);
        for line in [b"line-0001\n", b"line-0002\n", b"line-0003\n"] {
            m.write(line, true).unwrap();
        }
        // Third write filled file 3 and wrapped back to 1
        assert_eq!(m.state().roll_index, 1);
        assert!(m.state().is_roll);
        assert_eq!(std::fs::read(path_of(&m, 1)).unwrap(), b"");

        m.write(b"line-0004\n", true).unwrap();
        assert_eq!(std::fs::read(path_of(&m, 1)).unwrap(), b"line-0004\n");
        assert_eq!(std::fs::read(path_of(&m, 3)).unwrap(), b"line-0003\n");
    }

    #[test]
    fn test_existing_file_size_is_picked_up() {
        let dir = tempdir().unwrap();
        let mut m = manager(dir.path().join("app"), 2, 10);
        std::fs::write(path_of(&m, 1), b"12345678").unwrap();
        m.write(b"abc", true).unwrap();
        // 8 + 3 > 10, so the line went to the next file
        assert_eq!(std::fs::read(path_of(&m, 1)).unwrap(), b"12345678");
        assert_eq!(std::fs::read(path_of(&m, 2)).unwrap(), b"abc");
    }

    #[test]
    fn test_heals_after_external_delete() {
        let dir = tempdir().unwrap();
        let mut m = manager(dir.path().join("app"), 3, 1000);
        m.set_heal_interval(1);
        m.write(b"before\n", true).unwrap();
        let path = path_of(&m, 1);
        std::fs::remove_file(&path).unwrap();

        m.write(b"after\n", true).unwrap();
        assert_eq!(m.heal_count(), 1);
        assert_eq!(std::fs::read(&path).unwrap(), b"after\n");
        assert_eq!(m.state().current_size, 6);
    }

    #[test]
    fn test_heals_after_rename_and_recreate() {
        let dir = tempdir().unwrap();
        let mut m = manager(dir.path().join("app"), 3, 1000);
        m.set_heal_interval(1);
        m.write(b"old line\n", true).unwrap();
        let path = path_of(&m, 1);

        // What an external rotation tool does: move the file away and put a
        // fresh one in its place
        let moved = dir.path().join("moved.log.1");
        std::fs::rename(&path, &moved).unwrap();
        std::fs::write(&path, b"").unwrap();

        m.write(b"new\n", true).unwrap();
        assert_eq!(m.heal_count(), 1);
        assert_eq!(std::fs::read(&path).unwrap(), b"new\n");
        assert_eq!(std::fs::read(&moved).unwrap(), b"old line\n");
        assert_eq!(
            m.state().current_size,
            std::fs::metadata(&path).unwrap().len()
        );
    }

    #[test]
    fn test_failed_wrap_still_truncates_on_retry() {
        let dir = tempdir().unwrap();
        let mut m = manager(dir.path().join("app"), 2, 10);
        m.write(b"line-0001\n", true).unwrap();
        let first = path_of(&m, 1);

        // File 1 cannot be opened when the index wraps back to it
        std::fs::remove_file(&first).unwrap();
        std::fs::create_dir(&first).unwrap();
        assert!(m.write(b"line-0002\n", true).is_err());
        assert!(m.state().is_roll);
        assert!(!m.is_open());

        std::fs::remove_dir(&first).unwrap();
        std::fs::write(&first, b"stale content\n").unwrap();
        m.write(b"line-0003\n", true).unwrap();
        assert_eq!(std::fs::read(&first).unwrap(), b"line-0003\n");
        assert_eq!(std::fs::read(path_of(&m, 2)).unwrap(), b"line-0002\n");
    }

    #[test]
    fn test_heal_interval_delays_detection() {
        let dir = tempdir().unwrap();
        let mut m = manager(dir.path().join("app"), 3, 1000);
        m.set_heal_interval(3);
        m.write(b"a\n", true).unwrap();
        let path = path_of(&m, 1);
        std::fs::remove_file(&path).unwrap();

        m.write(b"b\n", true).unwrap();
        assert!(!path.exists());
        m.write(b"c\n", true).unwrap();
        assert_eq!(m.heal_count(), 1);
        assert_eq!(std::fs::read(&path).unwrap(), b"c\n");
    }

    #[test]
    fn test_day_rollover_starts_new_sequence() {
        let dir = tempdir().unwrap();
        let mut m = manager(dir.path().join("app"), 3, 1000);
        m.write(b"today\n", true).unwrap();
        let old = path_of(&m, 1);

        let tomorrow = Local::now() + chrono::Duration::days(1);
        m.roll_over_day(&tomorrow).unwrap();
        assert_eq!(m.state().stamp, StampFormat::Day.render(&tomorrow));
        m.write(b"tomorrow\n", true).unwrap();

        let new = path_of(&m, 1);
        assert_ne!(old, new);
        assert_eq!(std::fs::read(&old).unwrap(), b"today\n");
        assert_eq!(std::fs::read(&new).unwrap(), b"tomorrow\n");
    }

    #[test]
    fn test_open_failure_is_retried() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let mut m = manager(blocker.join("app"), 3, 1000);

        assert!(matches!(m.write(b"lost\n", true), Err(LogError::CreateDir { .. })));
        assert!(!m.is_open());

        std::fs::remove_file(&blocker).unwrap();
        m.write(b"kept\n", true).unwrap();
        assert_eq!(m.state().roll_index, 1);
        assert_eq!(std::fs::read(path_of(&m, 1)).unwrap(), b"kept\n");
    }

    #[test]
    fn test_zero_limits_are_coerced() {
        let dir = tempdir().unwrap();
        let mut m = manager(dir.path().join("app"), 3, 100);
        m.set_log_file(dir.path().join("app"), 0, 0, &Local::now()).unwrap();
        assert_eq!(m.state().max_rolls, 1);
        assert_eq!(m.state().max_bytes, 1);
    }
}

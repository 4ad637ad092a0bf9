use std::path::PathBuf;

use crate::file_sink::SinkKind;
use crate::level::Level;
use crate::pending;
use crate::rotation::{self, RotationSettings, StampFormat};

/// Largest message accepted before truncation.
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 5 * 1024 * 1024;

/// Initial settings of a `LoggerCore`.
///
/// Every field can also be changed later through the matching setter on the
/// logger. Construction from this struct performs no I/O.
#[derive(Clone, Debug)]
pub struct LoggerConfig {
    pub level: Level,
    pub to_file: bool,
    pub to_console: bool,
    pub console_color: bool,
    pub message_only: bool,
    /// Default newline flag for macro and `log_formatted` calls.
    pub add_newline: bool,
    pub auto_flush: bool,
    pub check_day: bool,
    /// Promote from Light to Full on the first log call after `start`.
    pub auto_promote: bool,
    pub pattern: Option<String>,
    /// Path prefix of the log files; `None` derives one from the process name.
    pub log_prefix: Option<PathBuf>,
    pub max_rolls: u32,
    pub max_bytes: u64,
    pub stamp_format: StampFormat,
    pub sink_kind: SinkKind,
    pub heal_interval: u64,
    pub pending_max_entries: usize,
    pub pending_max_bytes: usize,
    pub max_message_bytes: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::Debug,
            to_file: true,
            to_console: true,
            console_color: true,
            message_only: false,
            add_newline: true,
            auto_flush: true,
            check_day: false,
            auto_promote: true,
            pattern: None,
            log_prefix: None,
            max_rolls: rotation::DEFAULT_MAX_ROLLS,
            max_bytes: rotation::DEFAULT_MAX_BYTES,
            stamp_format: StampFormat::Day,
            sink_kind: SinkKind::Buffered,
            heal_interval: rotation::DEFAULT_HEAL_INTERVAL,
            pending_max_entries: pending::DEFAULT_MAX_ENTRIES,
            pending_max_bytes: pending::DEFAULT_MAX_BYTES,
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
        }
    }
}

impl LoggerConfig {
    pub fn rotation_settings(&self) -> RotationSettings {
        RotationSettings {
            prefix: self.log_prefix.clone(),
            max_rolls: self.max_rolls,
            max_bytes: self.max_bytes,
            stamp_format: self.stamp_format,
            sink_kind: self.sink_kind,
            heal_interval: self.heal_interval,
        }
    }
}

use chrono::{DateTime, Local};

use crate::level::Level;

/// One log call, borrowed from its caller.
///
/// An event lives on the stack of the call that produced it and is never
/// shared between threads. The call-site fields are plain strings and
/// integers; the `log_at!` family of macros fills them in from `file!()`,
/// `line!()` and `module_path!()`.
#[derive(Debug, Clone)]
pub struct LogEvent<'a> {
    pub level: Level,
    /// File name without directories.
    pub file: &'a str,
    /// File path as reported by the call site.
    pub path: &'a str,
    pub function: &'a str,
    pub line: u32,
    pub message: &'a str,
    /// Whether a line terminator is appended after rendering.
    pub newline: bool,
    pub time: DateTime<Local>,
}

impl<'a> LogEvent<'a> {
    /// Creates an event stamped with the current wall-clock time and no
    /// call-site information.
    pub fn new(level: Level, message: &'a str) -> Self {
        Self {
            level,
            file: "",
            path: "",
            function: "",
            line: 0,
            message,
            newline: true,
            time: Local::now(),
        }
    }

    /// Creates a message-less event for a call site, as used by
    /// `LoggerCore::log_formatted`.
    pub fn at_call_site(level: Level, path: &'a str, line: u32, function: &'a str) -> Self {
        Self::new(level, "").at(path, line, function)
    }

    /// Attaches call-site information. The short file name is derived from
    /// `path`.
    pub fn at(mut self, path: &'a str, line: u32, function: &'a str) -> Self {
        self.path = path;
        self.file = short_file_name(path);
        self.line = line;
        self.function = function;
        self
    }

    pub fn with_time(mut self, time: DateTime<Local>) -> Self {
        self.time = time;
        self
    }

    pub fn with_newline(mut self, newline: bool) -> Self {
        self.newline = newline;
        self
    }

    pub fn with_message(mut self, message: &'a str) -> Self {
        self.message = message;
        self
    }
}

/// Returns the part of `path` after the last `/` or `\`.
pub fn short_file_name(path: &str) -> &str {
    match path.rfind(|c: char| c == '/' || c == '\\') {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// Logs a formatted message at the given level, capturing the call site.
///
/// The first argument is anything that dereferences to a `LoggerCore`.
/// Formatting is skipped entirely when the level is filtered out.
///
/// # Examples
///
/// ```
/// use rolling_logger::{log_at, Level, LoggerCore};
///
/// let logger = LoggerCore::new("docs");
/// log_at!(logger, Level::Info, "Temperature: {} C", 25.5);
/// ```
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger: &$crate::LoggerCore = &$logger;
        let mut event =
            $crate::LogEvent::at_call_site($level, file!(), line!(), module_path!());
        event.newline = logger.add_newline();
        logger.log_formatted(event, format_args!($($arg)+))
    }};
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::Level::Debug, $($arg)+) };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::Level::Info, $($arg)+) };
}

#[macro_export]
macro_rules! log_notice {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::Level::Notice, $($arg)+) };
}

#[macro_export]
macro_rules! log_warning {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::Level::Warning, $($arg)+) };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::Level::Error, $($arg)+) };
}

#[macro_export]
macro_rules! log_critical {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::Level::Critical, $($arg)+) };
}

#[macro_export]
macro_rules! log_alert {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::Level::Alert, $($arg)+) };
}

use std::fmt;

/// Severity of a log event.
///
/// Levels are totally ordered from the most verbose (`Debug`) to the most
/// severe (`Alert`). A logger drops every event whose level is below its
/// configured minimum.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Notice = 2,
    Warning = 3,
    Error = 4,
    Critical = 5,
    Alert = 6,
}

impl Level {
    pub const ALL: [Level; 7] = [
        Level::Debug,
        Level::Info,
        Level::Notice,
        Level::Warning,
        Level::Error,
        Level::Critical,
        Level::Alert,
    ];

    /// Upper-case name used by the default prefix and `%l`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Notice => "NOTICE",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
            Level::Alert => "ALERT",
        }
    }

    /// One-letter form used by `%L`.
    pub const fn short(self) -> &'static str {
        match self {
            Level::Debug => "D",
            Level::Info => "I",
            Level::Notice => "N",
            Level::Warning => "W",
            Level::Error => "E",
            Level::Critical => "C",
            Level::Alert => "A",
        }
    }

    /// ANSI color escape applied to the console copy of a line.
    pub const fn color(self) -> &'static str {
        match self {
            Level::Debug => "\x1B[32m",
            Level::Info => "\x1B[36m",
            Level::Notice => "\x1B[34m",
            Level::Warning => "\x1B[33m",
            Level::Error => "\x1B[31m",
            Level::Critical => "\x1B[35m",
            Level::Alert => "\x1B[37m",
        }
    }

    /// Inverse of `level as u8`; out-of-range values saturate to `Alert`.
    pub const fn from_u8(value: u8) -> Level {
        match value {
            0 => Level::Debug,
            1 => Level::Info,
            2 => Level::Notice,
            3 => Level::Warning,
            4 => Level::Error,
            5 => Level::Critical,
            _ => Level::Alert,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warning,
            log::Level::Info => Level::Info,
            log::Level::Debug | log::Level::Trace => Level::Debug,
        }
    }
}

//! # Rolling Logger
//!
//! An in-process logging core that writes human-readable lines to rolling
//! files and the console, and can be started safely while the process is
//! still initializing.
//!
//! ## Key Features
//!
//! * **Deferred file output**: a started logger first runs in a light phase
//!   that only prints to the console and buffers lines in memory; the file is
//!   opened on promotion and the buffer replayed in order
//! * **Rolling files**: `<prefix>_<stamp>_<n>.log`, rolled by size, wrapped
//!   after a fixed count, and restarted on a new calendar day
//! * **Self-healing**: a log file deleted or replaced behind the logger's back
//!   is recreated
//! * **Patterns**: `strftime` verbs plus `%e`, `%l`, `%v` and friends, compiled
//!   once and rendered with a per-thread timestamp cache
//! * **Errors never escape**: I/O failures go to a per-logger error handler
//!   (or stderr) and logging simply continues
//!
//! ## Main Components
//!
//! * `LoggerCore`: phases, filtering, rendering and dispatch
//! * `Registry`: named loggers shared across the process
//! * `rotation`: the rolling file writer
//! * `pattern` and `efficient_clock`: line layout and cached timestamps
//! * `facade`: routes the `log` crate's macros into a `LoggerCore`
//!
//! ## Quick Start
//!
//! ```no_run
//! use rolling_logger::{log_error, log_info, Level, Registry};
//!
//! let logger = Registry::global().get("app");
//! logger.set_log_file("./logs/app", 5, 10 * 1024 * 1024);
//! logger.set_level(Level::Info);
//! logger.set_pattern("%Y-%m-%d %H:%M:%S.%e [%l] %v");
//! logger.start(true);
//!
//! log_info!(logger, "Temperature: {} C", 25.5);
//! log_error!(logger, "Status: {}, Count: {}", true, 42);
//! logger.flush();
//! ```

pub mod config;
pub mod console;
pub mod discovery;
pub mod efficient_clock;
pub mod error;
pub mod event;
pub mod facade;
pub mod file_sink;
pub mod level;
pub mod logger;
pub mod pattern;
pub mod pending;
pub mod registry;
pub mod retention;
pub mod rotation;

pub use crate::config::LoggerConfig;
pub use crate::console::ConsoleTarget;
pub use crate::error::{ErrorHandler, LogError};
pub use crate::event::LogEvent;
pub use crate::file_sink::SinkKind;
pub use crate::level::Level;
pub use crate::logger::{LoggerCore, Phase, BANNER, TRUNCATION_MARKER};
pub use crate::registry::{get_logger, Registry};
pub use crate::rotation::StampFormat;

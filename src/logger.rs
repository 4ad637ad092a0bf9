//! The logging engine.
//!
//! A `LoggerCore` moves through three phases:
//!
//! ```text
//! Off --start()--> Light --promote() / first log with auto-promote--> Full
//! ```
//!
//! * **Off**: every call is a cheap no-op.
//! * **Light**: lines are rendered and shown on the console right away, but
//!   file output is deferred; rendered lines wait in a bounded pending buffer.
//!   Nothing touches the file system in this phase, so it is safe during
//!   process or library initialization.
//! * **Full**: lines go straight to the rolling file (and the console).
//!
//! Promotion opens the file, replays the pending buffer in order, and only
//! then switches to Full. A failed promotion keeps the logger in Light with
//! the unreplayed lines still buffered, so it can simply be retried.
//!
//! Rendering happens outside any lock. Only the final dispatch (file write,
//! pending-buffer append, console write) is serialized: file and buffer by a
//! per-logger mutex, the console by one process-wide mutex. Internal errors
//! are collected under the lock and reported after it is released.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::io::{self, Write as _};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::config::LoggerConfig;
use crate::console::ConsoleTarget;
use crate::efficient_clock::with_clock_cache;
use crate::error::{ErrorHandler, LogError};
use crate::event::LogEvent;
use crate::file_sink::SinkKind;
use crate::level::Level;
use crate::pattern::{self, CompiledPattern, RenderContext};
use crate::pending::PendingBuffer;
use crate::retention;
use crate::rotation::{RotationManager, RotationState, StampFormat};

/// Appended to messages cut at the size limit.
pub const TRUNCATION_MARKER: &str = "\n... [Message Truncated]";

/// Message of the line emitted by `start(true)`.
pub const BANNER: &str = "---------- Start logging ----------";

#[cfg(windows)]
const LINE_ENDING: &[u8] = b"\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &[u8] = b"\n";

/// Lifecycle stage of a logger.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Off = 0,
    Light = 1,
    Full = 2,
}

impl Phase {
    const fn from_u8(value: u8) -> Phase {
        match value {
            0 => Phase::Off,
            1 => Phase::Light,
            _ => Phase::Full,
        }
    }
}

thread_local! {
    /// Set while this thread runs an error handler.
    static IN_HANDLER: Cell<bool> = const { Cell::new(false) };
    /// Loggers whose lock this thread currently holds or is acquiring.
    static DISPATCHING: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

fn in_handler() -> bool {
    IN_HANDLER.try_with(Cell::get).unwrap_or(false)
}

struct HandlerScope {
    previous: bool,
}

impl HandlerScope {
    fn enter() -> Self {
        let previous = IN_HANDLER.try_with(|flag| flag.replace(true)).unwrap_or(false);
        Self { previous }
    }
}

impl Drop for HandlerScope {
    fn drop(&mut self) {
        let _ = IN_HANDLER.try_with(|flag| flag.set(self.previous));
    }
}

fn is_dispatching(id: usize) -> bool {
    DISPATCHING
        .try_with(|held| held.borrow().contains(&id))
        .unwrap_or(false)
}

struct DispatchScope {
    id: usize,
}

impl DispatchScope {
    fn enter(id: usize) -> Self {
        let _ = DISPATCHING.try_with(|held| held.borrow_mut().push(id));
        Self { id }
    }
}

impl Drop for DispatchScope {
    fn drop(&mut self) {
        let _ = DISPATCHING.try_with(|held| {
            let mut held = held.borrow_mut();
            if let Some(pos) = held.iter().rposition(|&id| id == self.id) {
                held.remove(pos);
            }
        });
    }
}

/// Cuts `message` to at most `max` bytes on a character boundary and appends
/// [`TRUNCATION_MARKER`]. Returns whether truncation happened.
pub fn truncate_message(message: &str, max: usize) -> (Cow<'_, str>, bool) {
    if message.len() <= max {
        return (Cow::Borrowed(message), false);
    }
    let mut cut = max;
    while !message.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut out = String::with_capacity(cut + TRUNCATION_MARKER.len());
    out.push_str(&message[..cut]);
    out.push_str(TRUNCATION_MARKER);
    (Cow::Owned(out), true)
}

/// Resolves `args` into a message. If a formatted value fails, whatever was
/// produced so far is kept and `false` is returned.
pub fn format_message(args: fmt::Arguments<'_>) -> (String, bool) {
    if let Some(text) = args.as_str() {
        return (text.to_string(), true);
    }
    let mut out = String::new();
    let ok = fmt::write(&mut out, args).is_ok();
    (out, ok)
}

struct CoreState {
    rotation: RotationManager,
    pending: PendingBuffer,
}

/// One independent logger: configuration, phase, rolling file, and pending
/// buffer.
///
/// All methods take `&self` and may be called from any thread.
///
/// # Examples
///
/// ```no_run
/// use rolling_logger::{log_info, Level, LoggerCore};
///
/// let logger = LoggerCore::new("app");
/// logger.set_log_file("./logs/app", 5, 10 * 1024 * 1024);
/// logger.set_level(Level::Info);
/// logger.start(true);
///
/// log_info!(logger, "listening on port {}", 8080);
/// logger.flush();
/// ```
pub struct LoggerCore {
    name: String,
    phase: AtomicU8,
    enabled: AtomicBool,
    min_level: AtomicU8,
    to_file: AtomicBool,
    to_console: AtomicBool,
    console_color: AtomicBool,
    message_only: AtomicBool,
    add_newline: AtomicBool,
    auto_flush: AtomicBool,
    check_day: AtomicBool,
    auto_promote: AtomicBool,
    max_message_bytes: AtomicUsize,
    /// Latest day key seen; 0 before the first line. Only moves forward.
    last_day: AtomicI32,
    /// Set when a line opened a later day than `last_day`; consumed under the
    /// state lock by the next file write.
    day_changed: AtomicBool,
    /// Timestamp of the newest line that advanced the day.
    rollover_at: Mutex<Option<DateTime<Local>>>,
    pattern: RwLock<Option<Arc<CompiledPattern>>>,
    error_handler: RwLock<Option<ErrorHandler>>,
    console: RwLock<ConsoleTarget>,
    state: Mutex<CoreState>,
}

impl LoggerCore {
    /// Creates a logger in phase Off with default settings.
    pub fn new(name: &str) -> Self {
        Self::with_config(name, LoggerConfig::default())
    }

    /// Creates a logger in phase Off. No I/O happens here.
    pub fn with_config(name: &str, config: LoggerConfig) -> Self {
        let pattern = config
            .pattern
            .as_deref()
            .and_then(CompiledPattern::compile)
            .map(Arc::new);
        Self {
            name: name.to_string(),
            phase: AtomicU8::new(Phase::Off as u8),
            enabled: AtomicBool::new(true),
            min_level: AtomicU8::new(config.level as u8),
            to_file: AtomicBool::new(config.to_file),
            to_console: AtomicBool::new(config.to_console),
            console_color: AtomicBool::new(config.console_color),
            message_only: AtomicBool::new(config.message_only),
            add_newline: AtomicBool::new(config.add_newline),
            auto_flush: AtomicBool::new(config.auto_flush),
            check_day: AtomicBool::new(config.check_day),
            auto_promote: AtomicBool::new(config.auto_promote),
            max_message_bytes: AtomicUsize::new(config.max_message_bytes),
            last_day: AtomicI32::new(0),
            day_changed: AtomicBool::new(false),
            rollover_at: Mutex::new(None),
            pattern: RwLock::new(pattern),
            error_handler: RwLock::new(None),
            console: RwLock::new(ConsoleTarget::default()),
            state: Mutex::new(CoreState {
                rotation: RotationManager::new(name, config.rotation_settings()),
                pending: PendingBuffer::new(config.pending_max_entries, config.pending_max_bytes),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }

    // ---- configuration ------------------------------------------------------

    pub fn set_level(&self, level: Level) {
        self.min_level.store(level as u8, Ordering::Relaxed);
    }

    pub fn level(&self) -> Level {
        Level::from_u8(self.min_level.load(Ordering::Relaxed))
    }

    pub fn set_outputs(&self, to_file: bool, to_console: bool) {
        self.to_file.store(to_file, Ordering::Relaxed);
        self.to_console.store(to_console, Ordering::Relaxed);
    }

    /// Mutes or unmutes a started logger without changing its phase.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.phase() != Phase::Off && self.enabled.load(Ordering::Relaxed)
    }

    /// Writes the bare message without prefix or pattern.
    pub fn set_message_only(&self, message_only: bool) {
        self.message_only.store(message_only, Ordering::Relaxed);
    }

    pub fn set_add_newline(&self, add_newline: bool) {
        self.add_newline.store(add_newline, Ordering::Relaxed);
    }

    /// Newline flag used by the logging macros.
    pub fn add_newline(&self) -> bool {
        self.add_newline.load(Ordering::Relaxed)
    }

    pub fn set_auto_flush(&self, auto_flush: bool) {
        self.auto_flush.store(auto_flush, Ordering::Relaxed);
    }

    pub fn set_check_day_rollover(&self, check_day: bool) {
        self.check_day.store(check_day, Ordering::Relaxed);
    }

    pub fn set_screen_color(&self, color: bool) {
        self.console_color.store(color, Ordering::Relaxed);
    }

    /// Whether the first log call in Light tries to promote to Full.
    pub fn set_auto_promote(&self, auto_promote: bool) {
        self.auto_promote.store(auto_promote, Ordering::Relaxed);
    }

    pub fn set_max_message_bytes(&self, max: usize) {
        self.max_message_bytes.store(max, Ordering::Relaxed);
    }

    pub fn set_error_handler(&self, handler: impl Fn(&str) + Send + Sync + 'static) {
        *self.error_handler.write() = Some(Arc::new(handler));
    }

    /// Goes back to reporting internal errors on stderr.
    pub fn clear_error_handler(&self) {
        *self.error_handler.write() = None;
    }

    pub fn set_console_target(&self, target: ConsoleTarget) {
        *self.console.write() = target;
    }

    /// Compiles and installs a line pattern. An empty pattern restores the
    /// default prefix. Renders in flight keep the pattern they started with.
    pub fn set_pattern(&self, pattern: &str) {
        let compiled = CompiledPattern::compile(pattern).map(Arc::new);
        *self.pattern.write() = compiled;
    }

    /// Starts a new roll sequence `<prefix>_<stamp>_<n>.log`.
    ///
    /// Directory creation and file opening wait for the next write, so this
    /// is safe to call during restricted initialization. Only the previously
    /// open file, if any, is flushed and closed.
    pub fn set_log_file(&self, prefix: impl Into<PathBuf>, max_rolls: u32, max_bytes: u64) {
        let prefix = prefix.into();
        let result = {
            let _scope = DispatchScope::enter(self.id());
            let mut state = self.state.lock();
            self.last_day.store(0, Ordering::Relaxed);
            self.day_changed.store(false, Ordering::Relaxed);
            *self.rollover_at.lock() = None;
            state
                .rotation
                .set_log_file(prefix, max_rolls, max_bytes, &Local::now())
        };
        if let Err(err) = result {
            self.report(&err);
        }
    }

    /// File-name stamp layout for the next `set_log_file` or day rollover.
    pub fn set_stamp_format(&self, format: StampFormat) {
        self.state.lock().rotation.set_stamp_format(format);
    }

    /// Writes between self-healing identity checks; 0 disables the check.
    pub fn set_heal_interval(&self, interval: u64) {
        self.state.lock().rotation.set_heal_interval(interval);
    }

    pub fn set_sink_kind(&self, kind: SinkKind) {
        self.state.lock().rotation.set_sink_kind(kind);
    }

    pub fn set_pending_limits(&self, max_entries: usize, max_bytes: usize) {
        self.state.lock().pending.set_limits(max_entries, max_bytes);
    }

    // ---- introspection ------------------------------------------------------

    /// Path of the file currently written to, if one has been opened.
    pub fn current_file(&self) -> Option<PathBuf> {
        self.state.lock().rotation.current_path().map(Path::to_path_buf)
    }

    pub fn rotation_state(&self) -> RotationState {
        self.state.lock().rotation.state().clone()
    }

    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    // ---- lifecycle ----------------------------------------------------------

    /// Moves Off to Light. Does nothing if the logger already started.
    ///
    /// With `emit_banner`, an Alert-level start line is logged through the
    /// normal path of the new phase.
    pub fn start(&self, emit_banner: bool) {
        let started = self
            .phase
            .compare_exchange(
                Phase::Off as u8,
                Phase::Light as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        if !started {
            return;
        }
        debug!(logger = %self.name, "logger started");
        if emit_banner {
            let event = LogEvent::new(Level::Alert, BANNER)
                .at(file!(), line!(), module_path!())
                .with_newline(self.add_newline());
            self.log(&event);
        }
    }

    /// Moves Light to Full: opens the current file, replays the pending
    /// buffer in order, then switches phase.
    ///
    /// Returns whether the logger is in Full afterwards. Calling it again in
    /// Full is a no-op. On failure the logger stays in Light, the lines not
    /// yet replayed stay buffered, and the error goes to the error channel.
    pub fn promote(&self) -> bool {
        match self.phase() {
            Phase::Full => return true,
            Phase::Off => return false,
            Phase::Light => {}
        }
        let id = self.id();
        if is_dispatching(id) {
            return false;
        }
        let mut errors = Vec::new();
        let promoted = {
            let _scope = DispatchScope::enter(id);
            let mut state = self.state.lock();
            self.promote_locked(&mut state, &mut errors)
        };
        self.report_all(errors);
        promoted
    }

    /// Forces buffered bytes of the open file to the OS.
    pub fn flush(&self) {
        let id = self.id();
        if is_dispatching(id) {
            return;
        }
        let result = {
            let _scope = DispatchScope::enter(id);
            self.state.lock().rotation.flush()
        };
        if let Err(err) = result {
            self.report(&err);
        }
    }

    /// Deletes log files of this logger's prefix dated more than `keep_days`
    /// days ago. Returns the number of files deleted.
    pub fn cleanup_old_logs(&self, keep_days: u32) -> usize {
        let prefix = self.state.lock().rotation.prefix();
        let Some(stem) = prefix.file_name().map(|s| s.to_string_lossy().into_owned()) else {
            return 0;
        };
        let dir = prefix
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let report = retention::sweep(&dir, &stem, keep_days, &Local::now());
        let deleted = report.deleted.len();
        self.report_all(report.errors);
        deleted
    }

    // ---- logging ------------------------------------------------------------

    /// Whether an event at `level` would be rendered.
    #[inline]
    pub fn accepts(&self, level: Level) -> bool {
        self.phase.load(Ordering::Relaxed) != Phase::Off as u8
            && self.enabled.load(Ordering::Relaxed)
            && level as u8 >= self.min_level.load(Ordering::Relaxed)
    }

    /// Renders and dispatches one event.
    ///
    /// Never fails and never panics on I/O problems; those go to the error
    /// channel.
    pub fn log(&self, event: &LogEvent<'_>) {
        if !self.accepts(event.level) {
            return;
        }
        let max = self.max_message_bytes.load(Ordering::Relaxed);
        let (message, _truncated) = truncate_message(event.message, max);

        let (mut bytes, day) = self.render(event, &message);
        let text_len = bytes.len();
        if event.newline {
            bytes.extend_from_slice(LINE_ENDING);
        }
        self.note_day(day, &event.time);
        self.dispatch(event.level, bytes, text_len);
    }

    /// Resolves `args` into the message of `event` and logs it. Formatting is
    /// skipped when the event's level is filtered out.
    pub fn log_formatted(&self, event: LogEvent<'_>, args: fmt::Arguments<'_>) {
        if !self.accepts(event.level) {
            return;
        }
        let (message, _ok) = format_message(args);
        self.log(&event.with_message(&message));
    }

    fn id(&self) -> usize {
        self as *const Self as usize
    }

    fn render(&self, event: &LogEvent<'_>, message: &str) -> (Vec<u8>, i32) {
        let compiled = self.pattern.read().clone();
        let message_only = self.message_only.load(Ordering::Relaxed);
        let ctx = RenderContext {
            event,
            message,
            logger_name: &self.name,
        };
        with_clock_cache(|clock| {
            let mut out = String::with_capacity(message.len() + 64);
            if message_only {
                out.push_str(message);
            } else if let Some(compiled) = &compiled {
                compiled.render(&ctx, clock, &mut out);
            } else {
                pattern::render_default(&ctx, clock, &mut out);
            }
            clock.refresh(&event.time);
            (out.into_bytes(), clock.day_key())
        })
    }

    /// Records the day of a rendered line. A line from a later day than any
    /// seen before schedules a rollover; lines from earlier days (a thread
    /// that read the clock just before midnight) never do.
    fn note_day(&self, day: i32, time: &DateTime<Local>) {
        if !self.check_day.load(Ordering::Relaxed) {
            return;
        }
        let mut last = self.last_day.load(Ordering::Acquire);
        loop {
            if day <= last {
                return;
            }
            match self
                .last_day
                .compare_exchange_weak(last, day, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => break,
                Err(current) => last = current,
            }
        }
        // The first line only seeds the day.
        if last == 0 {
            return;
        }
        {
            let mut at = self.rollover_at.lock();
            if at.map_or(true, |previous| previous < *time) {
                *at = Some(*time);
            }
        }
        self.day_changed.store(true, Ordering::Release);
    }

    /// Starts the new day's file sequence if a rollover is pending. The stamp
    /// comes from the line that advanced the day, not from the line that
    /// happens to take the lock first.
    fn apply_day_rollover(&self, state: &mut CoreState, errors: &mut Vec<LogError>) {
        if !self.day_changed.swap(false, Ordering::AcqRel) {
            return;
        }
        let Some(at) = self.rollover_at.lock().take() else {
            return;
        };
        if let Err(err) = state.rotation.roll_over_day(&at) {
            errors.push(err);
        }
    }

    fn dispatch(&self, level: Level, bytes: Vec<u8>, text_len: usize) {
        let id = self.id();
        if is_dispatching(id) {
            // Logging from inside this logger's own dispatch (for example via
            // a tracing subscriber); taking the lock again would deadlock.
            let _ = io::stderr().lock().write_all(&bytes);
            return;
        }

        let to_file = self.to_file.load(Ordering::Relaxed);
        let to_console = self.to_console.load(Ordering::Relaxed);
        let mut errors = Vec::new();

        if self.phase() == Phase::Full {
            if to_file {
                let _scope = DispatchScope::enter(id);
                let mut state = self.state.lock();
                self.write_locked(&mut state, &bytes, &mut errors);
            }
            if to_console {
                self.write_console(level, &bytes, text_len);
            }
        } else {
            if to_console {
                self.write_console(level, &bytes, text_len);
            }
            if to_file {
                let _scope = DispatchScope::enter(id);
                let mut state = self.state.lock();
                // Promotion may have completed since the phase was read.
                if self.phase() == Phase::Full {
                    self.write_locked(&mut state, &bytes, &mut errors);
                } else {
                    state.pending.push(bytes);
                }
            }
            if self.auto_promote.load(Ordering::Relaxed) && !in_handler() {
                self.try_auto_promote(&mut errors);
            }
        }

        self.report_all(errors);
    }

    fn write_locked(&self, state: &mut CoreState, bytes: &[u8], errors: &mut Vec<LogError>) {
        self.apply_day_rollover(state, errors);
        if let Err(err) = state.rotation.write(bytes, self.auto_flush.load(Ordering::Relaxed)) {
            errors.push(err);
        }
    }

    fn write_console(&self, level: Level, bytes: &[u8], text_len: usize) {
        let target = self.console.read().clone();
        let color = self.console_color.load(Ordering::Relaxed);
        // Console failures are not reported.
        let _ = target.write_line(&bytes[..text_len], &bytes[text_len..], level, color);
    }

    // Never blocks: if another thread holds the lock, it will get its turn.
    fn try_auto_promote(&self, errors: &mut Vec<LogError>) {
        if self.phase() != Phase::Light {
            return;
        }
        let _scope = DispatchScope::enter(self.id());
        if let Some(mut state) = self.state.try_lock() {
            self.promote_locked(&mut state, errors);
        }
    }

    fn promote_locked(&self, state: &mut CoreState, errors: &mut Vec<LogError>) -> bool {
        match self.phase() {
            Phase::Full => return true,
            Phase::Off => return false,
            Phase::Light => {}
        }

        let mut replayed = 0usize;
        if self.to_file.load(Ordering::Relaxed) {
            self.apply_day_rollover(state, errors);
            if let Err(err) = state.rotation.ensure_open() {
                errors.push(err);
                return false;
            }
            let auto_flush = self.auto_flush.load(Ordering::Relaxed);
            while let Some(line) = state.pending.front() {
                if let Err(err) = state.rotation.write(line, auto_flush) {
                    errors.push(err);
                    return false;
                }
                state.pending.pop_front();
                replayed += 1;
            }
        } else {
            state.pending.clear();
        }

        self.phase.store(Phase::Full as u8, Ordering::Release);
        debug!(logger = %self.name, replayed, "promoted to full output");
        true
    }

    fn report_all(&self, errors: Vec<LogError>) {
        for err in &errors {
            self.report(err);
        }
    }

    /// Sends `error` to the error handler, or to stderr if there is none or
    /// this thread is already inside the handler.
    fn report(&self, error: &LogError) {
        let text = format!("{} internal: {}", self.name, error);
        let handler = self.error_handler.read().clone();
        match handler {
            Some(handler) if !in_handler() => {
                let _scope = HandlerScope::enter();
                if panic::catch_unwind(AssertUnwindSafe(|| handler(&text))).is_err() {
                    let _ = writeln!(io::stderr().lock(), "{} critical: error handler panicked on: {}", self.name, error);
                }
            }
            _ => {
                let _ = writeln!(io::stderr().lock(), "{} critical: {}", self.name, error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_message_is_borrowed() {
        let (out, truncated) = truncate_message("hello", 10);
        assert!(!truncated);
        assert!(matches!(out, Cow::Borrowed("hello")));
    }

    #[test]
    fn test_truncate_length_is_independent_of_overflow() {
        let max = 16;
        for extra in [1, 7, 1000] {
            let message = "x".repeat(max + extra);
            let (out, truncated) = truncate_message(&message, max);
            assert!(truncated);
            assert_eq!(out.len(), max + TRUNCATION_MARKER.len());
            assert!(out.ends_with(TRUNCATION_MARKER));
        }
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        // 'é' is two bytes; cutting at 3 would split the second one
        let (out, truncated) = truncate_message("éé", 3);
        assert!(truncated);
        assert_eq!(out, format!("é{TRUNCATION_MARKER}"));
    }

    #[test]
    fn test_format_message_degrades() {
        struct Broken;
        impl fmt::Display for Broken {
            fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
                Err(fmt::Error)
            }
        }
        assert_eq!(format_message(format_args!("plain")), ("plain".to_string(), true));
        assert_eq!(format_message(format_args!("n={}", 3)), ("n=3".to_string(), true));
        let (text, ok) = format_message(format_args!("before {} after", Broken));
        assert!(!ok);
        assert!(text.starts_with("before "));
    }

    #[test]
    fn test_off_phase_ignores_everything() {
        let logger = LoggerCore::new("off");
        assert_eq!(logger.phase(), Phase::Off);
        assert!(!logger.accepts(Level::Alert));
        logger.log(&LogEvent::new(Level::Alert, "dropped"));
        assert_eq!(logger.pending_len(), 0);
        assert!(!logger.promote());
    }

    #[test]
    fn test_start_is_one_shot() {
        let logger = LoggerCore::new("start");
        logger.set_outputs(true, false);
        logger.set_auto_promote(false);
        logger.start(true);
        logger.start(true);
        assert_eq!(logger.phase(), Phase::Light);
        assert_eq!(logger.pending_len(), 1);
    }

    #[test]
    fn test_phase_order() {
        assert!(Phase::Off < Phase::Light && Phase::Light < Phase::Full);
    }
}

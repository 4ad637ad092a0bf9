//! Line patterns: compiling a format string into render operations and
//! executing them against one event.
//!
//! Calendar fields use chrono's strftime verbs. The engine adds its own verbs
//! on top, which take precedence over strftime letters of the same name:
//!
//! | verb | renders |
//! |------|---------|
//! | `%e` | milliseconds, zero padded to 3 digits |
//! | `%l` | level name (`INFO`) |
//! | `%L` | one-letter level (`I`) |
//! | `%n` | logger name |
//! | `%P` | process id |
//! | `%t` | hashed thread id |
//! | `%s` | short file name |
//! | `%g` | full file path |
//! | `%#` | line number |
//! | `%!` | function name |
//! | `%v` | message body |
//! | `%%` | a literal `%` |
//!
//! Any other `%x` that is not a valid strftime verb is passed through as the
//! two literal characters.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::format::{Item, StrftimeItems};

use crate::efficient_clock::{self, ClockCache};
use crate::event::LogEvent;

static NEXT_PATTERN_ID: AtomicU64 = AtomicU64::new(1);

/// One step of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternOp {
    Literal(String),
    /// Index into the pattern's strftime chunks.
    Time(usize),
    Millis,
    LevelLong,
    LevelShort,
    LoggerName,
    ProcessId,
    ThreadId,
    ShortFile,
    FullPath,
    Line,
    Function,
    Message,
}

/// Everything a render needs besides the pattern itself.
pub struct RenderContext<'a> {
    pub event: &'a LogEvent<'a>,
    /// Message after truncation; may differ from `event.message`.
    pub message: &'a str,
    pub logger_name: &'a str,
}

/// An immutable, ready-to-render pattern.
///
/// Loggers hold the active pattern behind an `Arc`; replacing it swaps the
/// whole compiled value, so a render in flight always sees one complete
/// pattern.
#[derive(Debug)]
pub struct CompiledPattern {
    id: u64,
    source: String,
    ops: Vec<PatternOp>,
    time_formats: Vec<String>,
}

/// Accumulates adjacent literal text and strftime verbs into one run.
///
/// A run that contains at least one strftime verb becomes a single cached
/// time chunk; a run of plain text stays a literal.
#[derive(Default)]
struct Run {
    strftime: String,
    raw: String,
    has_time: bool,
}

impl Run {
    fn push_literal(&mut self, c: char) {
        self.raw.push(c);
        if c == '%' {
            self.strftime.push_str("%%");
        } else {
            self.strftime.push(c);
        }
    }

    fn push_verb(&mut self, verb: char) {
        self.strftime.push('%');
        self.strftime.push(verb);
        self.has_time = true;
    }

    fn flush_into(&mut self, ops: &mut Vec<PatternOp>, time_formats: &mut Vec<String>) {
        let run = std::mem::take(self);
        if run.has_time {
            ops.push(PatternOp::Time(time_formats.len()));
            time_formats.push(run.strftime);
        } else if !run.raw.is_empty() {
            ops.push(PatternOp::Literal(run.raw));
        }
    }
}

fn engine_verb(verb: char) -> Option<PatternOp> {
    Some(match verb {
        'e' => PatternOp::Millis,
        'l' => PatternOp::LevelLong,
        'L' => PatternOp::LevelShort,
        'n' => PatternOp::LoggerName,
        'P' => PatternOp::ProcessId,
        't' => PatternOp::ThreadId,
        's' => PatternOp::ShortFile,
        'g' => PatternOp::FullPath,
        '#' => PatternOp::Line,
        '!' => PatternOp::Function,
        'v' => PatternOp::Message,
        _ => return None,
    })
}

fn is_strftime_verb(verb: char) -> bool {
    if !verb.is_ascii_alphabetic() && verb != '+' {
        return false;
    }
    let mut verb_text = String::with_capacity(2);
    verb_text.push('%');
    verb_text.push(verb);
    // Composite verbs such as %D expand to several items.
    let mut any = false;
    for item in StrftimeItems::new(&verb_text) {
        if matches!(item, Item::Error) {
            return false;
        }
        any = true;
    }
    any
}

impl CompiledPattern {
    /// Parses `source` into render operations.
    ///
    /// Compilation never fails: unknown verbs become literal text. Returns
    /// `None` for an empty pattern, which means "use the default prefix".
    ///
    /// # Examples
    ///
    /// ```
    /// # use rolling_logger::pattern::{CompiledPattern, PatternOp};
    /// let pattern = CompiledPattern::compile("[%l] %v").unwrap();
    /// assert_eq!(pattern.ops()[1], PatternOp::LevelLong);
    /// assert!(CompiledPattern::compile("").is_none());
    /// ```
    pub fn compile(source: &str) -> Option<CompiledPattern> {
        if source.is_empty() {
            return None;
        }

        let mut ops = Vec::new();
        let mut time_formats = Vec::new();
        let mut run = Run::default();
        let mut chars = source.chars();

        while let Some(c) = chars.next() {
            if c != '%' {
                run.push_literal(c);
                continue;
            }
            let Some(verb) = chars.next() else {
                // Trailing lone '%'
                run.push_literal('%');
                break;
            };
            if verb == '%' {
                run.push_literal('%');
            } else if let Some(op) = engine_verb(verb) {
                run.flush_into(&mut ops, &mut time_formats);
                ops.push(op);
            } else if is_strftime_verb(verb) {
                run.push_verb(verb);
            } else {
                run.push_literal('%');
                run.push_literal(verb);
            }
        }
        run.flush_into(&mut ops, &mut time_formats);

        Some(CompiledPattern {
            id: NEXT_PATTERN_ID.fetch_add(1, Ordering::Relaxed),
            source: source.to_string(),
            ops,
            time_formats,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ops(&self) -> &[PatternOp] {
        &self.ops
    }

    /// Appends the rendered line (without line terminator) to `out`.
    pub fn render(&self, ctx: &RenderContext<'_>, clock: &mut ClockCache, out: &mut String) {
        let event = ctx.event;
        for op in &self.ops {
            // Writing into a String only fails if a Display impl does, and
            // none of the values below can.
            let _ = match op {
                PatternOp::Literal(text) => {
                    out.push_str(text);
                    Ok(())
                }
                PatternOp::Time(index) => {
                    out.push_str(clock.time_chunk(
                        self.id,
                        *index,
                        &self.time_formats[*index],
                        &event.time,
                    ));
                    Ok(())
                }
                PatternOp::Millis => write!(out, "{:03}", efficient_clock::millis(&event.time)),
                PatternOp::LevelLong => {
                    out.push_str(event.level.as_str());
                    Ok(())
                }
                PatternOp::LevelShort => {
                    out.push_str(event.level.short());
                    Ok(())
                }
                PatternOp::LoggerName => {
                    out.push_str(ctx.logger_name);
                    Ok(())
                }
                PatternOp::ProcessId => write!(out, "{}", std::process::id()),
                PatternOp::ThreadId => write!(out, "{}", clock.thread_id()),
                PatternOp::ShortFile => {
                    out.push_str(event.file);
                    Ok(())
                }
                PatternOp::FullPath => {
                    out.push_str(event.path);
                    Ok(())
                }
                PatternOp::Line => write!(out, "{}", event.line),
                PatternOp::Function => {
                    out.push_str(event.function);
                    Ok(())
                }
                PatternOp::Message => {
                    out.push_str(ctx.message);
                    Ok(())
                }
            };
        }
    }
}

/// Renders the fixed prefix used when no pattern is set:
/// `<timestamp>.<ms> <LEVEL> [<shortfile>:<line>] <message>`.
pub fn render_default(ctx: &RenderContext<'_>, clock: &mut ClockCache, out: &mut String) {
    let event = ctx.event;
    clock.refresh(&event.time);
    let _ = write!(
        out,
        "{}.{:03} {} [{}:{}] {}",
        clock.stamp(),
        efficient_clock::millis(&event.time),
        event.level.as_str(),
        event.file,
        event.line,
        ctx.message,
    );
}

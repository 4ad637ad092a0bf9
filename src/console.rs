use std::io::{self, Write};
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::Mutex;

use crate::level::Level;

const COLOR_RESET: &str = "\x1B[0m";

lazy_static! {
    /// Serializes console output of every logger in the process, so lines from
    /// different loggers never interleave mid-line.
    static ref CONSOLE_LOCK: Mutex<()> = Mutex::new(());
}

/// Where a logger's console copy goes.
#[derive(Clone, Default)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    /// Any writer, e.g. an in-memory buffer in tests.
    Writer(Arc<Mutex<dyn Write + Send>>),
}

impl ConsoleTarget {
    pub fn writer(writer: impl Write + Send + 'static) -> Self {
        ConsoleTarget::Writer(Arc::new(Mutex::new(writer)))
    }

    /// Writes one rendered line, colored for `level` when `color` is set.
    ///
    /// `line` is the rendered text without terminator; `ending` is written
    /// after the color reset.
    pub fn write_line(&self, line: &[u8], ending: &[u8], level: Level, color: bool) -> io::Result<()> {
        let _guard = CONSOLE_LOCK.lock();
        match self {
            ConsoleTarget::Stdout => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                emit(&mut out, line, ending, level, color)?;
                out.flush()
            }
            ConsoleTarget::Writer(writer) => {
                let mut out = writer.lock();
                emit(&mut *out, line, ending, level, color)?;
                out.flush()
            }
        }
    }
}

fn emit(out: &mut dyn Write, line: &[u8], ending: &[u8], level: Level, color: bool) -> io::Result<()> {
    if color {
        out.write_all(level.color().as_bytes())?;
        out.write_all(line)?;
        out.write_all(COLOR_RESET.as_bytes())?;
    } else {
        out.write_all(line)?;
    }
    out.write_all(ending)
}

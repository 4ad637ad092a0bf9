//! Adapter for the `log` crate, so libraries using `log::info!` and friends
//! write through a `LoggerCore`.

use std::sync::Arc;

use log::{LevelFilter, Metadata, Record, SetLoggerError};

use crate::event::LogEvent;
use crate::level::Level;
use crate::logger::LoggerCore;

pub struct FacadeLogger {
    core: Arc<LoggerCore>,
}

impl FacadeLogger {
    pub fn new(core: Arc<LoggerCore>) -> Self {
        Self { core }
    }

    pub fn core(&self) -> &Arc<LoggerCore> {
        &self.core
    }
}

impl log::Log for FacadeLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.core.accepts(Level::from(metadata.level()))
    }

    fn log(&self, record: &Record<'_>) {
        let level = Level::from(record.level());
        if !self.core.accepts(level) {
            return;
        }
        let path = record.file().unwrap_or("");
        let function = record.module_path().unwrap_or_else(|| record.target());
        let event = LogEvent::at_call_site(level, path, record.line().unwrap_or(0), function)
            .with_newline(self.core.add_newline());
        self.core.log_formatted(event, *record.args());
    }

    fn flush(&self) {
        self.core.flush();
    }
}

/// Installs `core` as the `log` crate's global logger.
///
/// Fails if another logger was installed first.
pub fn install(core: Arc<LoggerCore>, max_level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(FacadeLogger::new(core)))?;
    log::set_max_level(max_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn test_enabled_follows_core_filter() {
        let core = Arc::new(LoggerCore::new("facade"));
        let facade = FacadeLogger::new(Arc::clone(&core));
        let warn = Metadata::builder().level(log::Level::Warn).build();
        let debug = Metadata::builder().level(log::Level::Debug).build();

        // Off until started
        assert!(!facade.enabled(&warn));

        core.set_outputs(false, false);
        core.start(false);
        core.set_level(Level::Warning);
        assert!(facade.enabled(&warn));
        assert!(!facade.enabled(&debug));
    }
}

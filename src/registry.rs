//! Named loggers shared across a process.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::Mutex;
use tracing::debug;

use crate::config::LoggerConfig;
use crate::discovery::DEFAULT_LOGGER;
use crate::logger::LoggerCore;

lazy_static! {
    static ref GLOBAL: Registry = Registry::new();
}

/// Maps logger names to shared `LoggerCore` instances.
///
/// A name maps to the same instance for the lifetime of the registry;
/// entries are never removed.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rolling_logger::Registry;
///
/// let registry = Registry::new();
/// let a = registry.get("audit");
/// let b = registry.get("audit");
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct Registry {
    loggers: Mutex<HashMap<String, Arc<LoggerCore>>>,
    defaults: LoggerConfig,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_defaults(LoggerConfig::default())
    }

    /// A registry whose newly created loggers start from `defaults`.
    pub fn with_defaults(defaults: LoggerConfig) -> Self {
        Self {
            loggers: Mutex::new(HashMap::new()),
            defaults,
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Returns the logger named `name`, creating it in phase Off if needed.
    pub fn get(&self, name: &str) -> Arc<LoggerCore> {
        self.get_or_create(name, || self.defaults.clone())
    }

    /// Like [`Registry::get`], but a newly created logger uses `config`.
    /// An existing logger is returned unchanged.
    pub fn get_with(&self, name: &str, config: LoggerConfig) -> Arc<LoggerCore> {
        self.get_or_create(name, move || config)
    }

    /// The logger named [`DEFAULT_LOGGER`].
    pub fn default_logger(&self) -> Arc<LoggerCore> {
        self.get(DEFAULT_LOGGER)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loggers.lock().contains_key(name)
    }

    /// Names of all registered loggers, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Flushes every registered logger.
    pub fn flush_all(&self) {
        let loggers: Vec<Arc<LoggerCore>> = self.loggers.lock().values().cloned().collect();
        for logger in loggers {
            logger.flush();
        }
    }

    fn get_or_create(&self, name: &str, config: impl FnOnce() -> LoggerConfig) -> Arc<LoggerCore> {
        let mut loggers = self.loggers.lock();
        if let Some(logger) = loggers.get(name) {
            return Arc::clone(logger);
        }
        debug!(logger = name, "registering logger");
        let logger = Arc::new(LoggerCore::with_config(name, config()));
        loggers.insert(name.to_string(), Arc::clone(&logger));
        logger
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for `Registry::global().get(name)`.
pub fn get_logger(name: &str) -> Arc<LoggerCore> {
    Registry::global().get(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use std::thread;

    #[test]
    fn test_same_name_same_instance() {
        let registry = Registry::new();
        let a = registry.get("net");
        let b = registry.get("net");
        let c = registry.get("disk");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(registry.names(), vec!["disk".to_string(), "net".to_string()]);
    }

    #[test]
    fn test_get_with_only_applies_on_creation() {
        let registry = Registry::new();
        let config = LoggerConfig {
            level: Level::Error,
            ..LoggerConfig::default()
        };
        let first = registry.get_with("db", config.clone());
        assert_eq!(first.level(), Level::Error);

        let again = registry.get_with(
            "db",
            LoggerConfig {
                level: Level::Info,
                ..config
            },
        );
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(again.level(), Level::Error);
    }

    #[test]
    fn test_concurrent_lookup_creates_one_instance() {
        let registry = Arc::new(Registry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.get("shared"))
            })
            .collect();
        let loggers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for logger in &loggers[1..] {
            assert!(Arc::ptr_eq(&loggers[0], logger));
        }
    }

    #[test]
    fn test_global_registry() {
        assert!(Arc::ptr_eq(&get_logger("global-test"), &Registry::global().get("global-test")));
        assert!(Registry::global().contains("global-test"));
    }
}

use std::path::{Path, PathBuf};

/// Name used when the executable path cannot be resolved.
pub const FALLBACK_NAME: &str = "rolling";

/// Name of the default logger in a registry.
pub const DEFAULT_LOGGER: &str = "default";

/// File stem of the running executable, e.g. `server` for `/usr/bin/server`.
pub fn process_name() -> String {
    std::env::current_exe()
        .ok()
        .as_deref()
        .and_then(Path::file_stem)
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

/// Log prefix used when none is configured: the process name in the working
/// directory, suffixed with the logger name for loggers other than the
/// default one so that two loggers never share a file.
pub fn default_prefix(logger_name: &str) -> PathBuf {
    let process = process_name();
    if logger_name.is_empty() || logger_name == DEFAULT_LOGGER {
        PathBuf::from(process)
    } else {
        PathBuf::from(format!("{process}_{logger_name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefix_per_logger() {
        let process = process_name();
        assert!(!process.is_empty());
        assert_eq!(default_prefix(DEFAULT_LOGGER), PathBuf::from(&process));
        assert_eq!(default_prefix(""), PathBuf::from(&process));
        assert_eq!(
            default_prefix("audit"),
            PathBuf::from(format!("{process}_audit"))
        );
    }
}

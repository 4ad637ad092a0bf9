use std::env;
use std::path::PathBuf;
use std::thread;

use rolling_logger::{log_info, log_notice, log_warning, Level, Registry};
use tracing_subscriber::EnvFilter;

fn main() {
    // Internal diagnostics of the logger itself, e.g. RUST_LOG=rolling_logger=debug
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let prefix = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("logs/demo"));

    let logger = Registry::global().get("demo");
    logger.set_log_file(&prefix, 3, 64 * 1024);
    logger.set_level(Level::Info);
    logger.set_pattern("%Y-%m-%d %H:%M:%S.%e %L [%t] %s:%# %v");
    logger.set_auto_promote(false);
    logger.set_error_handler(|message| eprintln!("demo logger error: {message}"));
    logger.start(true);

    log_info!(logger, "buffered until promotion, prefix {}", prefix.display());
    if !logger.promote() {
        log_warning!(logger, "could not open the log file, staying console-only");
    }

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let logger = Registry::global().get("demo");
            thread::spawn(move || {
                for i in 0..5 {
                    log_info!(logger, "worker {} line {}", worker, i);
                }
            })
        })
        .collect();
    for worker in workers {
        let _ = worker.join();
    }

    log_notice!(logger, "done, current file {:?}", logger.current_file());
    logger.flush();
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use log::{info, LevelFilter};
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use rolling_logger::{log_debug, log_info, Level, LoggerCore};
use std::sync::Once;
use std::time::Instant;
use tempfile::tempdir;

const ITERATIONS: usize = 20_000;

static LOG4RS_INIT: Once = Once::new();

#[derive(Debug)]
struct TestEvent {
    id: i32,
    active: bool,
    large_number: u64,
    description: String,
}

impl std::fmt::Display for TestEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Event[id={}, active={}, large_number={}, desc={}]",
            self.id, self.active, self.large_number, self.description
        )
    }
}

fn test_event() -> TestEvent {
    TestEvent {
        id: 42,
        active: true,
        large_number: u64::MAX,
        description: "CPU: 95%, Memory: 2.5GB, Network: 1.2Gbps".to_string(),
    }
}

fn setup_log4rs(log_file: &str) {
    LOG4RS_INIT.call_once(|| {
        let logfile = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S%.3f)} {l} {m}{n}")))
            .append(true)
            .build(log_file)
            .unwrap();
        let config = Config::builder()
            .appender(Appender::builder().build("logfile", Box::new(logfile)))
            .build(Root::builder().appender("logfile").build(LevelFilter::Info))
            .unwrap();
        log4rs::init_config(config).unwrap();
    });
}

fn file_logger(dir: &std::path::Path) -> LoggerCore {
    let logger = LoggerCore::new("bench");
    logger.set_outputs(true, false);
    logger.set_auto_flush(false);
    logger.set_log_file(dir.join("bench"), 5, 64 * 1024 * 1024);
    logger.set_pattern("%Y-%m-%d %H:%M:%S.%e %l %v");
    logger.start(false);
    logger.promote();
    logger
}

fn bench_filtered_out(c: &mut Criterion) {
    let logger = LoggerCore::new("filtered");
    logger.set_outputs(false, false);
    logger.set_level(Level::Error);
    logger.start(false);

    c.bench_function("filtered_debug_call", |b| {
        b.iter(|| log_debug!(logger, "never rendered {}", black_box(1)))
    });
}

fn bench_logging_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("Logging Comparison");
    group.sample_size(10);

    // log4rs initializes once per process; its file outlives every iteration
    let log4rs_dir = tempdir().unwrap();
    let log4rs_file = log4rs_dir.path().join("log4rs.log");
    setup_log4rs(log4rs_file.to_str().unwrap());

    group.bench_function("rolling_vs_log4rs", |b| {
        b.iter(|| {
            let dir = tempdir().unwrap();
            let event = test_event();

            let logger = file_logger(dir.path());
            let rolling_start = Instant::now();
            for i in 0..ITERATIONS {
                log_info!(logger, "Test perf: iteration={}, event={}", i, event);
            }
            logger.flush();
            let rolling_duration = rolling_start.elapsed();

            let log4rs_start = Instant::now();
            for i in 0..ITERATIONS {
                info!("Test perf: iteration={}, event={}", i, event);
            }
            log::logger().flush();
            let log4rs_duration = log4rs_start.elapsed();

            println!("\nPerformance comparison ({} iterations):", ITERATIONS);
            println!("rolling_logger: {:?}", rolling_duration);
            println!("log4rs:         {:?}", log4rs_duration);
            println!(
                "Ratio: {:.2}x",
                log4rs_duration.as_secs_f64() / rolling_duration.as_secs_f64()
            );

            black_box((rolling_duration, log4rs_duration))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_filtered_out, bench_logging_comparison);
criterion_main!(benches);

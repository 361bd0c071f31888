use std::fs::OpenOptions;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE: &str = "pipeline.log";

/// Console logging plus a daily-rotated `pipeline.log` under `log_dir`.
///
/// `tracing_appender::rolling::daily` panics if it cannot create its file, so the directory
/// is probed first and file logging is dropped when it is not writable. Keep the returned
/// guard alive for the life of the process or buffered lines are lost.
pub fn init_logging(log_dir: &Path) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mlb_watchability=debug"));

    let mut guard = None;
    let file_layer = if log_dir_writable(log_dir) {
        let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
    } else {
        eprintln!(
            "Warning: could not write to log directory {}, file logging disabled",
            log_dir.display()
        );
        None
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
    guard
}

fn log_dir_writable(log_dir: &Path) -> bool {
    if std::fs::create_dir_all(log_dir).is_err() {
        return false;
    }
    let probe = log_dir.join(".write_test");
    match OpenOptions::new().create(true).append(true).open(&probe) {
        Ok(_) => {
            let _ = std::fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}

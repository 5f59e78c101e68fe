use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "pictogram-backend.log";

/// Holds the background writer for the rolling log file. Pending lines are
/// flushed when it is dropped, so `main` keeps it until shutdown.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Installs the global subscriber: `RUST_LOG`-style filtering, stdout, and a
/// daily log file under `config.log_dir` when file logs are enabled.
///
/// If the log directory cannot be created, logging continues on stdout only.
pub fn init_tracing(config: &Config) -> Option<FileLogGuard> {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true));

    if !config.file_logs {
        registry.init();
        return None;
    }

    if let Err(err) = std::fs::create_dir_all(&config.log_dir) {
        registry.init();
        tracing::warn!(
            dir = %config.log_dir.display(),
            error = %err,
            "file logging disabled, log directory unavailable"
        );
        return None;
    }

    let appender = RollingFileAppender::new(Rotation::DAILY, &config.log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    registry
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
        .init();

    Some(FileLogGuard { _guard: guard })
}

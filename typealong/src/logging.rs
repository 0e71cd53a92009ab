use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

const LOG_FILE: &str = "typealong.log";

/// True when logging was asked for in the settings or through `RUST_LOG`
pub fn is_enabled(config: &Config) -> bool {
    config.settings.log.enabled || std::env::var_os(EnvFilter::DEFAULT_ENV).is_some()
}

/// Log to a file, since the terminal belongs to the typing screen.
///
/// The returned guard flushes the log when dropped. `None` means logging is off or could not be
/// set up.
pub fn init(config: &Config) -> Option<WorkerGuard> {
    if !is_enabled(config) {
        return None;
    }

    let directory = config.log_dir();
    std::fs::create_dir_all(&directory).ok()?;
    init_in(&directory)
}

fn init_in(directory: &Path) -> Option<WorkerGuard> {
    let appender = tracing_appender::rolling::never(directory, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    tracing::info!(directory = %directory.display(), "logging started");
    Some(guard)
}

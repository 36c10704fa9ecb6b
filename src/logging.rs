// File-backed structured logging
//
// The terminal is owned by the UI, so log output goes to a daily-rolling
// NDJSON file under the config directory. Level control via RUST_LOG.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global logger. The returned guard must stay alive for the
/// duration of the program or buffered log lines are lost.
pub fn init<P: AsRef<Path>>(log_dir: P) -> WorkerGuard {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "lexchat.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(writer).with_ansi(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init();

    guard
}

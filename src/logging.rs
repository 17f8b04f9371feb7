use std::path::{Path, PathBuf};

/// Default log directory in the user config folder
pub fn default_log_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("FtgSoundCues").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Install the global tracing subscriber
///
/// Logs go to a daily-rotated file in `log_dir`; debug builds also log to the
/// console. `RUST_LOG` takes precedence over `level`.
pub fn initialize_tracing(log_dir: &Path, level: &str) {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Create log directory if it doesn't exist
    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(log_dir, "ftg-sound-cues.log");

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    // In debug builds, also log to console
    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();
    }

    tracing::info!("Log directory: {}", log_dir.display());
}

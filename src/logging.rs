/// Tracing setup
///
/// Logs are written to `<data dir>/identity-wizard/logs/identity-wizard.YYYY-MM-DD.log`
/// with daily rotation. Debug builds also log to the console.
///
/// The filter comes from `RUST_LOG` and defaults to `info`.

use std::path::PathBuf;

use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_FILE_PREFIX: &str = "identity-wizard.log";

/// Directory the rolling log files go to
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("identity-wizard").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Call once, at startup.
pub fn initialize_tracing() {
    let log_dir = log_dir();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_layer = fmt::layer()
        .with_writer(rolling::daily(&log_dir, LOG_FILE_PREFIX))
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(env_filter("info"))
            .with(file_layer)
            .with(console_layer)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(env_filter("info"))
            .with(file_layer)
            .init();
    }

    tracing::info!("Log directory: {}", log_dir.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_is_app_scoped() {
        let dir = log_dir();
        assert!(dir.ends_with("logs"));
    }

    #[test]
    fn test_env_filter_falls_back() {
        let filter = env_filter("not a [valid filter");
        // Either RUST_LOG or the warn fallback; building must not panic
        let _ = filter.to_string();
    }
}

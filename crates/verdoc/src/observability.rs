//! Observability setup: structured logging.
//!
//! **Important**: This module never writes to stdout, which is reserved
//! for command output (`--json` results in particular). Human-readable
//! events go to stderr; when a log directory is configured, JSONL events
//! additionally go to a file.

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const ENV_LOG_DIR: &str = "VERDOC_LOG_DIR";
const LOG_FILE: &str = concat!(env!("CARGO_PKG_NAME"), ".jsonl");

/// Guard that must be held for the lifetime of the application to ensure
/// buffered log lines are flushed on exit.
pub struct ObservabilityGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Resolve the log directory: `VERDOC_LOG_DIR` wins over the config value.
pub fn resolve_log_dir(from_config: Option<Utf8PathBuf>) -> Option<Utf8PathBuf> {
    std::env::var(ENV_LOG_DIR)
        .ok()
        .map(Utf8PathBuf::from)
        .or(from_config)
}

/// Initialize logging.
///
/// Returns a guard that must be held for the application lifetime.
pub fn init_observability(
    log_dir: Option<&Utf8Path>,
    env_filter: EnvFilter,
) -> Result<ObservabilityGuard> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    if let Some(dir) = log_dir {
        std::fs::create_dir_all(dir)?;
        let appender = tracing_appender::rolling::never(dir, LOG_FILE);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let file_layer = tracing_subscriber::fmt::layer().json().with_writer(writer);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();

        tracing::debug!(%dir, "observability initialized with file logging");
        Ok(ObservabilityGuard {
            _file_guard: Some(guard),
        })
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();

        tracing::debug!("observability initialized");
        Ok(ObservabilityGuard { _file_guard: None })
    }
}

/// Build an `EnvFilter` based on CLI flags and environment.
///
/// Priority: quiet flag > verbose flag > RUST_LOG env > default_level
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }

    if verbose > 0 {
        let level = match verbose {
            1 => "debug",
            _ => "trace",
        };
        return EnvFilter::new(level);
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_wins_over_verbose() {
        let filter = env_filter(true, 2, "info");
        assert_eq!(filter.to_string(), "error");
    }

    #[test]
    fn verbose_levels() {
        assert_eq!(env_filter(false, 1, "info").to_string(), "debug");
        assert_eq!(env_filter(false, 2, "info").to_string(), "trace");
    }

    #[test]
    fn resolve_log_dir_prefers_config_when_env_unset() {
        // Not setting the env var here: tests run in parallel and the
        // variable is process-global.
        if std::env::var(ENV_LOG_DIR).is_err() {
            let dir = resolve_log_dir(Some(Utf8PathBuf::from("/tmp/logs")));
            assert_eq!(dir.as_deref(), Some(Utf8Path::new("/tmp/logs")));
        }
    }
}

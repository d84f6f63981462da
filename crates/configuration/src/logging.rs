use crate::error::ConfigError;
use crate::settings::LoggingConfig;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the tracing subscriber described by `config`.
///
/// `RUST_LOG` takes precedence over `config.level`; `verbose` raises the
/// default to `debug`. Log lines go to stdout and, when `config.file` is set,
/// to that file as well. The file writer is blocking, so no background
/// thread is started.
///
/// Both layers share one cache of formatted span fields, so colours are
/// switched off on stdout whenever a file is written too.
pub fn init_tracing(config: &LoggingConfig, verbose: bool) -> Result<(), ConfigError> {
    let default_directive = if verbose { "debug" } else { config.level.as_str() };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive).map_err(|e| {
            ConfigError::ValidationError(format!("invalid log level {default_directive:?}: {e}"))
        })?,
    };

    let file_layer = match &config.file {
        Some(path) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(file_appender(path)?),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(stdout_ansi(config)))
        .with(file_layer)
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))
}

/// `false` when a log file is configured.
fn stdout_ansi(config: &LoggingConfig) -> bool {
    config.file.is_none()
}

fn file_appender(path: &Path) -> Result<RollingFileAppender, ConfigError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| {
            ConfigError::ValidationError(format!("log file {} has no file name", path.display()))
        })?
        .to_string_lossy()
        .into_owned();
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .map_err(|e| ConfigError::Logging(e.to_string()))
}

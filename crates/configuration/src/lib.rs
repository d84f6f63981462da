use crate::error::ConfigError;
use crate::settings::Config;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    ChartConfig, DataPaths, LoggingConfig, OutputConfig, ParsingConfig, PathOverrides,
};

/// The config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "sentiment.toml";

/// Prefix of the environment variables that override file settings,
/// e.g. `SENTIMENT__DATA__TRADES_PATH`.
pub const ENV_PREFIX: &str = "SENTIMENT";

/// Loads the report configuration.
///
/// Sources are layered: built-in defaults, then the TOML file, then
/// `SENTIMENT__*` environment variables. An explicitly given file must exist;
/// the default `sentiment.toml` is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

//! Configuration error module.
//!
//! Errors raised while locating, merging and validating a `KaulaConfig`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the Kaula configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file passed to the loader does not exist.
    #[error("Kaula config file {0:?} does not exist")]
    FileNotFound(PathBuf),

    /// The file path cannot be handed to the loader because it is not UTF-8.
    #[error("Kaula config path {0:?} is not valid UTF-8")]
    NonUtf8Path(PathBuf),

    /// The file extension names none of the supported formats.
    #[error("Unsupported config format for {0:?}: expected .toml, .json, .yaml or .yml")]
    UnsupportedFormat(PathBuf),

    /// Defaults, file and environment could not be merged into a `KaulaConfig`.
    #[error("Failed to parse Kaula config: {0}")]
    ParseError(String),

    /// `log.level` is not a tracing level.
    #[error("log.level must be one of trace, debug, info, warn or error, got `{0}`")]
    InvalidLogLevel(String),

    /// A `table.*` value is outside the range the associative table accepts.
    #[error("{key} {message}")]
    ValueOutOfRange {
        /// Dotted path of the offending key, e.g. `table.table_length`
        key: &'static str,
        /// What the value must satisfy
        message: String,
    },
}

//! Configuration module for Kaula.
//!
//! This module provides a configuration system that can load settings from
//! files (TOML, YAML, JSON) and override them with environment variables.
//! All configuration values are validated for correctness before use.

use crate::error::config::ConfigError;
use config::{Config, ConfigError as ExternalConfigError, Environment, File, FileFormat};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub mod table;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Default configuration location
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "KAULA";

/// Initialize the default configuration.
///
/// This loads the default configuration file and merges it with any environment variables.
/// A missing file is not an error; built-in defaults are used instead.
///
/// # Returns
///
/// * `Ok(())` if the configuration was successfully initialized
/// * `Err(ConfigError)` if there was an error initializing the configuration
pub fn init_default_config() -> ConfigResult<()> {
    let loader = ConfigLoader::new(Some(DEFAULT_CONFIG_PATH), ENV_PREFIX);

    let config = match loader.load() {
        Ok(config) => config,
        Err(ConfigError::FileNotFound(_)) => {
            tracing::warn!(
                "Default configuration file not found at: {}",
                DEFAULT_CONFIG_PATH
            );
            KaulaConfig::default()
        }
        Err(e) => return Err(e),
    };

    init_global_config(config);

    Ok(())
}

/// A trait for types that can be validated.
pub trait Validate {
    /// Validates that the configuration is correct.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the configuration is valid
    /// * `Err(ConfigError)` if the configuration is invalid
    fn validate(&self) -> ConfigResult<()>;
}

/// Main configuration for Kaula.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct KaulaConfig {
    /// Associative table configuration
    pub table: table::TableConfig,

    /// Log configuration
    pub log: LogConfig,
}

impl Validate for KaulaConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.table.validate()?;
        self.log.validate()?;
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Whether to log in JSON format
    pub json: bool,

    /// Whether to include source code locations in logs
    pub source_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            source_location: true,
        }
    }
}

impl Validate for LogConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::InvalidLogLevel(self.level.clone())),
        }
    }
}

/// Configuration loader.
#[derive(Debug)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Optional path to the configuration file
    /// * `env_prefix` - Prefix for environment variables that override configuration values
    pub fn new<P: AsRef<Path>>(config_path: Option<P>, env_prefix: &str) -> Self {
        Self {
            config_path: config_path.map(|p| p.as_ref().to_path_buf()),
            env_prefix: env_prefix.to_string(),
        }
    }

    /// Loads the configuration from defaults, the file and environment variables,
    /// in increasing order of precedence.
    ///
    /// # Returns
    ///
    /// * `Ok(KaulaConfig)` if the configuration was loaded and validated
    /// * `Err(ConfigError)` if there was an error loading the configuration
    pub fn load(&self) -> ConfigResult<KaulaConfig> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&KaulaConfig::default())
                .map_err(|e| ConfigError::ParseError(e.to_string()))?,
        );

        if let Some(path) = &self.config_path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }

            let name = path
                .to_str()
                .ok_or_else(|| ConfigError::NonUtf8Path(path.clone()))?;

            let format = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => FileFormat::Toml,
                Some("json") => FileFormat::Json,
                Some("yaml" | "yml") => FileFormat::Yaml,
                _ => return Err(ConfigError::UnsupportedFormat(path.clone())),
            };
            builder = builder.add_source(File::with_name(name).format(format));
        }

        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(map_external_error)?;

        let kaula_config: KaulaConfig = config
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        kaula_config.validate()?;

        Ok(kaula_config)
    }
}

fn map_external_error(error: ExternalConfigError) -> ConfigError {
    match error {
        ExternalConfigError::NotFound(path) => ConfigError::FileNotFound(PathBuf::from(path)),
        ExternalConfigError::PathParse(path) => {
            ConfigError::ParseError(format!("Invalid path: {path:?}"))
        }
        ExternalConfigError::FileParse { .. } => {
            ConfigError::ParseError("Error parsing config file".to_string())
        }
        ExternalConfigError::Foreign(err) => ConfigError::ParseError(err.to_string()),
        ExternalConfigError::Frozen => {
            ConfigError::ParseError("Configuration is frozen".to_string())
        }
        ExternalConfigError::Message(msg) => ConfigError::ParseError(msg),
        ExternalConfigError::Type { .. } => {
            ConfigError::ParseError("Type conversion error".to_string())
        }
    }
}

/// Global configuration accessor.
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    config: Arc<KaulaConfig>,
}

impl GlobalConfig {
    /// Creates a new global configuration.
    pub fn new(config: KaulaConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration.
    pub fn get(&self) -> &KaulaConfig {
        &self.config
    }
}

/// Process-wide configuration.
static GLOBAL_CONFIG: OnceCell<Mutex<GlobalConfig>> = OnceCell::new();

/// Initialize the global configuration.
///
/// Only the first call has an effect; later calls are logged and ignored.
pub fn init_global_config(config: KaulaConfig) {
    if GLOBAL_CONFIG
        .set(Mutex::new(GlobalConfig::new(config)))
        .is_err()
    {
        tracing::warn!("Global configuration was already initialized, ignoring new configuration");
    }
}

/// Get the global configuration.
///
/// # Returns
///
/// The global configuration, or `None` if it has not been initialized.
pub fn get_global_config() -> Option<GlobalConfig> {
    let mutex = GLOBAL_CONFIG.get()?;

    let guard = mutex.lock().unwrap_or_else(|poisoned| {
        tracing::error!("Global config lock was poisoned, recovering");
        poisoned.into_inner()
    });

    Some(guard.clone())
}

//! Configuration Loader
//!
//! Environment-aware loading: base YAML file, per-environment overlay, then
//! `SETTLE__` environment variables.

use super::error::{ConfigResult, ConfigurationError};
use super::SettleConfig;
use config::{Config, Environment, File, FileFormat};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const BASE_FILE_STEM: &str = "settle";
const ENV_PREFIX: &str = "SETTLE";
const ENV_SEPARATOR: &str = "__";

/// Loaded configuration plus where it came from
#[derive(Debug)]
pub struct ConfigManager {
    config: SettleConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    ///
    /// When no directory is given and the default one does not exist, built-in
    /// defaults plus environment variables are used.
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        Self::load_with_env_source(config_dir, environment, None)
    }

    /// Same as [`Self::load_from_directory_with_env`], but environment variables are
    /// read from `env_source` instead of the process environment when provided.
    pub fn load_with_env_source(
        config_dir: Option<PathBuf>,
        environment: &str,
        env_source: Option<config::Map<String, String>>,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let explicit = config_dir.is_some();
        let config_directory = config_dir.unwrap_or_else(Self::default_config_directory);

        if explicit && !config_directory.is_dir() {
            return Err(ConfigurationError::DirectoryNotFound {
                path: config_directory,
            });
        }

        debug!(
            environment = %environment,
            config_directory = %config_directory.display(),
            "Loading settle configuration"
        );

        let config = Self::load_and_merge_config(&config_directory, environment, env_source)?;
        config.validate()?;

        info!(
            environment = %environment,
            max_retries = config.retry.max_retries,
            retry_delay_ms = config.retry.retry_delay_ms,
            poll_timeout_ms = config.polling.timeout_ms,
            poll_interval_ms = config.polling.poll_interval_ms,
            "⚙️ Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    fn load_and_merge_config(
        config_directory: &Path,
        environment: &str,
        env_source: Option<config::Map<String, String>>,
    ) -> ConfigResult<SettleConfig> {
        let base_path = config_directory.join(format!("{BASE_FILE_STEM}.yaml"));
        let env_path = config_directory.join(format!("{BASE_FILE_STEM}.{environment}.yaml"));

        let built = Config::builder()
            .add_source(File::from(base_path).format(FileFormat::Yaml).required(false))
            .add_source(File::from(env_path).format(FileFormat::Yaml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .source(env_source),
            )
            .build()
            .map_err(|e| ConfigurationError::load(environment, e))?;

        built
            .try_deserialize::<SettleConfig>()
            .map_err(|e| ConfigurationError::load(environment, e))
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &SettleConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// Loaded configuration as JSON, for diagnostics
    pub fn debug_config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }

    /// Detect the current environment from environment variables
    pub fn detect_environment() -> String {
        env::var("SETTLE_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
    }

    fn default_config_directory() -> PathBuf {
        env::var("SETTLE_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"))
    }
}

//! Configuration errors

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Configuration directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to load configuration for environment '{environment}': {source}")]
    Load {
        environment: String,
        #[source]
        source: config::ConfigError,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigurationError {
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn load(environment: impl Into<String>, source: config::ConfigError) -> Self {
        Self::Load {
            environment: environment.into(),
            source,
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;

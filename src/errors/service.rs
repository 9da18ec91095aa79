use thiserror::Error;

use super::{ConfigValidationError, InitializationError, StoreError};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigValidationError),

    #[error("Initialization error: {0}")]
    Init(#[from] InitializationError),

    #[error("I/O error: {details}")]
    Io {
        details: String,
        #[source]
        source: std::io::Error,
    },
}

impl ServiceError {
    pub fn io(details: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            details: details.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for ServiceError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(ConfigValidationError::config(err.to_string()))
    }
}

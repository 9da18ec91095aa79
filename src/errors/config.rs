use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigValidationError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP configuration error: {0}")]
    Http(String),

    #[error("Workload configuration error: {0}")]
    Workload(String),
}

impl ConfigValidationError {
    pub fn config(details: impl Into<String>) -> Self {
        Self::Config(details.into())
    }

    pub fn http(details: impl Into<String>) -> Self {
        Self::Http(details.into())
    }

    pub fn workload(details: impl Into<String>) -> Self {
        Self::Workload(details.into())
    }
}

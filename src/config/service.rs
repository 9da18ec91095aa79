use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use config::{Config as ConfigBuilder, ConfigError, Environment, File, FileFormat};

use crate::errors::ConfigValidationError;

use super::{HttpConfig, LogConfig, StoreConfig, UpstreamConfig, WorkloadConfig};

/// Main application configuration
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Persistence store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Per-request workload configuration
    #[serde(default)]
    pub workload: WorkloadConfig,

    /// Simulated upstream call configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Default configuration directory
    pub const CONFIG_DIR: &'static str = "config";

    /// Environment variable prefix
    const ENV_PREFIX: &'static str = "REQSIM";

    /// Build configuration using the following priority (highest to lowest):
    /// 1. Environment variables (REQSIM_*)
    /// 2. Local configuration file (config/local.yaml)
    /// 3. Environment specific file (config/{env}.yaml)
    /// 4. Default configuration (config/default.yaml)
    /// 5. Built-in defaults
    pub fn new() -> Result<Self, ConfigError> {
        let environment = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        // Start with built-in defaults
        let defaults = Config::default();

        let mut builder = ConfigBuilder::builder();

        // Set defaults for each field manually
        builder = builder
            // HTTP configuration
            .set_default("http.bind_addr", defaults.http.bind_addr)?
            .set_default("http.bind_port", defaults.http.bind_port)?
            // Workload configuration
            .set_default("workload.fib_n", defaults.workload.fib_n)?
            // Upstream configuration
            .set_default(
                "upstream.delay",
                format!("{}ms", defaults.upstream.delay.as_millis()),
            )?
            // Logging configuration
            .set_default("log.level", defaults.log.level)?
            .set_default("log.include_location", defaults.log.include_location)?
            .set_default("log.thread_ids", defaults.log.thread_ids)?
            .set_default("log.thread_names", defaults.log.thread_names)?;

        let config = builder
            // Load default config file
            .add_source(
                File::new(&format!("{}/default", Self::CONFIG_DIR), FileFormat::Yaml)
                    .required(false),
            )
            // Load environment specific config
            .add_source(
                File::new(
                    &format!("{}/{}", Self::CONFIG_DIR, environment),
                    FileFormat::Yaml,
                )
                .required(false),
            )
            // Load local overrides
            .add_source(
                File::new(&format!("{}/local", Self::CONFIG_DIR), FileFormat::Yaml).required(false),
            )
            // Add environment variables
            .add_source(
                Environment::with_prefix(Self::ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Deserialize and validate
        let config: Self = config.try_deserialize()?;
        config
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let config = ConfigBuilder::builder()
            // Load the specified config file
            .add_source(File::from(path))
            // Add env vars as overrides
            .add_source(
                Environment::with_prefix(Self::ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.http.bind_addr.is_empty() {
            return Err(ConfigValidationError::http(
                "HTTP bind address must not be empty",
            ));
        }
        if self.http.bind_port == 0 {
            return Err(ConfigValidationError::http("HTTP port must be non-zero"));
        }

        // fibonacci(94) overflows u64
        if self.workload.fib_n > 93 {
            return Err(ConfigValidationError::workload(
                "fib_n must be at most 93 to fit in a 64-bit result",
            ));
        }

        Ok(())
    }
}

//! Configuration module with sub-modules per concern
//!
//! - `verification` - Code generation, lifetime, queueing and test bypass
//! - `database` - MySQL connection and pool configuration
//! - `cache` - Redis configuration for delivery queues
//! - `mail` - Notification transport configuration
//! - `environment` - Environment detection and logging configuration

pub mod cache;
pub mod database;
pub mod environment;
pub mod mail;
pub mod verification;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use mail::MailConfig;
pub use verification::{CodeCharset, VerificationConfig, DEFAULT_NOTIFICATION};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Verification code configuration
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Redis configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Mail transport configuration
    #[serde(default)]
    pub mail: MailConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            verification: VerificationConfig::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            mail: MailConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let mut logging = LoggingConfig::for_environment(environment);
        if let Ok(level) = std::env::var("RUST_LOG") {
            logging.level = level;
        }

        Self {
            environment,
            verification: VerificationConfig::from_env(),
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            mail: MailConfig::from_env(),
            logging,
        }
    }
}

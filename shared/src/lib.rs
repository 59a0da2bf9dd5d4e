//! Shared settings and utilities for the verification code workspace
//!
//! This crate provides common functionality used across all workspace members:
//! - Configuration types (verification, database, cache, mail, logging)
//! - Utility functions for handling verifiables (masking, shape checks)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, CodeCharset, DatabaseConfig, Environment, LogFormat, LoggingConfig,
    MailConfig, VerificationConfig,
};
pub use utils::verifiable;

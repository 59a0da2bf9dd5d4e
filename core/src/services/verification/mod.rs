//! Verification code workflow
//!
//! This module provides:
//! - Code generation from a configured charset
//! - Issuing codes: invalidate previous codes, persist, dispatch a notification
//! - Verifying codes: expiry and single-use checks against storage
//! - A test bypass for configured verifiables
//! - Periodic cleanup of expired codes

mod cleanup;
mod config;
mod generator;
mod issuer;
mod notification;
mod service;
mod traits;
mod types;
mod verifier;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, CodeCleanupConfig, CodeCleanupService};
pub use config::VerificationServiceConfig;
pub use generator::CodeGenerator;
pub use issuer::CodeIssuer;
pub use notification::{
    NotificationContent, NotificationRegistry, ResolvedNotification, VerificationCodeCreated,
    VerificationCodeNotification,
};
pub use service::VerificationService;
pub use traits::NotificationDispatcher;
pub use types::SendCodeResult;
pub use verifier::CodeVerifier;

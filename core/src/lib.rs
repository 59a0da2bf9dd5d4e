//! # Verification Code Core
//!
//! Domain layer for issuing and verifying short-lived verification codes.
//! This crate contains the verification code entity, the repository interface,
//! the notification capability, and the issuer/verifier services built on them.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;

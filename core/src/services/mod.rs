//! Business services containing the issue and verify use cases.

pub mod verification;

// Re-export commonly used types
pub use verification::{
    CleanupResult, CodeCleanupConfig, CodeCleanupService, CodeGenerator, CodeIssuer,
    CodeVerifier, NotificationContent, NotificationDispatcher, NotificationRegistry,
    SendCodeResult, VerificationCodeCreated, VerificationCodeNotification, VerificationService,
    VerificationServiceConfig,
};

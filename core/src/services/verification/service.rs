//! Verification service combining the issuer and the verifier

use std::sync::Arc;

use crate::errors::DomainResult;
use crate::repositories::VerificationCodeRepository;

use super::config::VerificationServiceConfig;
use super::issuer::CodeIssuer;
use super::notification::NotificationRegistry;
use super::traits::NotificationDispatcher;
use super::types::SendCodeResult;
use super::verifier::CodeVerifier;

/// Entry point for sending and verifying codes
///
/// Owns one [`CodeIssuer`] and one [`CodeVerifier`] sharing the same
/// repository and configuration.
pub struct VerificationService<R, D>
where
    R: VerificationCodeRepository + ?Sized,
    D: NotificationDispatcher + ?Sized,
{
    issuer: CodeIssuer<R, D>,
    verifier: CodeVerifier<R>,
}

impl<R, D> VerificationService<R, D>
where
    R: VerificationCodeRepository + ?Sized,
    D: NotificationDispatcher + ?Sized,
{
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `repository` - Storage for issued codes
    /// * `dispatcher` - Delivery mechanism for notifications
    /// * `notifications` - Registry the configured notification is resolved from
    /// * `config` - Service configuration
    pub fn new(
        repository: Arc<R>,
        dispatcher: Arc<D>,
        notifications: NotificationRegistry,
        config: VerificationServiceConfig,
    ) -> Self {
        let config = Arc::new(config);
        let issuer = CodeIssuer::new(
            Arc::clone(&repository),
            dispatcher,
            Arc::new(notifications),
            Arc::clone(&config),
        );
        let verifier = CodeVerifier::new(repository, config);

        Self { issuer, verifier }
    }

    /// Send a new code to a verifiable, see [`CodeIssuer::send`]
    pub async fn send(&self, verifiable: &str) -> DomainResult<SendCodeResult> {
        self.issuer.send(verifiable).await
    }

    /// Verify a submitted code, see [`CodeVerifier::verify`]
    pub async fn verify(&self, code: &str, verifiable: &str) -> DomainResult<bool> {
        self.verifier.verify(code, verifiable).await
    }

    pub fn issuer(&self) -> &CodeIssuer<R, D> {
        &self.issuer
    }

    pub fn verifier(&self) -> &CodeVerifier<R> {
        &self.verifier
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        self.verifier.config()
    }
}

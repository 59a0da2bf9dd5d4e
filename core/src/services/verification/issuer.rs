//! Issuing verification codes

use chrono::Utc;
use std::sync::Arc;

use vc_shared::utils::mask_verifiable;

use crate::domain::entities::verification_code::NewVerificationCode;
use crate::errors::DomainResult;
use crate::repositories::VerificationCodeRepository;

use super::config::VerificationServiceConfig;
use super::generator::CodeGenerator;
use super::notification::NotificationRegistry;
use super::traits::NotificationDispatcher;
use super::types::SendCodeResult;

/// Generates, stores and dispatches verification codes
pub struct CodeIssuer<R, D>
where
    R: VerificationCodeRepository + ?Sized,
    D: NotificationDispatcher + ?Sized,
{
    repository: Arc<R>,
    dispatcher: Arc<D>,
    notifications: Arc<NotificationRegistry>,
    config: Arc<VerificationServiceConfig>,
    generator: CodeGenerator,
}

impl<R, D> CodeIssuer<R, D>
where
    R: VerificationCodeRepository + ?Sized,
    D: NotificationDispatcher + ?Sized,
{
    /// Create a new issuer
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
        notifications: Arc<NotificationRegistry>,
        config: Arc<VerificationServiceConfig>,
    ) -> Self {
        let generator = CodeGenerator::new(config.code_length, config.charset);
        Self {
            repository,
            dispatcher,
            notifications,
            config,
            generator,
        }
    }

    /// Send a new verification code to a verifiable
    ///
    /// This method:
    /// 1. Returns immediately for test verifiables
    /// 2. Resolves the configured notification
    /// 3. Generates a new code
    /// 4. Deletes every previous code of the verifiable
    /// 5. Stores the new code
    /// 6. Dispatches the notification, deferred to the configured queue if any
    ///
    /// # Returns
    ///
    /// * `Ok(SendCodeResult)` - The issued code, or `TestBypass`
    /// * `Err(DomainError::Configuration)` - The configured notification is not
    ///   registered; storage is left untouched
    /// * `Err(DomainError)` - Storage or dispatch failed
    pub async fn send(&self, verifiable: &str) -> DomainResult<SendCodeResult> {
        if self.config.is_test_verifiable(verifiable) {
            tracing::info!(
                verifiable = %mask_verifiable(verifiable),
                event = "verification_code_test_bypass",
                "Skipping issuance for test verifiable"
            );
            return Ok(SendCodeResult::TestBypass);
        }

        let notification = self
            .notifications
            .resolve(&self.config.notification)
            .map_err(|e| {
                tracing::error!(
                    notification = %self.config.notification,
                    error = %e,
                    event = "invalid_notification",
                    "Configured notification cannot carry a verification code"
                );
                e
            })?;

        let code = self.generator.generate();

        let invalidated = self.repository.delete_for_verifiable(verifiable).await?;
        tracing::debug!(
            verifiable = %mask_verifiable(verifiable),
            invalidated,
            event = "previous_codes_invalidated",
            "Invalidated previous verification codes"
        );

        let verification_code = self
            .repository
            .insert(NewVerificationCode {
                verifiable: verifiable.to_string(),
                code: code.clone(),
                expires_at: Utc::now() + self.config.code_lifetime,
            })
            .await?;

        tracing::info!(
            verifiable = %mask_verifiable(verifiable),
            id = %verification_code.id,
            expires_at = %verification_code.expires_at,
            event = "verification_code_issued",
            "Issued verification code"
        );

        let queue = self.config.delivery_queue().map(str::to_string);
        let notification = notification.build(code, queue);

        self.dispatcher
            .dispatch(verifiable, notification.as_ref())
            .await
            .map_err(|e| {
                tracing::error!(
                    verifiable = %mask_verifiable(verifiable),
                    error = %e,
                    event = "notification_dispatch_failed",
                    "Failed to dispatch verification code notification"
                );
                e
            })?;

        tracing::debug!(
            verifiable = %mask_verifiable(verifiable),
            notification = notification.name(),
            queue = notification.queue().unwrap_or("sync"),
            event = "notification_dispatched",
            "Dispatched verification code notification"
        );

        Ok(SendCodeResult::Issued { verification_code })
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }
}

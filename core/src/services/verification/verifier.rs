//! Verifying submitted codes

use chrono::Utc;
use constant_time_eq::constant_time_eq;
use std::sync::Arc;

use vc_shared::utils::mask_verifiable;

use crate::errors::DomainResult;
use crate::repositories::VerificationCodeRepository;

use super::config::VerificationServiceConfig;

/// Checks submitted codes against storage and consumes them on success
pub struct CodeVerifier<R>
where
    R: VerificationCodeRepository + ?Sized,
{
    repository: Arc<R>,
    config: Arc<VerificationServiceConfig>,
}

impl<R> CodeVerifier<R>
where
    R: VerificationCodeRepository + ?Sized,
{
    pub fn new(repository: Arc<R>, config: Arc<VerificationServiceConfig>) -> Self {
        Self { repository, config }
    }

    /// Verify a code submitted for a verifiable
    ///
    /// Test verifiables are checked against the configured test code without
    /// touching storage. Everything else needs a stored, unexpired record with
    /// the exact code; that record is deleted, so a code verifies at most once.
    /// Wrong and expired codes leave storage untouched.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The code was valid and has been consumed
    /// * `Ok(false)` - No matching live code
    /// * `Err(DomainError)` - Storage failed
    pub async fn verify(&self, code: &str, verifiable: &str) -> DomainResult<bool> {
        if self.config.is_test_verifiable(verifiable) {
            let verified = Self::matches_test_code(&self.config.test_code, code);
            tracing::info!(
                verifiable = %mask_verifiable(verifiable),
                verified,
                event = "verification_code_test_bypass",
                "Checked code for test verifiable"
            );
            return Ok(verified);
        }

        let Some(record) = self.repository.find_valid(verifiable, code, Utc::now()).await? else {
            tracing::warn!(
                verifiable = %mask_verifiable(verifiable),
                event = "verification_code_rejected",
                "No live verification code matched"
            );
            return Ok(false);
        };

        // A concurrent verification may have consumed the record first.
        let consumed = self.repository.delete_by_id(record.id).await?;

        if consumed {
            tracing::info!(
                verifiable = %mask_verifiable(verifiable),
                id = %record.id,
                event = "verification_code_verified",
                "Verification code verified and consumed"
            );
        } else {
            tracing::warn!(
                verifiable = %mask_verifiable(verifiable),
                id = %record.id,
                event = "verification_code_already_consumed",
                "Verification code was consumed by a concurrent request"
            );
        }

        Ok(consumed)
    }

    /// An empty test code never matches, not even an empty submission
    fn matches_test_code(test_code: &str, submitted: &str) -> bool {
        !test_code.is_empty() && constant_time_eq(test_code.as_bytes(), submitted.as_bytes())
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }
}

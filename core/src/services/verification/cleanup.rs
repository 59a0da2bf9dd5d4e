//! Cleanup service for expired verification codes
//!
//! The verifier never deletes expired codes; this service removes them on a
//! schedule or on demand.

use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::VerificationCodeRepository;

/// Configuration for the cleanup service
#[derive(Debug, Clone)]
pub struct CodeCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for CodeCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            enabled: true,
        }
    }
}

/// Service deleting expired verification codes
pub struct CodeCleanupService<R: VerificationCodeRepository + ?Sized + 'static> {
    repository: Arc<R>,
    config: CodeCleanupConfig,
}

impl<R: VerificationCodeRepository + ?Sized + 'static> CodeCleanupService<R> {
    pub fn new(repository: Arc<R>, config: CodeCleanupConfig) -> Self {
        Self { repository, config }
    }

    /// Run a single cleanup cycle
    ///
    /// # Returns
    /// * `Ok(CleanupResult)` - Summary of the cycle
    /// * `Err(DomainError)` - If the repository failed
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let expired_codes_deleted = self.repository.delete_expired(Utc::now()).await?;

        if expired_codes_deleted > 0 {
            info!(
                expired_codes_deleted,
                event = "expired_codes_deleted",
                "Deleted expired verification codes"
            );
        }

        Ok(CleanupResult {
            expired_codes_deleted,
        })
    }

    /// Start the cleanup service as a background task
    ///
    /// Returns `None` when cleanup is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Verification code cleanup service is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                "Verification code cleanup started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_cleanup().await {
                    error!("Verification code cleanup cycle failed: {}", e);
                }
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupResult {
    /// Number of expired codes deleted
    pub expired_codes_deleted: u64,
}

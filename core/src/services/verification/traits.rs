//! Trait for handing notifications to a delivery mechanism

use async_trait::async_trait;

use crate::errors::DomainError;

use super::notification::VerificationCodeNotification;

/// Delivers a verification code notification to a verifiable
///
/// Implementations decide how `notification.queue()` is honoured: a queue name
/// defers delivery to that queue, `None` delivers inline.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(
        &self,
        verifiable: &str,
        notification: &dyn VerificationCodeNotification,
    ) -> Result<(), DomainError>;
}

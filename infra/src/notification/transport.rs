//! Notification transport interface

use async_trait::async_trait;

use super::envelope::DeliveryEnvelope;
use crate::InfrastructureError;

/// Delivers a rendered notification to its destination
///
/// Implementations include:
/// - [`LogTransport`](super::LogTransport) for development
/// - [`MailApiTransport`](super::MailApiTransport) for an HTTP mail API
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    /// Deliver an envelope
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Identifier of the delivered message
    /// * `Err(InfrastructureError)` - If delivery fails
    async fn deliver(&self, envelope: &DeliveryEnvelope) -> Result<String, InfrastructureError>;

    /// Name of the provider behind the transport
    fn provider_name(&self) -> &str;

    /// Check if the transport is available
    async fn is_available(&self) -> bool {
        true
    }
}

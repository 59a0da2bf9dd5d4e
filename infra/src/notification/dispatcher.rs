//! Dispatcher honouring the notification's queue

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use vc_core::{DomainError, NotificationDispatcher, VerificationCodeNotification};
use vc_shared::utils::mask_verifiable;

use super::envelope::DeliveryEnvelope;
use super::queue::DeliveryQueue;
use super::transport::NotificationTransport;

/// Delivers inline, or defers to a named queue when the notification has one
pub struct QueueingDispatcher<T, Q>
where
    T: NotificationTransport + ?Sized,
    Q: DeliveryQueue + ?Sized,
{
    transport: Arc<T>,
    queue: Arc<Q>,
}

impl<T, Q> QueueingDispatcher<T, Q>
where
    T: NotificationTransport + ?Sized,
    Q: DeliveryQueue + ?Sized,
{
    pub fn new(transport: Arc<T>, queue: Arc<Q>) -> Self {
        Self { transport, queue }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn queue(&self) -> &Arc<Q> {
        &self.queue
    }
}

#[async_trait]
impl<T, Q> NotificationDispatcher for QueueingDispatcher<T, Q>
where
    T: NotificationTransport + ?Sized,
    Q: DeliveryQueue + ?Sized,
{
    async fn dispatch(
        &self,
        verifiable: &str,
        notification: &dyn VerificationCodeNotification,
    ) -> Result<(), DomainError> {
        let envelope = DeliveryEnvelope::from_notification(verifiable, notification);

        match envelope.queue.as_deref() {
            Some(queue) => {
                self.queue.push(queue, &envelope).await?;
                info!(
                    verifiable = %mask_verifiable(verifiable),
                    queue,
                    envelope_id = %envelope.id,
                    event = "notification_queued",
                    "Queued verification code notification"
                );
            }
            None => {
                let message_id = self.transport.deliver(&envelope).await?;
                debug!(
                    verifiable = %mask_verifiable(verifiable),
                    provider = self.transport.provider_name(),
                    message_id = %message_id,
                    event = "notification_delivered",
                    "Delivered verification code notification"
                );
            }
        }

        Ok(())
    }
}

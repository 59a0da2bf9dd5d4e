//! Worker draining a named delivery queue

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use vc_shared::utils::mask_verifiable;

use super::queue::DeliveryQueue;
use super::transport::NotificationTransport;
use crate::InfrastructureError;

/// Configuration for the queue worker
#[derive(Debug, Clone)]
pub struct QueueWorkerConfig {
    /// Pause between polls of an empty queue (in milliseconds)
    pub poll_interval_ms: u64,
    /// Delivery attempts per envelope before it is dropped
    pub max_attempts: u32,
}

impl Default for QueueWorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            max_attempts: 3,
        }
    }
}

/// Delivers envelopes queued under one name
pub struct QueueWorker<T, Q>
where
    T: NotificationTransport + ?Sized,
    Q: DeliveryQueue + ?Sized,
{
    transport: Arc<T>,
    queue: Arc<Q>,
    queue_name: String,
    config: QueueWorkerConfig,
}

impl<T, Q> QueueWorker<T, Q>
where
    T: NotificationTransport + ?Sized + 'static,
    Q: DeliveryQueue + ?Sized + 'static,
{
    pub fn new(
        transport: Arc<T>,
        queue: Arc<Q>,
        queue_name: impl Into<String>,
        config: QueueWorkerConfig,
    ) -> Self {
        Self {
            transport,
            queue,
            queue_name: queue_name.into(),
            config,
        }
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// Deliver the oldest queued envelope
    ///
    /// A failed delivery is pushed back with its attempt count incremented,
    /// until `max_attempts` is reached and the envelope is dropped.
    ///
    /// # Returns
    /// * `Ok(true)` - An envelope was taken from the queue
    /// * `Ok(false)` - The queue was empty
    /// * `Err(InfrastructureError)` - The queue backend failed
    pub async fn run_once(&self) -> Result<bool, InfrastructureError> {
        let Some(mut envelope) = self.queue.pop(&self.queue_name).await? else {
            return Ok(false);
        };

        match self.transport.deliver(&envelope).await {
            Ok(message_id) => {
                debug!(
                    queue = %self.queue_name,
                    envelope_id = %envelope.id,
                    message_id = %message_id,
                    event = "notification_delivered",
                    "Delivered queued notification"
                );
            }
            Err(e) => {
                envelope.attempts += 1;
                if envelope.attempts < self.config.max_attempts {
                    warn!(
                        queue = %self.queue_name,
                        envelope_id = %envelope.id,
                        attempts = envelope.attempts,
                        error = %e,
                        event = "notification_requeued",
                        "Delivery failed, requeueing notification"
                    );
                    self.queue.push(&self.queue_name, &envelope).await?;
                } else {
                    error!(
                        queue = %self.queue_name,
                        envelope_id = %envelope.id,
                        verifiable = %mask_verifiable(&envelope.verifiable),
                        attempts = envelope.attempts,
                        error = %e,
                        event = "notification_dropped",
                        "Delivery failed permanently, dropping notification"
                    );
                }
            }
        }

        Ok(true)
    }

    /// Process envelopes until the queue is empty
    ///
    /// Requeued envelopes are retried in the same run, so this terminates
    /// once every envelope is delivered or dropped.
    ///
    /// # Returns
    /// The number of envelopes taken from the queue
    pub async fn run_until_empty(&self) -> Result<u64, InfrastructureError> {
        let mut processed = 0;
        while self.run_once().await? {
            processed += 1;
        }
        Ok(processed)
    }

    /// Start the worker as a background task polling the queue
    pub fn start_background_task(self: Arc<Self>) -> JoinHandle<()> {
        let interval = Duration::from_millis(self.config.poll_interval_ms);

        tokio::spawn(async move {
            info!(
                queue = %self.queue_name,
                "Delivery queue worker started - polling every {}ms",
                self.config.poll_interval_ms
            );

            loop {
                match self.run_until_empty().await {
                    Ok(processed) if processed > 0 => {
                        debug!(queue = %self.queue_name, processed, "Drained delivery queue");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!(
                            queue = %self.queue_name,
                            error = %e,
                            "Delivery queue worker cycle failed"
                        );
                    }
                }
                tokio::time::sleep(interval).await;
            }
        })
    }
}

//! Redis-backed delivery queues
//!
//! Each named queue is a Redis list at `"{prefix}:{queue}"`. Envelopes are
//! pushed with LPUSH and taken with RPOP.
//!
//! Neither command is resent after a connection failure, so delivery is at
//! most once: a pop the server applied before the connection dropped loses
//! that envelope, and a push that failed is reported to the caller.

use async_trait::async_trait;
use tracing::debug;

use crate::cache::RedisClient;
use crate::InfrastructureError;

use super::envelope::DeliveryEnvelope;
use super::queue::DeliveryQueue;

/// Delivery queue stored in Redis lists
#[derive(Clone)]
pub struct RedisDeliveryQueue {
    client: RedisClient,
}

impl RedisDeliveryQueue {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn key(&self, queue: &str) -> String {
        self.client.config().queue_key(queue)
    }
}

#[async_trait]
impl DeliveryQueue for RedisDeliveryQueue {
    async fn push(
        &self,
        queue: &str,
        envelope: &DeliveryEnvelope,
    ) -> Result<(), InfrastructureError> {
        let key = self.key(queue);
        let length = self.client.lpush(&key, &envelope.to_json()?).await?;
        debug!(queue, id = %envelope.id, length, "Pushed envelope to Redis queue");
        Ok(())
    }

    async fn pop(&self, queue: &str) -> Result<Option<DeliveryEnvelope>, InfrastructureError> {
        self.client
            .rpop(&self.key(queue))
            .await?
            .map(|json| DeliveryEnvelope::from_json(&json))
            .transpose()
    }

    async fn len(&self, queue: &str) -> Result<u64, InfrastructureError> {
        self.client.llen(&self.key(queue)).await
    }
}

//! Named delivery queues

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::envelope::DeliveryEnvelope;
use crate::InfrastructureError;

/// Backend holding envelopes until a worker delivers them
///
/// Queues are first in, first out and addressed by name.
#[async_trait]
pub trait DeliveryQueue: Send + Sync {
    /// Append an envelope to `queue`
    async fn push(
        &self,
        queue: &str,
        envelope: &DeliveryEnvelope,
    ) -> Result<(), InfrastructureError>;

    /// Take the oldest envelope from `queue`
    async fn pop(&self, queue: &str) -> Result<Option<DeliveryEnvelope>, InfrastructureError>;

    /// Number of envelopes waiting in `queue`
    async fn len(&self, queue: &str) -> Result<u64, InfrastructureError>;
}

/// In-process queue backend
#[derive(Clone, Default)]
pub struct InMemoryDeliveryQueue {
    queues: Arc<Mutex<HashMap<String, VecDeque<DeliveryEnvelope>>>>,
}

impl InMemoryDeliveryQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeliveryQueue for InMemoryDeliveryQueue {
    async fn push(
        &self,
        queue: &str,
        envelope: &DeliveryEnvelope,
    ) -> Result<(), InfrastructureError> {
        self.queues
            .lock()
            .await
            .entry(queue.to_string())
            .or_default()
            .push_back(envelope.clone());
        Ok(())
    }

    async fn pop(&self, queue: &str) -> Result<Option<DeliveryEnvelope>, InfrastructureError> {
        Ok(self
            .queues
            .lock()
            .await
            .get_mut(queue)
            .and_then(VecDeque::pop_front))
    }

    async fn len(&self, queue: &str) -> Result<u64, InfrastructureError> {
        Ok(self
            .queues
            .lock()
            .await
            .get(queue)
            .map_or(0, |q| q.len() as u64))
    }
}

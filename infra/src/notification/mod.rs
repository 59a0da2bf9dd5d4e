//! Notification delivery
//!
//! The issuer hands every notification to a [`QueueingDispatcher`]. Without a
//! queue the notification is delivered inline through a
//! [`NotificationTransport`]; with a queue it is serialized into a
//! [`DeliveryEnvelope`], pushed onto the named [`DeliveryQueue`] and delivered
//! later by a [`QueueWorker`].
//!
//! ## Transports
//!
//! - **Log**: writes deliveries to the log and console (development)
//! - **Mail API**: JSON mail API over HTTP with retries

use std::sync::Arc;

use vc_shared::config::MailConfig;

use crate::InfrastructureError;

pub mod dispatcher;
pub mod envelope;
pub mod log_transport;
pub mod mail_api;
pub mod queue;
#[cfg(feature = "redis-queue")]
pub mod redis_queue;
pub mod transport;
pub mod worker;

#[cfg(test)]
mod tests;

pub use dispatcher::QueueingDispatcher;
pub use envelope::{DeliveryContent, DeliveryEnvelope};
pub use log_transport::LogTransport;
pub use mail_api::MailApiTransport;
pub use queue::{DeliveryQueue, InMemoryDeliveryQueue};
#[cfg(feature = "redis-queue")]
pub use redis_queue::RedisDeliveryQueue;
pub use transport::NotificationTransport;
pub use worker::{QueueWorker, QueueWorkerConfig};

/// Create the transport selected by `config.provider`
///
/// # Errors
/// `InfrastructureError::Config` for an unknown provider, or for `"http"`
/// without an API URL and key.
pub fn create_transport(
    config: &MailConfig,
) -> Result<Arc<dyn NotificationTransport>, InfrastructureError> {
    match config.provider.as_str() {
        "log" => Ok(Arc::new(LogTransport::new())),
        "http" => {
            if !config.is_http_configured() {
                return Err(InfrastructureError::Config(
                    "MAIL_API_URL and MAIL_API_KEY are required for the http mail provider"
                        .to_string(),
                ));
            }
            Ok(Arc::new(MailApiTransport::new(config.clone())?))
        }
        other => Err(InfrastructureError::Config(format!(
            "Unknown mail provider: {}",
            other
        ))),
    }
}

//! Log transport
//!
//! Writes deliveries to the log instead of sending them. Meant for
//! development and tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};
use uuid::Uuid;

use vc_shared::utils::mask_verifiable;

use super::envelope::DeliveryEnvelope;
use super::transport::NotificationTransport;
use crate::InfrastructureError;

/// Transport that logs deliveries
///
/// This implementation:
/// - Logs every delivery with a masked destination, never the code
/// - Optionally prints the full message, code included, to the console
/// - Optionally keeps the delivered envelopes for inspection
/// - Can simulate failures
///
/// [`LogTransport::new`] enables neither console output nor history.
#[derive(Clone)]
pub struct LogTransport {
    /// Counter for tracking number of messages delivered
    message_count: Arc<AtomicU64>,
    /// Envelopes delivered so far; `None` unless recording
    delivered: Option<Arc<Mutex<Vec<DeliveryEnvelope>>>>,
    /// Whether to simulate failures
    simulate_failure: bool,
    /// Whether to print messages to console
    console_output: bool,
}

impl LogTransport {
    pub fn new() -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            delivered: None,
            simulate_failure: false,
            console_output: false,
        }
    }

    /// Create a transport that keeps every delivered envelope
    pub fn recording() -> Self {
        Self {
            delivered: Some(Arc::new(Mutex::new(Vec::new()))),
            ..Self::new()
        }
    }

    /// Print each message, code included, to stdout
    pub fn with_console_output(mut self, enabled: bool) -> Self {
        self.console_output = enabled;
        self
    }

    /// Fail every delivery
    pub fn with_simulated_failure(mut self, enabled: bool) -> Self {
        self.simulate_failure = enabled;
        self
    }

    /// Total number of messages delivered
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Envelopes delivered so far, oldest first
    ///
    /// Always empty unless the transport was created with [`LogTransport::recording`].
    pub fn delivered(&self) -> Vec<DeliveryEnvelope> {
        self.delivered
            .as_ref()
            .map(|delivered| {
                delivered
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone()
            })
            .unwrap_or_default()
    }
}

impl Default for LogTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationTransport for LogTransport {
    async fn deliver(&self, envelope: &DeliveryEnvelope) -> Result<String, InfrastructureError> {
        let destination = mask_verifiable(&envelope.verifiable);

        if self.simulate_failure {
            warn!(
                verifiable = %destination,
                "Log transport simulating delivery failure"
            );
            return Err(InfrastructureError::Delivery(
                "Simulated delivery failure".to_string(),
            ));
        }

        let message_id = format!("log_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("LOG TRANSPORT - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", destination);
            println!("Subject: {}", envelope.content.subject);
            println!("{}", envelope.content.body);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "notification_transport",
            provider = "log",
            verifiable = %destination,
            notification = %envelope.notification,
            message_id = %message_id,
            message_count = count,
            "Notification delivered to log"
        );

        if let Some(delivered) = &self.delivered {
            delivered
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(envelope.clone());
        }

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "log"
    }
}

//! HTTP mail API transport
//!
//! Posts a JSON payload to the configured endpoint with the key in an
//! `api-key` header. Rate limits and server errors are retried with
//! exponential backoff; other client errors fail immediately.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use vc_shared::config::MailConfig;
use vc_shared::utils::{is_email, mask_verifiable};

use super::envelope::DeliveryEnvelope;
use super::transport::NotificationTransport;
use crate::InfrastructureError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody {
    sender: EmailAddress,
    to: Vec<EmailAddress>,
    subject: String,
    text_content: String,
}

/// Transport sending notifications through an HTTP mail API
pub struct MailApiTransport {
    client: Client,
    config: MailConfig,
}

impl MailApiTransport {
    /// Create a new transport
    ///
    /// # Errors
    /// `InfrastructureError::Http` if the HTTP client cannot be built.
    pub fn new(config: MailConfig) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("vc_infra/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    fn payload(&self, envelope: &DeliveryEnvelope) -> SendEmailBody {
        SendEmailBody {
            sender: EmailAddress {
                email: self.config.from_address.clone(),
                name: self.config.from_name.clone(),
            },
            to: vec![EmailAddress {
                email: envelope.verifiable.clone(),
                name: None,
            }],
            subject: envelope.content.subject.clone(),
            text_content: envelope.content.body.clone(),
        }
    }

    async fn send_once(&self, body: &SendEmailBody) -> Result<String, SendError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .header("api-key", &self.config.api_key)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| SendError::Retryable(InfrastructureError::Http(e)))?;

        let status = response.status();
        if status.is_success() {
            let message_id = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("messageId").and_then(|id| id.as_str()).map(str::to_string))
                .unwrap_or_else(|| format!("http_{}", status.as_u16()));
            return Ok(message_id);
        }

        let text = response.text().await.unwrap_or_default();
        let error = InfrastructureError::Delivery(format!(
            "Mail API returned {}: {}",
            status.as_u16(),
            text
        ));

        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Err(SendError::Retryable(error))
        } else {
            Err(SendError::Fatal(error))
        }
    }
}

enum SendError {
    Retryable(InfrastructureError),
    Fatal(InfrastructureError),
}

#[async_trait]
impl NotificationTransport for MailApiTransport {
    async fn deliver(&self, envelope: &DeliveryEnvelope) -> Result<String, InfrastructureError> {
        let destination = mask_verifiable(&envelope.verifiable);
        if !is_email(&envelope.verifiable) {
            error!(verifiable = %destination, "Mail API destination is not an email address");
            return Err(InfrastructureError::Delivery(format!(
                "Not an email address: {}",
                destination
            )));
        }

        let body = self.payload(envelope);
        let max_attempts = self.config.max_retries.max(1);
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(
                "Sending notification attempt {}/{} to {}",
                attempts, max_attempts, destination
            );

            match self.send_once(&body).await {
                Ok(message_id) => {
                    info!(
                        target: "notification_transport",
                        provider = "mail_api",
                        verifiable = %destination,
                        message_id = %message_id,
                        "Notification delivered through mail API"
                    );
                    return Ok(message_id);
                }
                Err(SendError::Fatal(e)) => {
                    error!(verifiable = %destination, error = %e, "Mail API rejected notification");
                    return Err(e);
                }
                Err(SendError::Retryable(e)) if attempts < max_attempts => {
                    warn!(
                        "Mail API delivery failed (attempt {}/{}): {}. Retrying in {:?}",
                        attempts, max_attempts, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(SendError::Retryable(e)) => {
                    error!(
                        "Mail API delivery failed after {} attempts: {}",
                        attempts, e
                    );
                    return Err(e);
                }
            }
        }
    }

    fn provider_name(&self) -> &str {
        "mail_api"
    }
}

//! Serialized delivery job

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vc_core::{NotificationContent, VerificationCodeNotification};

use crate::InfrastructureError;

/// Rendered text carried by an envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryContent {
    pub subject: String,
    pub body: String,
}

impl From<NotificationContent> for DeliveryContent {
    fn from(content: NotificationContent) -> Self {
        Self {
            subject: content.subject,
            body: content.body,
        }
    }
}

/// A notification ready to be delivered, inline or through a queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEnvelope {
    pub id: Uuid,
    /// Destination, e.g. an email address
    pub verifiable: String,
    /// Registered name of the notification
    pub notification: String,
    pub code: String,
    /// Queue the envelope travels through, `None` for inline delivery
    pub queue: Option<String>,
    pub content: DeliveryContent,
    pub created_at: DateTime<Utc>,
    /// Failed delivery attempts so far
    #[serde(default)]
    pub attempts: u32,
}

impl DeliveryEnvelope {
    /// Build an envelope from a notification addressed to `verifiable`
    pub fn from_notification(
        verifiable: &str,
        notification: &dyn VerificationCodeNotification,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            verifiable: verifiable.to_string(),
            notification: notification.name().to_string(),
            code: notification.code().to_string(),
            queue: notification.queue().map(str::to_string),
            content: notification.content().into(),
            created_at: Utc::now(),
            attempts: 0,
        }
    }

    pub fn to_json(&self) -> Result<String, InfrastructureError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, InfrastructureError> {
        Ok(serde_json::from_str(json)?)
    }
}

//! Configuration for the verification service

use chrono::Duration;
use std::collections::HashSet;

use vc_shared::config::{CodeCharset, VerificationConfig, DEFAULT_NOTIFICATION};

use crate::errors::DomainError;

/// Validated configuration consumed by the issuer and verifier
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Number of characters in a generated code
    pub code_length: usize,
    /// Character set generated codes are drawn from
    pub charset: CodeCharset,
    /// How long an issued code stays valid
    pub code_lifetime: Duration,
    /// Queue for deferred delivery, `None` for inline delivery
    pub queue: Option<String>,
    /// Verifiables that bypass storage and delivery
    pub test_verifiables: HashSet<String>,
    /// Code accepted for test verifiables; empty never matches
    pub test_code: String,
    /// Registered name of the notification to dispatch
    pub notification: String,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            charset: CodeCharset::Numeric,
            code_lifetime: Duration::hours(1),
            queue: None,
            test_verifiables: HashSet::new(),
            test_code: String::new(),
            notification: DEFAULT_NOTIFICATION.to_string(),
        }
    }
}

impl VerificationServiceConfig {
    /// Whether a verifiable is on the test allow-list
    pub fn is_test_verifiable(&self, verifiable: &str) -> bool {
        self.test_verifiables.contains(verifiable)
    }

    /// The delivery queue, treating an empty name as unset
    pub fn delivery_queue(&self) -> Option<&str> {
        self.queue.as_deref().filter(|q| !q.trim().is_empty())
    }

    /// Set the delivery queue
    pub fn with_queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = Some(queue.into());
        self
    }

    /// Set the test verifiables and the code they accept
    pub fn with_test_verifiables<I, S>(
        mut self,
        verifiables: I,
        test_code: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.test_verifiables = verifiables.into_iter().map(Into::into).collect();
        self.test_code = test_code.into();
        self
    }

    /// Set the notification name
    pub fn with_notification(mut self, notification: impl Into<String>) -> Self {
        self.notification = notification.into();
        self
    }

    /// Set the code lifetime
    pub fn with_code_lifetime(mut self, lifetime: Duration) -> Self {
        self.code_lifetime = lifetime;
        self
    }
}

impl TryFrom<&VerificationConfig> for VerificationServiceConfig {
    type Error = DomainError;

    fn try_from(config: &VerificationConfig) -> Result<Self, Self::Error> {
        if config.length == 0 {
            return Err(DomainError::Configuration {
                message: "Verification code length must be greater than zero".to_string(),
            });
        }
        if config.expire_seconds <= 0 {
            return Err(DomainError::Configuration {
                message: "Verification code lifetime must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            code_length: config.length,
            charset: config.charset,
            code_lifetime: Duration::seconds(config.expire_seconds),
            queue: config.queue.clone().filter(|q| !q.trim().is_empty()),
            test_verifiables: config.test_verifiables.iter().cloned().collect(),
            test_code: config.test_code.clone(),
            notification: config.notification.clone(),
        })
    }
}

//! Mail delivery configuration module

use serde::{Deserialize, Serialize};

/// Settings for the transport that delivers notifications
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    /// Transport provider ("log" or "http")
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Endpoint of the HTTP mail API
    #[serde(default)]
    pub api_url: String,

    /// API key sent with every request
    #[serde(default)]
    pub api_key: String,

    /// Sender address
    #[serde(default = "default_from_address")]
    pub from_address: String,

    /// Optional sender display name
    #[serde(default)]
    pub from_name: Option<String>,

    /// Maximum retry attempts for a failed request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial delay between retries in milliseconds, doubled on every retry
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Timeout for API requests in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_url: String::new(),
            api_key: String::new(),
            from_address: default_from_address(),
            from_name: None,
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl MailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            provider: std::env::var("MAIL_PROVIDER").unwrap_or_else(|_| default_provider()),
            api_url: std::env::var("MAIL_API_URL").unwrap_or_default(),
            api_key: std::env::var("MAIL_API_KEY").unwrap_or_default(),
            from_address: std::env::var("MAIL_FROM_ADDRESS")
                .unwrap_or_else(|_| default_from_address()),
            from_name: std::env::var("MAIL_FROM_NAME").ok().filter(|v| !v.is_empty()),
            ..Default::default()
        }
    }

    /// Whether the HTTP transport has everything it needs
    pub fn is_http_configured(&self) -> bool {
        !self.api_url.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

fn default_provider() -> String {
    String::from("log")
}

fn default_from_address() -> String {
    String::from("no-reply@localhost")
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_request_timeout_secs() -> u64 {
    30
}

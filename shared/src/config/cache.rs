//! Redis configuration module

use serde::{Deserialize, Serialize};

/// Redis settings backing the delivery queues
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Prefix prepended to every queue key
    #[serde(default = "default_queue_prefix")]
    pub queue_prefix: String,

    /// Maximum retry attempts for a Redis command
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between retries in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            queue_prefix: default_queue_prefix(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let queue_prefix =
            std::env::var("REDIS_QUEUE_PREFIX").unwrap_or_else(|_| default_queue_prefix());

        Self {
            url,
            queue_prefix,
            ..Default::default()
        }
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Full Redis key for a named queue
    pub fn queue_key(&self, queue: &str) -> String {
        format!("{}:{}", self.queue_prefix, queue)
    }
}

fn default_queue_prefix() -> String {
    String::from("verification_code:queue")
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_key() {
        let config = CacheConfig::default();
        assert_eq!(config.queue_key("mail"), "verification_code:queue:mail");
    }
}

//! Redis client implementation
//!
//! A multiplexed async connection with retry logic and the list commands the
//! delivery queues are built on.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use vc_shared::config::CacheConfig;

use crate::InfrastructureError;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis client with retry logic
///
/// Cloning is cheap; clones share the multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
}

impl RedisClient {
    /// Create a new Redis client
    ///
    /// Connecting is retried `config.max_retries` times with exponential
    /// backoff starting at `config.retry_delay_ms`.
    ///
    /// # Example
    /// ```no_run
    /// use vc_infra::cache::RedisClient;
    /// use vc_shared::config::CacheConfig;
    ///
    /// async fn create_client() -> Result<RedisClient, Box<dyn std::error::Error>> {
    ///     let client = RedisClient::new(CacheConfig::new("redis://localhost:6379")).await?;
    ///     Ok(client)
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.url), "Creating Redis client");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection =
            Self::create_connection_with_retry(client, config.max_retries, config.retry_delay_ms)
                .await?;

        info!("Redis client created successfully");

        Ok(Self { connection, config })
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    // Exponential backoff with cap at 5 seconds
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Push a value onto the head of a list
    ///
    /// Sent once; a failure may still have been applied by the server.
    ///
    /// # Returns
    /// The length of the list after the push
    pub async fn lpush(&self, key: &str, value: &str) -> Result<u64, InfrastructureError> {
        let result = self
            .execute(Retry::Never, |mut conn| {
                let key = key.to_string();
                let value = value.to_string();
                Box::pin(async move { conn.lpush::<_, _, u64>(key, value).await })
            })
            .await;

        result.map_err(|e| {
            error!("Failed to push to '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Pop a value from the tail of a list
    ///
    /// Sent once; a failure may still have removed the value.
    pub async fn rpop(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        let result = self
            .execute(Retry::Never, |mut conn| {
                let key = key.to_string();
                Box::pin(async move { conn.rpop::<_, Option<String>>(key, None).await })
            })
            .await;

        result.map_err(|e| {
            error!("Failed to pop from '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Length of a list, zero if the key does not exist
    pub async fn llen(&self, key: &str) -> Result<u64, InfrastructureError> {
        let result = self
            .execute(Retry::Transient, |mut conn| {
                let key = key.to_string();
                Box::pin(async move { conn.llen::<_, u64>(key).await })
            })
            .await;

        result.map_err(InfrastructureError::Cache)
    }

    /// Check if the Redis connection is healthy
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        debug!("Performing Redis health check");

        let response = self
            .execute(Retry::Transient, |mut conn| {
                Box::pin(async move {
                    redis::cmd("PING")
                        .query_async::<_, String>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(|e| {
                error!("Redis health check failed: {}", e);
                InfrastructureError::Cache(e)
            })?;

        if response == "PONG" {
            debug!("Redis health check passed");
            Ok(true)
        } else {
            warn!("Redis health check returned unexpected response: {}", response);
            Ok(false)
        }
    }

    /// Execute an operation, retrying transient failures with exponential backoff
    /// when `retry` allows it
    async fn execute<F, T>(&self, retry: Retry, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.config.retry_delay_ms;

        loop {
            attempts += 1;

            match operation(self.connection.clone()).await {
                Ok(result) => return Ok(result),
                Err(e) if should_retry(retry, &e, attempts, self.config.max_retries) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, self.config.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!("Redis operation failed after {} attempts: {}", attempts, e);
                    return Err(e);
                }
            }
        }
    }
}

/// Whether a command may be sent again after a transient failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Retry {
    /// Running the command twice has the same effect as once (LLEN, PING)
    Transient,
    /// The server may have applied the failed attempt (LPUSH, RPOP)
    Never,
}

/// Whether a failed attempt should be followed by another
pub(crate) fn should_retry(
    retry: Retry,
    error: &RedisError,
    attempts: u32,
    max_retries: u32,
) -> bool {
    retry == Retry::Transient && attempts < max_retries && is_retriable_error(error)
}

/// Whether a Redis error is transient
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.find('@'), url.find("://")) {
        return format!("{}****{}", &url[..proto_end + 3], &url[at_pos..]);
    }
    url.to_string()
}

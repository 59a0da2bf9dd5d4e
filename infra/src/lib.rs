//! # Infrastructure Layer
//!
//! Concrete implementations behind the verification code core:
//!
//! - **Database**: MySQL storage for verification codes using SQLx
//! - **Cache**: Redis client backing the named delivery queues
//! - **Notification**: transports, queueing dispatcher and queue worker
//! - **Telemetry**: `tracing` subscriber setup
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL storage (default)
//! - `redis-queue`: Enable Redis delivery queues (default)

use std::sync::Arc;

use vc_core::{
    DomainError, NotificationRegistry, VerificationService, VerificationServiceConfig,
};
use vc_shared::config::{AppConfig, Environment};

// Re-export core types for convenience
pub use vc_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - Redis client for delivery queues
#[cfg(feature = "redis-queue")]
pub mod cache;

/// Notification delivery - transports, queues, dispatcher and worker
pub mod notification;

/// Tracing subscriber setup
pub mod telemetry;

use notification::{
    create_transport, DeliveryQueue, InMemoryDeliveryQueue, NotificationTransport,
    QueueWorker, QueueWorkerConfig, QueueingDispatcher,
};

/// Dispatcher wired from configuration
pub type ConfiguredDispatcher = QueueingDispatcher<dyn NotificationTransport, dyn DeliveryQueue>;

/// Infrastructure service container
#[cfg(feature = "mysql")]
#[derive(Clone)]
pub struct InfrastructureServices {
    /// Database connection pool
    pub database: database::DatabasePool,
    /// Verification code storage
    pub repository: Arc<database::MySqlVerificationCodeRepository>,
    /// Transport delivering notifications
    pub transport: Arc<dyn NotificationTransport>,
    /// Backend holding queued deliveries
    pub queue: Arc<dyn DeliveryQueue>,
    /// Dispatcher handed to the issuer
    pub dispatcher: Arc<ConfiguredDispatcher>,
    /// Configuration the services were built from
    pub config: AppConfig,
}

#[cfg(feature = "mysql")]
impl InfrastructureServices {
    /// Build the verification service on top of the infrastructure
    ///
    /// # Errors
    /// `DomainError::Configuration` when the verification settings are invalid.
    pub fn verification_service(
        &self,
        notifications: NotificationRegistry,
    ) -> Result<
        VerificationService<database::MySqlVerificationCodeRepository, ConfiguredDispatcher>,
        DomainError,
    > {
        let config = VerificationServiceConfig::try_from(&self.config.verification)?;
        Ok(VerificationService::new(
            Arc::clone(&self.repository),
            Arc::clone(&self.dispatcher),
            notifications,
            config,
        ))
    }

    /// Worker draining the configured delivery queue, if one is configured
    pub fn queue_worker(
        &self,
    ) -> Option<QueueWorker<dyn NotificationTransport, dyn DeliveryQueue>> {
        let queue = self
            .config
            .verification
            .queue
            .as_deref()
            .filter(|q| !q.trim().is_empty())?;

        Some(QueueWorker::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.queue),
            queue,
            QueueWorkerConfig::default(),
        ))
    }
}

/// Initialize infrastructure services
///
/// This function sets up:
/// - The database connection pool and the verification code table
/// - The notification transport selected by `mail.provider`
/// - The delivery queue backend: Redis when a queue is configured,
///   in-memory otherwise
#[cfg(feature = "mysql")]
pub async fn initialize(config: AppConfig) -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!(
        environment = %config.environment,
        "Initializing infrastructure services..."
    );

    let database = database::DatabasePool::new(config.database.clone()).await?;
    if !database.health_check().await? {
        return Err(InfrastructureError::Config(
            "Database health check returned an unexpected value".to_string(),
        ));
    }
    tracing::info!(pool = %database.get_statistics(), "Database ready");

    let repository = database::MySqlVerificationCodeRepository::new(database.get_pool().clone());
    repository.ensure_table().await?;

    let transport = create_transport(&config.mail)?;
    let queue = create_queue(&config).await?;
    let dispatcher = Arc::new(QueueingDispatcher::new(
        Arc::clone(&transport),
        Arc::clone(&queue),
    ));

    tracing::info!("Infrastructure services initialized successfully");

    Ok(InfrastructureServices {
        database,
        repository: Arc::new(repository),
        transport,
        queue,
        dispatcher,
        config,
    })
}

#[cfg(all(feature = "mysql", feature = "redis-queue"))]
async fn create_queue(config: &AppConfig) -> Result<Arc<dyn DeliveryQueue>, InfrastructureError> {
    if config.verification.queue.as_deref().is_some_and(|q| !q.trim().is_empty()) {
        let client = cache::RedisClient::new(config.cache.clone()).await?;
        if !client.health_check().await? {
            return Err(InfrastructureError::Config(
                "Redis health check returned an unexpected reply".to_string(),
            ));
        }
        return Ok(Arc::new(notification::RedisDeliveryQueue::new(client)));
    }
    Ok(Arc::new(InMemoryDeliveryQueue::new()))
}

#[cfg(all(feature = "mysql", not(feature = "redis-queue")))]
async fn create_queue(config: &AppConfig) -> Result<Arc<dyn DeliveryQueue>, InfrastructureError> {
    if config.verification.queue.is_some() {
        tracing::warn!("Redis queues are disabled; queued deliveries are kept in memory");
    }
    Ok(Arc::new(InMemoryDeliveryQueue::new()))
}

/// Load the application configuration
///
/// Reads the environment specific dotenv file (`.env.development`,
/// `.env.staging` or `.env.production`) and then `.env`, if present. Variables
/// already set win over both files. An optional configuration file
/// (`VERIFICATION_CODE_CONFIG_FILE`) and `APP__*` environment variables are
/// then layered on top of the defaults taken from the plain environment
/// variables.
pub fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::from_filename(Environment::from_env().env_file()).ok();
    dotenvy::dotenv().ok(); // Load .env file if present

    let defaults = AppConfig::from_env();
    let mut builder = config::Config::builder()
        .add_source(config::Config::try_from(&defaults)?);

    if let Ok(path) = std::env::var("VERIFICATION_CODE_CONFIG_FILE") {
        builder = builder.add_source(config::File::with_name(&path).required(true));
    }

    let config = builder
        .add_source(
            // Values stay strings so codes like "000000" keep their zeros;
            // `test_verifiables` splits its comma separated form itself.
            config::Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Notification delivery error
    #[error("Delivery error: {0}")]
    Delivery(String),

    /// Envelope (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        DomainError::Internal {
            message: error.to_string(),
        }
    }
}

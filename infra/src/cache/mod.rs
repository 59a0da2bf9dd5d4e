//! Redis client backing the delivery queues
//!
//! Connection retry and per-command retry with exponential backoff.

pub mod redis_client;


pub use redis_client::RedisClient;

// Re-export commonly used types
pub use vc_shared::config::CacheConfig;

//! Redis pub/sub event publisher

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::{DomainError, EventPublisher};

/// Configuration for the Redis publisher
#[derive(Debug, Clone)]
pub struct RedisPublisherConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Optional prefix prepended to every channel name
    pub channel_prefix: Option<String>,
    /// Connection timeout
    pub connection_timeout: Duration,
}

impl Default for RedisPublisherConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            channel_prefix: None,
            connection_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisPublisherConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_channel_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.channel_prefix = Some(prefix.into());
        self
    }

    fn channel(&self, topic: &str) -> String {
        match &self.channel_prefix {
            Some(prefix) => format!("{}:{}", prefix, topic),
            None => topic.to_string(),
        }
    }
}

/// Publishes events with `PUBLISH <topic> <message>`
#[derive(Clone)]
pub struct RedisEventPublisher {
    connection: ConnectionManager,
    config: RedisPublisherConfig,
}

impl fmt::Debug for RedisEventPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisEventPublisher")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisEventPublisher {
    /// Connect to Redis
    pub async fn new(config: RedisPublisherConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str()).map_err(|e| {
            DomainError::configuration(format!("Failed to create Redis client: {}", e))
        })?;

        let connection = tokio::time::timeout(config.connection_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| DomainError::internal("Timed out connecting to Redis"))?
            .map_err(|e| DomainError::internal(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { connection, config })
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, topic: &str, message: &str) -> Result<(), DomainError> {
        let channel = self.config.channel(topic);
        let mut conn = self.connection.clone();

        let _receivers: i64 = conn.publish(&channel, message).await.map_err(|e| {
            DomainError::internal(format!("Failed to publish to '{}': {}", channel, e))
        })?;

        Ok(())
    }

    fn publisher_name(&self) -> &'static str {
        "redis"
    }
}

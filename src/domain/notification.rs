//! Notification sink trait

use async_trait::async_trait;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Publish-only channel for best-effort events
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single message to a topic
    async fn publish(&self, topic: &str, message: &str) -> Result<(), DomainError>;

    /// Name of the backend for logging
    fn publisher_name(&self) -> &'static str;
}

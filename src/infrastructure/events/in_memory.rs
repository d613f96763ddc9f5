//! In-memory event publisher

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{DomainError, EventPublisher};

/// Publisher that keeps every message in memory
///
/// Used for local development and as a test double.
#[derive(Debug, Default)]
pub struct InMemoryEventPublisher {
    published: RwLock<Vec<(String, String)>>,
    should_fail: AtomicBool,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent publish fail
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of `(topic, message)` pairs in publish order
    pub async fn published(&self) -> Vec<(String, String)> {
        self.published.read().await.clone()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, topic: &str, message: &str) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::internal("In-memory publisher configured to fail"));
        }

        debug!(topic = %topic, message = %message, "Event published");
        self.published
            .write()
            .await
            .push((topic.to_string(), message.to_string()));

        Ok(())
    }

    fn publisher_name(&self) -> &'static str {
        "in_memory"
    }
}

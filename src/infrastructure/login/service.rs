//! Login service for account registration and credential checks

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::login::{validate_new_login, LoginDetails, LoginStore};
use crate::domain::{DomainError, EventPublisher};

use super::password::{generate_salt, hash_password, verify_password};

/// Topic account-creation events are published to
pub const DEFAULT_TOPIC: &str = "login-events";

/// How records are keyed in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStrategy {
    /// The username is the record key
    #[default]
    Username,
    /// The store assigns the key
    Generated,
}

/// Settings for the login service
#[derive(Debug, Clone)]
pub struct LoginServiceConfig {
    pub key_strategy: KeyStrategy,
    pub topic: String,
    pub publish_timeout: Duration,
}

impl Default for LoginServiceConfig {
    fn default() -> Self {
        Self {
            key_strategy: KeyStrategy::default(),
            topic: DEFAULT_TOPIC.to_string(),
            publish_timeout: Duration::from_secs(5),
        }
    }
}

/// Outcome of a credential check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub matched: bool,
    /// Key of the matched record, empty when not matched
    pub record_id: String,
}

impl Verification {
    fn rejected() -> Self {
        Self {
            matched: false,
            record_id: String::new(),
        }
    }
}

/// Login service owning hashing, uniqueness and verification
pub struct LoginService {
    store: Arc<dyn LoginStore>,
    publisher: Arc<dyn EventPublisher>,
    config: LoginServiceConfig,
}

impl std::fmt::Debug for LoginService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginService")
            .field("store", &self.store.store_name())
            .field("publisher", &self.publisher.publisher_name())
            .field("config", &self.config)
            .finish()
    }
}

impl LoginService {
    /// Create a new login service
    pub fn new(
        store: Arc<dyn LoginStore>,
        publisher: Arc<dyn EventPublisher>,
        config: LoginServiceConfig,
    ) -> Self {
        Self {
            store,
            publisher,
            config,
        }
    }

    /// Register a new login, returning the key it was stored under
    pub async fn add_login(&self, username: &str, password: &str) -> Result<String, DomainError> {
        validate_new_login(username, password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let existing = self.store.find_by_username(username).await?;
        if !existing.is_empty() {
            return Err(DomainError::conflict(
                "a user already exists with this username",
            ));
        }

        let salt = generate_salt()?;
        let details = LoginDetails::new(username, hash_password(password, &salt), salt);

        let inserted = match self.config.key_strategy {
            KeyStrategy::Username => self
                .store
                .insert_with_key(username, details)
                .await
                .map(|()| username.to_string()),
            KeyStrategy::Generated => self.store.insert(details).await,
        };
        let id = inserted.map_err(|e| match e {
            DomainError::Conflict { .. } => {
                DomainError::conflict("a user already exists with this username")
            }
            other => other,
        })?;

        info!(record_id = %id, store = self.store.store_name(), "Login created");

        self.notify_created(&id).await;

        Ok(id)
    }

    /// Check a username and password against the stored record
    ///
    /// An unknown username is a normal non-match, not an error.
    pub async fn validate(&self, username: &str, password: &str) -> Result<Verification, DomainError> {
        let (id, details) = match self.config.key_strategy {
            KeyStrategy::Username => match self.store.read(username).await {
                Ok(details) => (username.to_string(), details),
                Err(e) if e.is_not_found() => return Ok(Verification::rejected()),
                Err(e) => return Err(e),
            },
            KeyStrategy::Generated => {
                let mut records = self.store.find_by_username(username).await?;

                if records.len() > 1 {
                    warn!(
                        username = %username,
                        count = records.len(),
                        "Multiple login records share one username"
                    );
                    return Err(DomainError::integrity(format!(
                        "{} records found for one username",
                        records.len()
                    )));
                }

                match records.pop() {
                    Some(record) => (record.id, record.details),
                    None => return Ok(Verification::rejected()),
                }
            }
        };

        if !verify_password(password, details.salt(), details.pass_hash()) {
            debug!(record_id = %id, "Password mismatch");
            return Ok(Verification::rejected());
        }

        Ok(Verification {
            matched: true,
            record_id: id,
        })
    }

    async fn notify_created(&self, id: &str) {
        let message = format!("created: {}", id);
        let publish = self.publisher.publish(&self.config.topic, &message);

        match tokio::time::timeout(self.config.publish_timeout, publish).await {
            Ok(Ok(())) => {
                debug!(topic = %self.config.topic, "Published login notification");
            }
            Ok(Err(e)) => {
                warn!(
                    topic = %self.config.topic,
                    error.kind = %e.kind(),
                    error = %e,
                    "Failed to push login notification"
                );
            }
            Err(_) => {
                warn!(
                    topic = %self.config.topic,
                    timeout_ms = self.config.publish_timeout.as_millis() as u64,
                    "Timed out pushing login notification"
                );
            }
        }
    }
}

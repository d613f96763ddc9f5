//! Static in-memory secret fetcher

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::{DomainError, Secret, SecretFetcher};

/// Secret fetcher backed by a fixed map of name to value
///
/// Versions are not tracked; every version label returns the single value.
#[derive(Debug, Default)]
pub struct InMemorySecretFetcher {
    secrets: RwLock<HashMap<String, String>>,
}

impl InMemorySecretFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_secret(name, value);
        self
    }

    /// Insert or replace a secret
    pub fn set_secret(&self, name: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut secrets) = self.secrets.write() {
            secrets.insert(name.into(), value.into());
        }
    }

    /// Remove a secret so later fetches fail
    pub fn remove_secret(&self, name: &str) {
        if let Ok(mut secrets) = self.secrets.write() {
            secrets.remove(name);
        }
    }
}

#[async_trait]
impl SecretFetcher for InMemorySecretFetcher {
    async fn fetch(&self, name: &str, _version: &str) -> Result<Secret, DomainError> {
        let secrets = self
            .secrets
            .read()
            .map_err(|_| DomainError::key_unavailable("Secret map lock poisoned"))?;

        secrets
            .get(name)
            .map(|value| Secret::new(name, value.clone()))
            .ok_or_else(|| DomainError::key_unavailable(format!("Secret '{}' not found", name)))
    }

    fn provider_name(&self) -> &'static str {
        "in_memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LATEST_VERSION;

    #[tokio::test]
    async fn test_fetch_existing_secret() {
        let fetcher = InMemorySecretFetcher::new().with_secret("jwt-auth-token-key", "k1");

        let secret = fetcher.fetch("jwt-auth-token-key", LATEST_VERSION).await.unwrap();
        assert_eq!(secret.value(), "k1");
        assert_eq!(secret.name(), "jwt-auth-token-key");
    }

    #[tokio::test]
    async fn test_fetch_missing_secret() {
        let fetcher = InMemorySecretFetcher::new();

        let err = fetcher.fetch("jwt-auth-token-key", LATEST_VERSION).await.unwrap_err();
        assert!(matches!(err, DomainError::KeyUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_remove_secret() {
        let fetcher = InMemorySecretFetcher::new().with_secret("name", "value");
        fetcher.remove_secret("name");

        assert!(fetcher.fetch("name", LATEST_VERSION).await.is_err());
    }
}

//! Secret fetch capability

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Version label selecting the newest version of a secret
pub const LATEST_VERSION: &str = "latest";

/// A fetched secret value
#[derive(Clone)]
pub struct Secret {
    name: String,
    value: String,
}

impl Secret {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.value.as_bytes()
    }
}

impl Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secret")
            .field("name", &self.name)
            .field("value", &"[hidden]")
            .finish()
    }
}

/// Key-value lookup for sensitive configuration
#[async_trait]
pub trait SecretFetcher: Send + Sync + Debug {
    /// Fetch a secret by name and version label
    async fn fetch(&self, name: &str, version: &str) -> Result<Secret, DomainError>;

    /// Name of the backend for logging
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_debug_hides_value() {
        let secret = Secret::new("jwt-auth-token-key", "super-secret");
        let debug = format!("{:?}", secret);

        assert!(debug.contains("jwt-auth-token-key"));
        assert!(!debug.contains("super-secret"));
        assert_eq!(secret.as_bytes(), b"super-secret");
    }
}

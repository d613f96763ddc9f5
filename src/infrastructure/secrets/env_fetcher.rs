use async_trait::async_trait;
use std::env;

use crate::domain::{DomainError, Secret, SecretFetcher, LATEST_VERSION};

/// Secret fetcher that reads environment variables
///
/// A secret named `jwt-auth-token-key` is read from `JWT_AUTH_TOKEN_KEY`.
/// Only the `latest` version exists.
#[derive(Debug, Default)]
pub struct EnvSecretFetcher {
    prefix: Option<String>,
}

impl EnvSecretFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend `prefix` and an underscore to every variable name
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    pub fn var_name(&self, secret_name: &str) -> String {
        let base: String = secret_name
            .chars()
            .map(|c| match c {
                '-' | '.' | '/' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();

        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix, base),
            None => base,
        }
    }
}

#[async_trait]
impl SecretFetcher for EnvSecretFetcher {
    async fn fetch(&self, name: &str, version: &str) -> Result<Secret, DomainError> {
        if version != LATEST_VERSION {
            return Err(DomainError::key_unavailable(format!(
                "Environment secrets only support version '{}', got '{}'",
                LATEST_VERSION, version
            )));
        }

        let var = self.var_name(name);
        let value = env::var(&var).map_err(|_| {
            DomainError::key_unavailable(format!(
                "Environment variable '{}' not set for secret '{}'",
                var, name
            ))
        })?;

        Ok(Secret::new(name, value))
    }

    fn provider_name(&self) -> &'static str {
        "env"
    }
}

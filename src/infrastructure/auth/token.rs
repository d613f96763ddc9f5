//! HS256 token issue and verification

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::clock::Clock;
use crate::domain::{DomainError, Secret, SecretFetcher, LATEST_VERSION};

/// Secret holding the HMAC signing key
pub const DEFAULT_SECRET_NAME: &str = "jwt-auth-token-key";

/// Claims carried by an issued token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
    /// Issued at timestamp (Unix epoch)
    #[serde(default)]
    pub iat: i64,
    /// Caller supplied claims
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenClaims {
    pub fn username(&self) -> Option<&str> {
        self.extra.get("username").and_then(Value::as_str)
    }
}

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    pub secret_name: String,
    pub secret_version: String,
    pub lifetime: Duration,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            secret_name: DEFAULT_SECRET_NAME.to_string(),
            secret_version: LATEST_VERSION.to_string(),
            lifetime: Duration::from_secs(3600),
        }
    }
}

/// Issues and verifies bearer tokens
///
/// The signing key is fetched on every call, so a rotated secret takes
/// effect immediately and tokens signed with the old key stop verifying.
pub struct TokenService {
    secrets: Arc<dyn SecretFetcher>,
    clock: Arc<dyn Clock>,
    config: TokenServiceConfig,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secrets", &self.secrets.provider_name())
            .field("config", &self.config)
            .finish()
    }
}

impl TokenService {
    pub fn new(
        secrets: Arc<dyn SecretFetcher>,
        clock: Arc<dyn Clock>,
        config: TokenServiceConfig,
    ) -> Self {
        Self {
            secrets,
            clock,
            config,
        }
    }

    /// Sign `claims` with `iat` and `exp` set from the clock
    ///
    /// Caller supplied `iat`/`exp` entries are replaced.
    pub async fn issue_token(&self, mut claims: Map<String, Value>) -> Result<String, DomainError> {
        let key = self.signing_key().await?;

        let lifetime = chrono::Duration::from_std(self.config.lifetime)
            .map_err(|e| DomainError::configuration(format!("Invalid token lifetime: {}", e)))?;
        let now = self.clock.now();

        claims.remove("exp");
        claims.remove("iat");
        let claims = TokenClaims {
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
            extra: claims,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .map_err(|e| DomainError::signing(format!("Failed to sign token: {}", e)))?;

        debug!(exp = claims.exp, "Token issued");
        Ok(token)
    }

    /// Issue a token whose only custom claim is the username
    pub async fn issue_for_user(&self, username: &str) -> Result<String, DomainError> {
        let mut claims = Map::new();
        claims.insert("username".to_string(), Value::String(username.to_string()));
        self.issue_token(claims).await
    }

    /// Check signature and expiry, returning the claims
    pub async fn verify_token(&self, token: &str) -> Result<TokenClaims, DomainError> {
        let key = self.signing_key().await?;

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock below
        validation.validate_exp = false;
        validation.validate_aud = false;

        let data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(key.as_bytes()),
            &validation,
        )
        .map_err(map_decode_error)?;

        if data.claims.exp <= self.clock.now().timestamp() {
            return Err(DomainError::TokenExpired);
        }

        Ok(data.claims)
    }

    async fn signing_key(&self) -> Result<Secret, DomainError> {
        let secret = self
            .secrets
            .fetch(&self.config.secret_name, &self.config.secret_version)
            .await
            .map_err(|e| {
                warn!(
                    secret = %self.config.secret_name,
                    provider = self.secrets.provider_name(),
                    error = %e,
                    "Failed to fetch signing key"
                );
                match e {
                    DomainError::KeyUnavailable { .. } => e,
                    other => DomainError::key_unavailable(other.to_string()),
                }
            })?;

        if secret.value().is_empty() {
            return Err(DomainError::key_unavailable(format!(
                "Secret '{}' is empty",
                self.config.secret_name
            )));
        }

        Ok(secret)
    }
}

fn map_decode_error(e: jsonwebtoken::errors::Error) -> DomainError {
    match e.kind() {
        JwtErrorKind::InvalidSignature
        | JwtErrorKind::InvalidAlgorithm
        | JwtErrorKind::InvalidAlgorithmName
        | JwtErrorKind::MissingRequiredClaim(_)
        | JwtErrorKind::ImmatureSignature => {
            DomainError::invalid_token(format!("Token rejected: {}", e))
        }
        JwtErrorKind::ExpiredSignature => DomainError::TokenExpired,
        _ => DomainError::malformed_token(format!("Token could not be parsed: {}", e)),
    }
}

//! Login record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted credentials for one account
///
/// Field names follow the stored document shape
/// (`UserName`, `PassHash`, `Salt`, `DateCreated`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginDetails {
    #[serde(rename = "UserName")]
    username: String,
    /// Hex digest of the iterated SHA-256 over password + salt
    #[serde(rename = "PassHash")]
    pass_hash: String,
    /// Hex-encoded random salt
    #[serde(rename = "Salt")]
    salt: String,
    #[serde(
        rename = "DateCreated",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    date_created: Option<DateTime<Utc>>,
}

impl LoginDetails {
    /// Create a record stamped with the current time
    pub fn new(
        username: impl Into<String>,
        pass_hash: impl Into<String>,
        salt: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            pass_hash: pass_hash.into(),
            salt: salt.into(),
            date_created: Some(Utc::now()),
        }
    }

    /// Rebuild a record from stored fields
    pub fn from_parts(
        username: impl Into<String>,
        pass_hash: impl Into<String>,
        salt: impl Into<String>,
        date_created: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            username: username.into(),
            pass_hash: pass_hash.into(),
            salt: salt.into(),
            date_created,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn pass_hash(&self) -> &str {
        &self.pass_hash
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn date_created(&self) -> Option<DateTime<Utc>> {
        self.date_created
    }
}

impl std::fmt::Display for LoginDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => f.write_str("could not convert to string"),
        }
    }
}

/// A record together with the key it is stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLogin {
    pub id: String,
    pub details: LoginDetails,
}

impl StoredLogin {
    pub fn new(id: impl Into<String>, details: LoginDetails) -> Self {
        Self {
            id: id.into(),
            details,
        }
    }
}

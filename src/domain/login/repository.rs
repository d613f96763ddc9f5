//! Login store trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{LoginDetails, StoredLogin};
use crate::domain::DomainError;

/// Persistence capability the login service depends on
///
/// Backends are keyed document stores with an equality filter on the
/// username field.
#[async_trait]
pub trait LoginStore: Send + Sync + Debug {
    /// All records whose username equals `username`
    async fn find_by_username(&self, username: &str) -> Result<Vec<StoredLogin>, DomainError>;

    /// Insert under a store-assigned key and return that key
    async fn insert(&self, details: LoginDetails) -> Result<String, DomainError>;

    /// Insert under an explicit key, failing with `Conflict` if the key is taken
    async fn insert_with_key(&self, key: &str, details: LoginDetails) -> Result<(), DomainError>;

    /// Read a record by key, failing with `NotFound` if absent
    async fn read(&self, key: &str) -> Result<LoginDetails, DomainError>;

    /// Name of the backend for logging
    fn store_name(&self) -> &'static str;
}

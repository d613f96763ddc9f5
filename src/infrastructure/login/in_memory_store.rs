//! In-memory login store implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::login::{LoginDetails, LoginStore, StoredLogin};
use crate::domain::DomainError;

/// In-memory implementation of LoginStore
///
/// Keys and usernames are both unique, matching the postgres table.
#[derive(Debug, Default)]
pub struct InMemoryLoginStore {
    records: Arc<RwLock<HashMap<String, LoginDetails>>>,
    should_fail: AtomicBool,
}

impl InMemoryLoginStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given records
    pub fn with_records(records: Vec<StoredLogin>) -> Self {
        let map = records
            .into_iter()
            .map(|record| (record.id, record.details))
            .collect();

        Self {
            records: Arc::new(RwLock::new(map)),
            should_fail: AtomicBool::new(false),
        }
    }

    /// Make every subsequent operation fail with a storage error
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_username_free(
        records: &HashMap<String, LoginDetails>,
        username: &str,
    ) -> Result<(), DomainError> {
        if records.values().any(|details| details.username() == username) {
            return Err(DomainError::conflict(format!(
                "Record with username '{}' already exists",
                username
            )));
        }
        Ok(())
    }

    fn check_should_fail(&self) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::storage("In-memory store configured to fail"));
        }
        Ok(())
    }
}

#[async_trait]
impl LoginStore for InMemoryLoginStore {
    async fn find_by_username(&self, username: &str) -> Result<Vec<StoredLogin>, DomainError> {
        self.check_should_fail()?;
        let records = self.records.read().await;

        Ok(records
            .iter()
            .filter(|(_, details)| details.username() == username)
            .map(|(id, details)| StoredLogin::new(id.clone(), details.clone()))
            .collect())
    }

    async fn insert(&self, details: LoginDetails) -> Result<String, DomainError> {
        self.check_should_fail()?;
        let mut records = self.records.write().await;
        Self::check_username_free(&records, details.username())?;

        let id = Uuid::new_v4().to_string();
        records.insert(id.clone(), details);

        Ok(id)
    }

    async fn insert_with_key(&self, key: &str, details: LoginDetails) -> Result<(), DomainError> {
        self.check_should_fail()?;
        let mut records = self.records.write().await;

        if records.contains_key(key) {
            return Err(DomainError::conflict(format!(
                "Record with key '{}' already exists",
                key
            )));
        }
        Self::check_username_free(&records, details.username())?;

        records.insert(key.to_string(), details);
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<LoginDetails, DomainError> {
        self.check_should_fail()?;
        let records = self.records.read().await;

        records
            .get(key)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("No record with key '{}'", key)))
    }

    fn store_name(&self) -> &'static str {
        "in_memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(username: &str) -> LoginDetails {
        LoginDetails::new(username, "hash", "salt")
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryLoginStore::new();

        let id = store.insert(details("a@test.com")).await.unwrap();

        let found = store.find_by_username("a@test.com").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
        assert!(store.find_by_username("b@test.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_generates_distinct_ids() {
        let store = InMemoryLoginStore::new();

        let first = store.insert(details("a@test.com")).await.unwrap();
        let second = store.insert(details("b@test.com")).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_insert_rejects_taken_username() {
        let store = InMemoryLoginStore::new();
        store.insert(details("a@test.com")).await.unwrap();

        let err = store.insert(details("a@test.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));

        let err = store
            .insert_with_key("other-key", details("a@test.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));

        assert_eq!(store.find_by_username("a@test.com").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_with_key_conflict() {
        let store = InMemoryLoginStore::new();

        store
            .insert_with_key("a@test.com", details("a@test.com"))
            .await
            .unwrap();

        let result = store
            .insert_with_key("a@test.com", details("a@test.com"))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_read_not_found() {
        let store = InMemoryLoginStore::new();

        let err = store.read("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_should_fail() {
        let store = InMemoryLoginStore::new();
        store.set_should_fail(true);

        let err = store.insert(details("a@test.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage { .. }));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_with_records() {
        let store = InMemoryLoginStore::with_records(vec![StoredLogin::new(
            "id-1",
            details("a@test.com"),
        )]);

        let read = store.read("id-1").await.unwrap();
        assert_eq!(read.username(), "a@test.com");
    }
}

//! PostgreSQL login store implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::login::{LoginDetails, LoginStore, StoredLogin};
use crate::domain::DomainError;

/// `id` is as wide as `user_name` since usernames double as keys
const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS login_details (
        id VARCHAR(320) PRIMARY KEY,
        user_name VARCHAR(320) NOT NULL UNIQUE,
        pass_hash VARCHAR(64) NOT NULL,
        salt VARCHAR(64) NOT NULL,
        date_created TIMESTAMPTZ
    )
"#;

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/login_svc".to_string(),
            max_connections: 10,
            connect_timeout_secs: 30,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

/// PostgreSQL implementation of LoginStore
///
/// `user_name` carries a unique index, so a second record for the same
/// username is rejected by the database whichever key strategy is in use.
#[derive(Debug, Clone)]
pub struct PostgresLoginStore {
    pool: PgPool,
}

impl PostgresLoginStore {
    /// Create a store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a new pool using the given configuration
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Ok(Self::new(pool))
    }

    /// Create the login table if it does not exist
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        sqlx::query(CREATE_TABLE_SQL)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create login table: {}", e)))?;

        Ok(())
    }

    async fn insert_row(&self, key: &str, details: &LoginDetails) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO login_details (id, user_name, pass_hash, salt, date_created)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(key)
        .bind(details.username())
        .bind(details.pass_hash())
        .bind(details.salt())
        .bind(details.date_created())
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::conflict(
                format!("A login already exists for '{}'", details.username()),
            ),
            _ => DomainError::storage(format!("Failed to insert login: {}", e)),
        })?;

        Ok(())
    }
}

#[async_trait]
impl LoginStore for PostgresLoginStore {
    async fn find_by_username(&self, username: &str) -> Result<Vec<StoredLogin>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_name, pass_hash, salt, date_created
            FROM login_details
            WHERE user_name = $1
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to query logins: {}", e)))?;

        rows.iter()
            .map(|row| -> Result<StoredLogin, DomainError> {
                let id: String = row
                    .try_get("id")
                    .map_err(|e| DomainError::storage(format!("Invalid login row: {}", e)))?;
                Ok(StoredLogin::new(id, row_to_details(row)?))
            })
            .collect()
    }

    async fn insert(&self, details: LoginDetails) -> Result<String, DomainError> {
        let id = Uuid::new_v4().to_string();
        self.insert_row(&id, &details).await?;
        Ok(id)
    }

    async fn insert_with_key(&self, key: &str, details: LoginDetails) -> Result<(), DomainError> {
        self.insert_row(key, &details).await
    }

    async fn read(&self, key: &str) -> Result<LoginDetails, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT user_name, pass_hash, salt, date_created
            FROM login_details
            WHERE id = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to read login: {}", e)))?;

        match row {
            Some(row) => row_to_details(&row),
            None => Err(DomainError::not_found(format!("No record with key '{}'", key))),
        }
    }

    fn store_name(&self) -> &'static str {
        "postgres"
    }
}

fn row_to_details(row: &PgRow) -> Result<LoginDetails, DomainError> {
    let invalid = |e: sqlx::Error| DomainError::storage(format!("Invalid login row: {}", e));

    let username: String = row.try_get("user_name").map_err(invalid)?;
    let pass_hash: String = row.try_get("pass_hash").map_err(invalid)?;
    let salt: String = row.try_get("salt").map_err(invalid)?;
    let date_created: Option<DateTime<Utc>> = row.try_get("date_created").map_err(invalid)?;

    Ok(LoginDetails::from_parts(username, pass_hash, salt, date_created))
}

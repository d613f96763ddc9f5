//! Login infrastructure module
//!
//! Password hashing, the store backends and the login service that ties
//! them together.

mod in_memory_store;
mod password;
mod postgres_store;
mod service;

pub use in_memory_store::InMemoryLoginStore;
pub use password::{generate_salt, hash_password, verify_password, HASH_ITERATIONS, SALT_LENGTH};
pub use postgres_store::{PostgresConfig, PostgresLoginStore};
pub use service::{KeyStrategy, LoginService, LoginServiceConfig, Verification, DEFAULT_TOPIC};

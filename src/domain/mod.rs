//! Domain layer - records, rules and the capability traits the services use

pub mod error;
pub mod login;
pub mod notification;
pub mod secret;

pub use error::{DomainError, ErrorKind};
pub use login::{LoginDetails, LoginStore, StoredLogin};
pub use notification::EventPublisher;
pub use secret::{Secret, SecretFetcher, LATEST_VERSION};

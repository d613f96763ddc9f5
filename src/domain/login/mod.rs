//! Login domain
//!
//! Credential records, the validation rules for new logins and the store
//! trait the login service is written against.

mod entity;
mod repository;
mod validation;

pub use entity::{LoginDetails, StoredLogin};
pub use repository::LoginStore;
pub use validation::{is_valid_email, validate_new_login, LoginValidationError};

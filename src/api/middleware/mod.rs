//! API middleware components

pub mod authorize;
pub mod logging;

pub use authorize::{authorize, extract_bearer_token};
pub use logging::logging_middleware;

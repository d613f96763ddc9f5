//! Infrastructure layer - backends behind the domain traits

pub mod auth;
pub mod events;
pub mod logging;
pub mod login;
pub mod secrets;

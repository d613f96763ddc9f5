//! Bearer token issue and verification

mod clock;
mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use token::{TokenClaims, TokenService, TokenServiceConfig, DEFAULT_SECRET_NAME};

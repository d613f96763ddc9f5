//! Application state for shared services

use std::sync::Arc;

use tokio::sync::Notify;

use crate::infrastructure::auth::TokenService;
use crate::infrastructure::login::LoginService;

/// Read-only services shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub login_service: Arc<LoginService>,
    pub token_service: Arc<TokenService>,
    pub shutdown: ShutdownHandle,
}

impl AppState {
    pub fn new(login_service: Arc<LoginService>, token_service: Arc<TokenService>) -> Self {
        Self {
            login_service,
            token_service,
            shutdown: ShutdownHandle::default(),
        }
    }
}

/// Lets a request ask the server to stop accepting connections
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    notify: Arc<Notify>,
}

impl ShutdownHandle {
    /// Request shutdown; a later `wait` still observes it
    pub fn trigger(&self) {
        self.notify.notify_one();
    }

    /// Resolve once shutdown has been requested
    pub async fn wait(&self) {
        self.notify.notified().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_before_wait() {
        let handle = ShutdownHandle::default();
        handle.clone().trigger();

        let waited = tokio::time::timeout(Duration::from_secs(1), handle.wait()).await;
        assert!(waited.is_ok());
    }

    #[tokio::test]
    async fn test_wait_pends_without_trigger() {
        let handle = ShutdownHandle::default();

        let waited = tokio::time::timeout(Duration::from_millis(20), handle.wait()).await;
        assert!(waited.is_err());
    }
}

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, LogFormat, LoggingConfig, NotificationBackend, NotificationConfig,
    SecretsBackend, SecretsConfig, ServerConfig, StorageBackend, StorageConfig,
};

//! Login service
//!
//! Registers accounts with salted password hashes, checks credentials and
//! issues signed bearer tokens that gate protected endpoints.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use config::{NotificationBackend, SecretsBackend, StorageBackend};
use domain::{EventPublisher, LoginStore, SecretFetcher};
use infrastructure::{
    auth::{SystemClock, TokenService, TokenServiceConfig},
    events::{InMemoryEventPublisher, RedisEventPublisher, RedisPublisherConfig},
    login::{InMemoryLoginStore, LoginService, LoginServiceConfig, PostgresConfig, PostgresLoginStore},
    secrets::{AwsSecretsFetcher, EnvSecretFetcher, InMemorySecretFetcher},
};
use tracing::info;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let store = create_login_store(config).await?;
    let publisher = create_event_publisher(config).await?;
    let secrets = create_secret_fetcher(config).await?;

    let login_service = LoginService::new(
        store,
        publisher,
        LoginServiceConfig {
            key_strategy: config.storage.key_strategy,
            topic: config.notifications.topic.clone(),
            publish_timeout: Duration::from_secs(config.notifications.publish_timeout_secs),
        },
    );

    let token_service = TokenService::new(
        secrets,
        Arc::new(SystemClock),
        TokenServiceConfig {
            secret_name: config.secrets.name.clone(),
            secret_version: config.secrets.version.clone(),
            lifetime: Duration::from_secs(config.auth.token_lifetime_secs),
        },
    );

    Ok(AppState::new(Arc::new(login_service), Arc::new(token_service)))
}

async fn create_login_store(config: &AppConfig) -> anyhow::Result<Arc<dyn LoginStore>> {
    info!("Storage backend: {:?}", config.storage.backend);

    let store: Arc<dyn LoginStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryLoginStore::new()),
        StorageBackend::Postgres => {
            info!("Connecting to PostgreSQL...");
            let store = PostgresLoginStore::connect(&PostgresConfig::new(&config.storage.url)).await?;
            store.ensure_table().await?;
            info!("PostgreSQL connection established");
            Arc::new(store)
        }
    };

    Ok(store)
}

async fn create_event_publisher(config: &AppConfig) -> anyhow::Result<Arc<dyn EventPublisher>> {
    info!("Notification backend: {:?}", config.notifications.backend);

    let publisher: Arc<dyn EventPublisher> = match config.notifications.backend {
        NotificationBackend::Memory => Arc::new(InMemoryEventPublisher::new()),
        NotificationBackend::Redis => {
            let mut redis_config = RedisPublisherConfig::new(&config.notifications.url);
            if let Some(prefix) = &config.notifications.channel_prefix {
                redis_config = redis_config.with_channel_prefix(prefix);
            }
            Arc::new(RedisEventPublisher::new(redis_config).await?)
        }
    };

    Ok(publisher)
}

async fn create_secret_fetcher(config: &AppConfig) -> anyhow::Result<Arc<dyn SecretFetcher>> {
    info!("Secrets backend: {:?}", config.secrets.backend);

    let fetcher: Arc<dyn SecretFetcher> = match config.secrets.backend {
        SecretsBackend::Env => match &config.secrets.env_prefix {
            Some(prefix) => Arc::new(EnvSecretFetcher::with_prefix(prefix)),
            None => Arc::new(EnvSecretFetcher::new()),
        },
        SecretsBackend::Aws => Arc::new(AwsSecretsFetcher::from_env().await),
        SecretsBackend::Static => {
            let value = config.secrets.static_value.clone().ok_or_else(|| {
                anyhow::anyhow!("secrets.static_value is required for the static backend")
            })?;
            Arc::new(InMemorySecretFetcher::new().with_secret(&config.secrets.name, value))
        }
    };

    Ok(fetcher)
}

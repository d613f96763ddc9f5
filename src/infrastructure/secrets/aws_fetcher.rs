use async_trait::async_trait;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;

use crate::domain::{DomainError, Secret, SecretFetcher, LATEST_VERSION};

/// Version stage AWS uses for the current secret version
const AWS_CURRENT_STAGE: &str = "AWSCURRENT";

/// Trait for AWS Secrets Manager client operations (for mocking)
#[async_trait]
pub trait SecretsManagerClientTrait: Send + Sync + std::fmt::Debug {
    async fn get_secret_value(
        &self,
        secret_id: &str,
        version: &SecretVersion,
    ) -> Result<String, DomainError>;
}

/// How a version label is resolved against Secrets Manager
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SecretVersion {
    Stage(String),
    Id(String),
}

impl SecretVersion {
    /// `latest` maps to the `AWSCURRENT` stage, any other label is a version id
    pub fn from_label(label: &str) -> Self {
        if label == LATEST_VERSION {
            Self::Stage(AWS_CURRENT_STAGE.to_string())
        } else {
            Self::Id(label.to_string())
        }
    }
}

/// Real AWS Secrets Manager client wrapper
#[derive(Debug)]
pub struct RealSecretsManagerClient {
    client: SecretsManagerClient,
}

impl RealSecretsManagerClient {
    pub fn new(client: SecretsManagerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretsManagerClientTrait for RealSecretsManagerClient {
    async fn get_secret_value(
        &self,
        secret_id: &str,
        version: &SecretVersion,
    ) -> Result<String, DomainError> {
        let request = self.client.get_secret_value().secret_id(secret_id);
        let request = match version {
            SecretVersion::Stage(stage) => request.version_stage(stage),
            SecretVersion::Id(id) => request.version_id(id),
        };

        let response = request.send().await.map_err(|e| {
            DomainError::key_unavailable(format!("AWS Secrets Manager error: {}", e))
        })?;

        response
            .secret_string()
            .map(|s| s.to_string())
            .ok_or_else(|| DomainError::key_unavailable("Secret does not contain a string value"))
    }
}

/// Secret fetcher that reads from AWS Secrets Manager
#[derive(Debug)]
pub struct AwsSecretsFetcher<C: SecretsManagerClientTrait> {
    client: C,
}

impl AwsSecretsFetcher<RealSecretsManagerClient> {
    /// Build a client from the default AWS configuration chain
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = SecretsManagerClient::new(&config);

        Self {
            client: RealSecretsManagerClient::new(client),
        }
    }
}

impl<C: SecretsManagerClientTrait> AwsSecretsFetcher<C> {
    pub fn with_client(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: SecretsManagerClientTrait> SecretFetcher for AwsSecretsFetcher<C> {
    async fn fetch(&self, name: &str, version: &str) -> Result<Secret, DomainError> {
        let value = self
            .client
            .get_secret_value(name, &SecretVersion::from_label(version))
            .await?;

        Ok(Secret::new(name, value))
    }

    fn provider_name(&self) -> &'static str {
        "aws_secrets"
    }
}

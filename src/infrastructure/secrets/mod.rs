//! Signing key sources
mod aws_fetcher;
mod env_fetcher;
mod in_memory;

pub use aws_fetcher::{
    AwsSecretsFetcher, RealSecretsManagerClient, SecretVersion, SecretsManagerClientTrait,
};
pub use env_fetcher::EnvSecretFetcher;
pub use in_memory::InMemorySecretFetcher;

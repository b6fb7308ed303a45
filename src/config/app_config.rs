use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::naming::embedding_model_arn;
use crate::domain::vector_store::DEFAULT_DIMENSION;
use crate::domain::{DomainError, WaitPolicy};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub aws: AwsConfig,
    pub provisioning: ProvisioningConfig,
    pub download: DownloadConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    pub region: String,
    /// Named profile from the shared credentials file
    pub profile: Option<String>,
}

/// Inputs the provisioning engine consumes; passed in at construction
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    /// Target region for every resource; follows `aws.region` when loaded
    pub region: String,
    /// Topic used when the caller does not name one
    pub default_topic: String,
    pub embedding_model_id: String,
    pub vector_dimension: u32,
    /// Fixed delay after role changes; IAM propagation is not observable
    pub role_propagation_delay_ms: u64,
    /// Knowledge base, vector bucket and index state changes
    pub resource_wait: WaitPolicy,
    pub ingestion_wait: WaitPolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            profile: None,
        }
    }
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            default_topic: "unverified-workshop".to_string(),
            embedding_model_id: "amazon.titan-embed-text-v2:0".to_string(),
            vector_dimension: DEFAULT_DIMENSION,
            role_propagation_delay_ms: 15_000,
            resource_wait: WaitPolicy::default(),
            ingestion_wait: WaitPolicy::ingestion(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir().join("kb-provisioner"),
        }
    }
}

impl ProvisioningConfig {
    pub fn embedding_model_arn(&self) -> String {
        embedding_model_arn(&self.region, &self.embedding_model_id)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.region.trim().is_empty() {
            return Err(DomainError::configuration("Region cannot be empty"));
        }

        if self.embedding_model_id.trim().is_empty() {
            return Err(DomainError::configuration(
                "Embedding model id cannot be empty",
            ));
        }

        if self.vector_dimension == 0 {
            return Err(DomainError::configuration(
                "Vector dimension must be greater than zero",
            ));
        }

        if self.resource_wait.max_attempts == 0 || self.ingestion_wait.max_attempts == 0 {
            return Err(DomainError::configuration(
                "Wait policies need at least one attempt",
            ));
        }

        Ok(())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app: Self = config.try_deserialize()?;

        // Resources live in the region the SDK clients talk to
        app.provisioning.region = app.aws.region.clone();

        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.aws.region, "us-east-1");
        assert_eq!(config.provisioning.vector_dimension, 1024);
        assert_eq!(config.provisioning.default_topic, "unverified-workshop");
        assert!(config.provisioning.validate().is_ok());
        assert_eq!(
            config.provisioning.embedding_model_arn(),
            "arn:aws:bedrock:us-east-1::foundation-model/amazon.titan-embed-text-v2:0"
        );
    }

    #[test]
    fn test_validate_rejects_empty_region() {
        let config = ProvisioningConfig {
            region: " ".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            config.validate(),
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_dimension() {
        let config = ProvisioningConfig {
            vector_dimension: 0,
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("aws.region", "eu-west-1")
            .unwrap()
            .set_override("provisioning.ingestion_wait.max_attempts", 10)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.aws.region, "eu-west-1");
        assert_eq!(config.provisioning.ingestion_wait.max_attempts, 10);
        assert_eq!(config.provisioning.resource_wait, WaitPolicy::default());
        assert_eq!(config.logging.level, "info");
    }
}

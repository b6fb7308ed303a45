//! Deterministic resource naming for a topic's knowledge base resources

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::DomainError;

/// Lowercase alphanumerics and hyphens, no leading or trailing hyphen
static TOPIC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$").unwrap());

static ACCOUNT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

pub const MAX_BUCKET_NAME_LENGTH: usize = 63;
pub const MAX_VECTOR_BUCKET_NAME_LENGTH: usize = 63;
pub const MAX_INDEX_NAME_LENGTH: usize = 63;
pub const MAX_ROLE_NAME_LENGTH: usize = 64;
pub const MAX_KNOWLEDGE_BASE_NAME_LENGTH: usize = 100;
pub const MAX_DATA_SOURCE_NAME_LENGTH: usize = 100;

/// Topic combined with the cloud account identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    topic: String,
    account_id: String,
}

impl ResourceKey {
    pub fn new(topic: impl Into<String>, account_id: impl Into<String>) -> Result<Self, DomainError> {
        let topic = topic.into();
        let account_id = account_id.into();

        validate_topic(&topic)?;

        if !ACCOUNT_PATTERN.is_match(&account_id) {
            return Err(DomainError::configuration(format!(
                "Invalid account id '{}': must be numeric",
                account_id
            )));
        }

        Ok(Self { topic, account_id })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.topic, self.account_id)
    }
}

/// Validate a topic label before any resource name is derived from it
pub fn validate_topic(topic: &str) -> Result<(), DomainError> {
    if topic.is_empty() {
        return Err(DomainError::configuration("Topic cannot be empty"));
    }

    if !TOPIC_PATTERN.is_match(topic) {
        return Err(DomainError::configuration(format!(
            "Invalid topic '{}': must be lowercase alphanumeric with hyphens",
            topic
        )));
    }

    Ok(())
}

/// Every resource name owned by one ResourceKey
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    pub key: ResourceKey,
    pub bucket: String,
    pub vector_bucket: String,
    pub vector_index: String,
    pub role: String,
    pub knowledge_base: String,
    pub data_source: String,
}

impl ResourceNames {
    /// Inline permissions policy attached to the access role
    pub fn role_policy(&self) -> String {
        format!("{}-permissions", self.role)
    }

    pub fn bucket_arn(&self) -> String {
        bucket_arn(&self.bucket)
    }

    pub fn vector_bucket_arn(&self, region: &str) -> String {
        format!(
            "arn:aws:s3vectors:{}:{}:bucket/{}",
            region,
            self.key.account_id(),
            self.vector_bucket
        )
    }

    pub fn vector_index_arn(&self, region: &str) -> String {
        format!(
            "{}/index/{}",
            self.vector_bucket_arn(region),
            self.vector_index
        )
    }

    fn check_lengths(&self) -> Result<(), DomainError> {
        let limits = [
            ("bucket", &self.bucket, MAX_BUCKET_NAME_LENGTH),
            ("vector bucket", &self.vector_bucket, MAX_VECTOR_BUCKET_NAME_LENGTH),
            ("vector index", &self.vector_index, MAX_INDEX_NAME_LENGTH),
            ("role", &self.role, MAX_ROLE_NAME_LENGTH),
            ("knowledge base", &self.knowledge_base, MAX_KNOWLEDGE_BASE_NAME_LENGTH),
            ("data source", &self.data_source, MAX_DATA_SOURCE_NAME_LENGTH),
        ];

        for (kind, name, max) in limits {
            if name.len() > max {
                return Err(DomainError::configuration(format!(
                    "Topic '{}' too long: {} name '{}' is {} characters (max {})",
                    self.key.topic(),
                    kind,
                    name,
                    name.len(),
                    max
                )));
            }
        }

        Ok(())
    }
}

/// Derive all resource names for a topic in an account
pub fn derive_names(topic: &str, account_id: &str) -> Result<ResourceNames, DomainError> {
    let key = ResourceKey::new(topic, account_id)?;
    let base = key.to_string();
    let knowledge_base = format!("{}-kb", base);

    let names = ResourceNames {
        bucket: base.clone(),
        vector_bucket: format!("{}-vectors", base),
        vector_index: format!("{}-knowledge-base-index", base),
        role: format!("{}-knowledge-base-access-role", base),
        data_source: format!("{}-datasource", knowledge_base),
        knowledge_base,
        key,
    };

    names.check_lengths()?;

    Ok(names)
}

pub fn bucket_arn(bucket: &str) -> String {
    format!("arn:aws:s3:::{}", bucket)
}

pub fn embedding_model_arn(region: &str, model_id: &str) -> String {
    format!("arn:aws:bedrock:{}::foundation-model/{}", region, model_id)
}

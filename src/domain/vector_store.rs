//! Vector storage port and index schema

use async_trait::async_trait;

use super::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// Metadata key holding the full chunk text written by the knowledge base
pub const TEXT_METADATA_KEY: &str = "AMAZON_BEDROCK_TEXT";

pub const DEFAULT_DIMENSION: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorDataType {
    Float32,
}

impl VectorDataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Float32 => "float32",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMetric {
    Cosine,
    Euclidean,
}

impl DistanceMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Euclidean => "euclidean",
        }
    }
}

/// Fixed shape of a knowledge base vector index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorIndexSpec {
    pub dimension: u32,
    pub data_type: VectorDataType,
    pub distance_metric: DistanceMetric,
    pub non_filterable_metadata_keys: Vec<String>,
}

impl VectorIndexSpec {
    /// Schema the knowledge base service expects for text embeddings
    pub fn for_knowledge_base(dimension: u32) -> Self {
        Self {
            dimension,
            data_type: VectorDataType::Float32,
            distance_metric: DistanceMetric::Cosine,
            non_filterable_metadata_keys: vec![TEXT_METADATA_KEY.to_string()],
        }
    }
}

impl Default for VectorIndexSpec {
    fn default() -> Self {
        Self::for_knowledge_base(DEFAULT_DIMENSION)
    }
}

/// Vector bucket and index management.
///
/// Deletes return `false` instead of failing when the target does not exist.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VectorStoreClient: Send + Sync {
    async fn vector_bucket_exists(&self, bucket: &str) -> Result<bool, DomainError>;

    async fn delete_vector_bucket(&self, bucket: &str) -> Result<bool, DomainError>;

    /// Create a vector bucket with server-side encryption
    async fn create_vector_bucket(&self, bucket: &str) -> Result<(), DomainError>;

    async fn index_exists(&self, bucket: &str, index: &str) -> Result<bool, DomainError>;

    async fn delete_index(&self, bucket: &str, index: &str) -> Result<bool, DomainError>;

    async fn create_index(
        &self,
        bucket: &str,
        index: &str,
        spec: &VectorIndexSpec,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knowledge_base_schema() {
        let spec = VectorIndexSpec::default();
        assert_eq!(spec.dimension, 1024);
        assert_eq!(spec.data_type.as_str(), "float32");
        assert_eq!(spec.distance_metric.as_str(), "cosine");
        assert_eq!(spec.non_filterable_metadata_keys, vec!["AMAZON_BEDROCK_TEXT"]);
    }
}

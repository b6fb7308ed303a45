use async_trait::async_trait;
use aws_sdk_s3vectors::types::{
    DataType, DistanceMetric, EncryptionConfiguration, MetadataConfiguration, SseType,
};
use aws_sdk_s3vectors::Client as S3VectorsClient;

use super::error::classify;
use crate::domain::{DomainError, VectorIndexSpec, VectorStoreClient};

const SERVICE: &str = "s3vectors";

/// Vector buckets and indexes backed by S3 Vectors
#[derive(Debug, Clone)]
pub struct S3VectorStoreClient {
    client: S3VectorsClient,
}

impl S3VectorStoreClient {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: S3VectorsClient::new(config),
        }
    }
}

/// Turn a not-found error into `Ok(false)`
fn found(result: Result<(), DomainError>) -> Result<bool, DomainError> {
    match result {
        Ok(()) => Ok(true),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl VectorStoreClient for S3VectorStoreClient {
    async fn vector_bucket_exists(&self, bucket: &str) -> Result<bool, DomainError> {
        let result = self
            .client
            .get_vector_bucket()
            .vector_bucket_name(bucket)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| classify(SERVICE, "GetVectorBucket", e));

        found(result)
    }

    async fn delete_vector_bucket(&self, bucket: &str) -> Result<bool, DomainError> {
        let result = self
            .client
            .delete_vector_bucket()
            .vector_bucket_name(bucket)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| classify(SERVICE, "DeleteVectorBucket", e));

        found(result)
    }

    async fn create_vector_bucket(&self, bucket: &str) -> Result<(), DomainError> {
        let encryption = EncryptionConfiguration::builder()
            .sse_type(SseType::from("AES256"))
            .build();

        self.client
            .create_vector_bucket()
            .vector_bucket_name(bucket)
            .encryption_configuration(encryption)
            .send()
            .await
            .map_err(|e| classify(SERVICE, "CreateVectorBucket", e))?;

        Ok(())
    }

    async fn index_exists(&self, bucket: &str, index: &str) -> Result<bool, DomainError> {
        let result = self
            .client
            .get_index()
            .vector_bucket_name(bucket)
            .index_name(index)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| classify(SERVICE, "GetIndex", e));

        found(result)
    }

    async fn delete_index(&self, bucket: &str, index: &str) -> Result<bool, DomainError> {
        let result = self
            .client
            .delete_index()
            .vector_bucket_name(bucket)
            .index_name(index)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| classify(SERVICE, "DeleteIndex", e));

        found(result)
    }

    async fn create_index(
        &self,
        bucket: &str,
        index: &str,
        spec: &VectorIndexSpec,
    ) -> Result<(), DomainError> {
        let mut metadata = MetadataConfiguration::builder();
        for key in &spec.non_filterable_metadata_keys {
            metadata = metadata.non_filterable_metadata_keys(key);
        }
        let metadata = metadata.build().map_err(|e| {
            DomainError::internal(format!("Failed to build index metadata configuration: {}", e))
        })?;

        self.client
            .create_index()
            .vector_bucket_name(bucket)
            .index_name(index)
            .data_type(DataType::from(spec.data_type.as_str()))
            .dimension(spec.dimension as i32)
            .distance_metric(DistanceMetric::from(spec.distance_metric.as_str()))
            .metadata_configuration(metadata)
            .send()
            .await
            .map_err(|e| classify(SERVICE, "CreateIndex", e))?;

        Ok(())
    }
}

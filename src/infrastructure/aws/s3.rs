use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client as S3Client;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;

use super::error::classify;
use crate::domain::{BucketCreation, DomainError, ObjectStoreClient};

/// Region where buckets are created without a location constraint
const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone)]
pub struct S3ObjectStoreClient {
    client: S3Client,
}

impl S3ObjectStoreClient {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: S3Client::new(config),
        }
    }
}

#[async_trait]
impl ObjectStoreClient for S3ObjectStoreClient {
    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<BucketCreation, DomainError> {
        let mut request = self.client.create_bucket().bucket(bucket);

        if region != DEFAULT_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }

        match request.send().await {
            Ok(_) => Ok(BucketCreation::Created),
            Err(e) if e.code() == Some("BucketAlreadyOwnedByYou") => Ok(BucketCreation::AlreadyOwned),
            Err(e) => Err(classify("s3", "CreateBucket", e)),
        }
    }

    async fn put_object(&self, bucket: &str, key: &str, local_path: &Path) -> Result<(), DomainError> {
        let body = ByteStream::from_path(local_path).await.map_err(|e| {
            DomainError::not_found(format!(
                "Cannot read local file '{}': {}",
                local_path.display(),
                e
            ))
        })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| classify("s3", "PutObject", e))?;

        Ok(())
    }
}

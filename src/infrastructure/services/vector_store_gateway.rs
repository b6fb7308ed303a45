//! Vector bucket and index provisioning.
//!
//! Vector indexes cannot be altered in place, so every run deletes and
//! recreates both the vector bucket and the index.

use std::sync::Arc;

use tracing::{info, warn};

use super::cleanup::deleted;

use crate::domain::{
    wait_until, DomainError, PollOutcome, ResourceNames, VectorIndexSpec, VectorStoreClient,
    WaitPolicy,
};

pub struct VectorStoreGateway {
    client: Arc<dyn VectorStoreClient>,
    spec: VectorIndexSpec,
    wait: WaitPolicy,
}

impl VectorStoreGateway {
    pub fn new(client: Arc<dyn VectorStoreClient>, spec: VectorIndexSpec, wait: WaitPolicy) -> Self {
        Self { client, spec, wait }
    }

    /// Recreate the vector bucket and index, returning the index ARN
    pub async fn provision_vector_index(
        &self,
        names: &ResourceNames,
        region: &str,
    ) -> Result<String, DomainError> {
        let bucket = names.vector_bucket.as_str();
        let index = names.vector_index.as_str();

        // a bucket cannot be deleted while it still holds an index
        self.remove_index(bucket, index).await?;
        self.recreate_bucket(bucket).await?;
        self.create_index(bucket, index).await?;

        let index_arn = names.vector_index_arn(region);
        info!(vector_bucket = bucket, index, index_arn = %index_arn, "Vector index ready");

        Ok(index_arn)
    }

    async fn remove_index(&self, bucket: &str, index: &str) -> Result<(), DomainError> {
        if deleted(self.client.delete_index(bucket, index).await, "vector index", index)? {
            info!(index, "Deleted existing vector index");
            self.wait_for_index(bucket, index, false).await?;
        }
        Ok(())
    }

    async fn recreate_bucket(&self, bucket: &str) -> Result<(), DomainError> {
        match self.client.delete_vector_bucket(bucket).await {
            Err(DomainError::Conflict { message }) => {
                warn!(vector_bucket = bucket, %message, "Vector bucket still in use, reusing it")
            }
            result => {
                if deleted(result, "vector bucket", bucket)? {
                    info!(vector_bucket = bucket, "Deleted existing vector bucket");
                    self.wait_for_bucket(bucket, false).await?;
                }
            }
        }

        match self.client.create_vector_bucket(bucket).await {
            Ok(()) => info!(vector_bucket = bucket, "Created vector bucket"),
            Err(DomainError::Conflict { .. }) => {
                info!(vector_bucket = bucket, "Vector bucket still exists, reusing it")
            }
            Err(e) => return Err(e),
        }

        self.wait_for_bucket(bucket, true).await
    }

    async fn create_index(&self, bucket: &str, index: &str) -> Result<(), DomainError> {
        match self.client.create_index(bucket, index, &self.spec).await {
            Ok(()) => info!(
                index,
                dimension = self.spec.dimension,
                metric = self.spec.distance_metric.as_str(),
                "Created vector index"
            ),
            Err(DomainError::Conflict { .. }) => info!(index, "Vector index still exists, reusing it"),
            Err(e) => return Err(e),
        }

        self.wait_for_index(bucket, index, true).await
    }

    async fn wait_for_bucket(&self, bucket: &str, present: bool) -> Result<(), DomainError> {
        let operation = format!("vector bucket {} to be {}", bucket, presence(present));

        wait_until(&self.wait, &operation, || async move {
            let exists = self.client.vector_bucket_exists(bucket).await?;
            Ok(if exists == present {
                PollOutcome::Ready(())
            } else {
                PollOutcome::Pending(presence(exists).to_string())
            })
        })
        .await
    }

    async fn wait_for_index(&self, bucket: &str, index: &str, present: bool) -> Result<(), DomainError> {
        let operation = format!("vector index {} to be {}", index, presence(present));

        wait_until(&self.wait, &operation, || async move {
            let exists = self.client.index_exists(bucket, index).await?;
            Ok(if exists == present {
                PollOutcome::Ready(())
            } else {
                PollOutcome::Pending(presence(exists).to_string())
            })
        })
        .await
    }
}

fn presence(present: bool) -> &'static str {
    if present { "present" } else { "absent" }
}

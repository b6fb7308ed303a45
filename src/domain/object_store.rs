//! Object storage port

use std::path::Path;

use async_trait::async_trait;

use super::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// Outcome of a bucket creation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketCreation {
    Created,
    /// The bucket already exists and belongs to the caller
    AlreadyOwned,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStoreClient: Send + Sync {
    /// Create a bucket in a region.
    ///
    /// Fails with [`DomainError::Conflict`] when another principal owns the name.
    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<BucketCreation, DomainError>;

    /// Upload a local file, replacing any object already stored at `key`
    async fn put_object(&self, bucket: &str, key: &str, local_path: &Path) -> Result<(), DomainError>;
}

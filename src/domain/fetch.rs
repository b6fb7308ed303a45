//! Document download port

use std::path::Path;

use async_trait::async_trait;

use super::error::DomainError;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Download `url` into `destination`, returning the number of bytes written
    async fn fetch(&self, url: &str, destination: &Path) -> Result<u64, DomainError>;
}

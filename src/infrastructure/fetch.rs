//! HTTP document downloads

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::domain::{DocumentFetcher, DomainError};

const SERVICE: &str = "http";

/// Downloads documents with reqwest, streaming the body to disk
#[derive(Debug, Clone)]
pub struct HttpDocumentFetcher {
    client: reqwest::Client,
}

impl HttpDocumentFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Default for HttpDocumentFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<u64, DomainError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::transient(SERVICE, format!("GET {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = format!("GET {} returned HTTP {}", url, status);
            return Err(if status.is_server_error() {
                DomainError::transient(SERVICE, message)
            } else {
                DomainError::service(SERVICE, message)
            });
        }

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::configuration(format!(
                    "Cannot create download directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let write_error = |e: std::io::Error| {
            DomainError::internal(format!("Cannot write '{}': {}", destination.display(), e))
        };

        let mut file = tokio::fs::File::create(destination)
            .await
            .map_err(write_error)?;
        let mut written: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| DomainError::transient(SERVICE, format!("Reading {} failed: {}", url, e)))?
        {
            file.write_all(&chunk).await.map_err(write_error)?;
            written += chunk.len() as u64;
        }

        file.flush().await.map_err(write_error)?;

        info!(url, path = %destination.display(), bytes = written, "Downloaded document");

        Ok(written)
    }
}

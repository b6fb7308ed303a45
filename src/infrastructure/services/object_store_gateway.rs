//! Document bucket creation and uploads

use std::sync::Arc;

use tracing::info;

use crate::domain::{BucketCreation, DomainError, ObjectStoreClient, StoredFile};

pub struct ObjectStoreGateway {
    client: Arc<dyn ObjectStoreClient>,
}

impl ObjectStoreGateway {
    pub fn new(client: Arc<dyn ObjectStoreClient>) -> Self {
        Self { client }
    }

    /// Create the bucket unless the caller already owns it
    pub async fn ensure_bucket(&self, bucket: &str, region: &str) -> Result<(), DomainError> {
        match self.client.create_bucket(bucket, region).await? {
            BucketCreation::Created => info!(bucket, region, "Created document bucket"),
            BucketCreation::AlreadyOwned => info!(bucket, "Document bucket already exists"),
        }

        Ok(())
    }

    /// Upload one file, overwriting whatever is stored at its key
    pub async fn upload_file(&self, bucket: &str, file: &StoredFile) -> Result<(), DomainError> {
        let exists = tokio::fs::try_exists(file.local_path())
            .await
            .unwrap_or(false);

        if !exists {
            return Err(DomainError::not_found(format!(
                "Local file '{}' not found",
                file.local_path().display()
            )));
        }

        self.client
            .put_object(bucket, &file.target_key, file.local_path())
            .await?;

        info!(bucket, key = %file.target_key, "Uploaded document");

        Ok(())
    }

    pub async fn upload_files(&self, bucket: &str, files: &[StoredFile]) -> Result<(), DomainError> {
        for file in files {
            self.upload_file(bucket, file).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::object_store::MockObjectStoreClient;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_ensure_bucket_accepts_owned_bucket() {
        let mut client = MockObjectStoreClient::new();
        client
            .expect_create_bucket()
            .with(eq("deer-123456789012"), eq("us-east-1"))
            .times(1)
            .returning(|_, _| Ok(BucketCreation::AlreadyOwned));

        let gateway = ObjectStoreGateway::new(Arc::new(client));
        assert!(gateway.ensure_bucket("deer-123456789012", "us-east-1").await.is_ok());
    }

    #[tokio::test]
    async fn test_ensure_bucket_surfaces_conflict() {
        let mut client = MockObjectStoreClient::new();
        client
            .expect_create_bucket()
            .returning(|_, _| Err(DomainError::conflict("owned by someone else")));

        let gateway = ObjectStoreGateway::new(Arc::new(client));
        let result = gateway.ensure_bucket("taken", "us-east-1").await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_not_found() {
        let mut client = MockObjectStoreClient::new();
        client.expect_put_object().never();

        let gateway = ObjectStoreGateway::new(Arc::new(client));
        let file = StoredFile::new("/definitely/not/here.pdf", "deer/illinois/2022.pdf");
        let result = gateway.upload_file("bucket", &file).await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_upload_puts_object_under_target_key() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("2022.pdf");
        std::fs::write(&local, b"%PDF").unwrap();

        let mut client = MockObjectStoreClient::new();
        client
            .expect_put_object()
            .withf(|bucket, key, _| bucket == "bucket" && key == "deer/illinois/2022.pdf")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let gateway = ObjectStoreGateway::new(Arc::new(client));
        let file = StoredFile::new(&local, "deer/illinois/2022.pdf");

        assert!(gateway.upload_file("bucket", &file).await.is_ok());
    }

    #[tokio::test]
    async fn test_upload_propagates_transient_error() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("2023.pdf");
        std::fs::write(&local, b"%PDF").unwrap();

        let mut client = MockObjectStoreClient::new();
        client
            .expect_put_object()
            .returning(|_, _, _| Err(DomainError::transient("s3", "connection reset")));

        let gateway = ObjectStoreGateway::new(Arc::new(client));
        let result = gateway
            .upload_file("bucket", &StoredFile::new(&local, "deer/2023.pdf"))
            .await;

        assert!(result.unwrap_err().is_retryable());
    }
}

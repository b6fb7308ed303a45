use async_trait::async_trait;
use aws_sdk_sts::Client as StsClient;

use super::error::classify;
use crate::domain::{DomainError, IdentityClient};

/// Caller identity backed by STS
#[derive(Debug, Clone)]
pub struct StsIdentityClient {
    client: StsClient,
}

impl StsIdentityClient {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: StsClient::new(config),
        }
    }
}

#[async_trait]
impl IdentityClient for StsIdentityClient {
    async fn caller_account_id(&self) -> Result<String, DomainError> {
        let response = self
            .client
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| classify("sts", "GetCallerIdentity", e))?;

        response
            .account()
            .map(|account| account.to_string())
            .ok_or_else(|| DomainError::service("sts", "Caller identity has no account id"))
    }
}

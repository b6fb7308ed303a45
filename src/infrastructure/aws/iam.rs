use async_trait::async_trait;
use aws_sdk_iam::Client as IamClient;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;

use super::error::classify;
use crate::domain::{AccessClient, DomainError, RoleCreation};

const SERVICE: &str = "iam";

#[derive(Debug, Clone)]
pub struct IamAccessClient {
    client: IamClient,
}

impl IamAccessClient {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: IamClient::new(config),
        }
    }
}

#[async_trait]
impl AccessClient for IamAccessClient {
    async fn create_role(
        &self,
        role_name: &str,
        trust_policy: &str,
        description: &str,
    ) -> Result<RoleCreation, DomainError> {
        let result = self
            .client
            .create_role()
            .role_name(role_name)
            .assume_role_policy_document(trust_policy)
            .description(description)
            .send()
            .await;

        match result {
            Ok(response) => {
                let arn = response
                    .role()
                    .map(|role| role.arn().to_string())
                    .ok_or_else(|| {
                        DomainError::service(SERVICE, format!("CreateRole returned no role for '{}'", role_name))
                    })?;
                Ok(RoleCreation::Created { arn })
            }
            Err(e) if e.code() == Some("EntityAlreadyExists") => Ok(RoleCreation::AlreadyExists),
            Err(e) => Err(classify(SERVICE, "CreateRole", e)),
        }
    }

    async fn get_role_arn(&self, role_name: &str) -> Result<Option<String>, DomainError> {
        match self.client.get_role().role_name(role_name).send().await {
            Ok(response) => Ok(response.role().map(|role| role.arn().to_string())),
            Err(e) => {
                let err = classify(SERVICE, "GetRole", e);
                if err.is_not_found() {
                    Ok(None)
                } else {
                    Err(err)
                }
            }
        }
    }

    async fn put_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> Result<(), DomainError> {
        self.client
            .put_role_policy()
            .role_name(role_name)
            .policy_name(policy_name)
            .policy_document(policy_document)
            .send()
            .await
            .map_err(|e| classify(SERVICE, "PutRolePolicy", e))?;

        Ok(())
    }
}

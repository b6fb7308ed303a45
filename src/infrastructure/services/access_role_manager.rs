//! Knowledge base access role provisioning

use std::sync::Arc;

use tracing::info;

use crate::domain::policy::{permissions_policy, trust_policy};
use crate::domain::{AccessClient, DomainError, ResourceNames, RoleCreation};

pub struct AccessRoleManager {
    client: Arc<dyn AccessClient>,
}

impl AccessRoleManager {
    pub fn new(client: Arc<dyn AccessClient>) -> Self {
        Self { client }
    }

    /// Create the role if needed and (re)attach its permissions policy.
    ///
    /// Returns the role ARN. The permissions policy is written on every call
    /// so an existing role picks up the current bucket and model scope.
    pub async fn ensure_role(
        &self,
        names: &ResourceNames,
        embedding_model_arn: &str,
    ) -> Result<String, DomainError> {
        let role = names.role.as_str();
        let description = format!("Role for Bedrock Knowledge Base {}", names.bucket);

        let role_arn = match self
            .client
            .create_role(role, &trust_policy().to_string(), &description)
            .await?
        {
            RoleCreation::Created { arn } => {
                info!(role, arn = %arn, "Created access role");
                arn
            }
            RoleCreation::AlreadyExists => {
                let arn = self.client.get_role_arn(role).await?.ok_or_else(|| {
                    DomainError::not_found(format!(
                        "Role '{}' reported as existing but could not be read",
                        role
                    ))
                })?;
                info!(role, arn = %arn, "Access role already exists");
                arn
            }
        };

        let policy = permissions_policy(&names.bucket, embedding_model_arn);
        self.client
            .put_role_policy(role, &names.role_policy(), &policy.to_string())
            .await?;

        info!(role, policy = %names.role_policy(), "Attached permissions policy");

        Ok(role_arn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::MockAccessClient;
    use crate::domain::naming::derive_names;

    const MODEL_ARN: &str =
        "arn:aws:bedrock:us-east-1::foundation-model/amazon.titan-embed-text-v2:0";

    fn names() -> ResourceNames {
        derive_names("deer-illinois", "123456789012").unwrap()
    }

    #[tokio::test]
    async fn test_creates_role_and_attaches_policy() {
        let mut client = MockAccessClient::new();
        client
            .expect_create_role()
            .withf(|role, trust, description| {
                role == "deer-illinois-123456789012-knowledge-base-access-role"
                    && trust.contains("bedrock.amazonaws.com")
                    && description == "Role for Bedrock Knowledge Base deer-illinois-123456789012"
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(RoleCreation::Created {
                    arn: "arn:aws:iam::123456789012:role/kb".to_string(),
                })
            });
        client.expect_get_role_arn().never();
        client
            .expect_put_role_policy()
            .withf(|_, policy_name, document| {
                policy_name == "deer-illinois-123456789012-knowledge-base-access-role-permissions"
                    && document.contains("arn:aws:s3:::deer-illinois-123456789012/*")
                    && document.contains(MODEL_ARN)
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let arn = AccessRoleManager::new(Arc::new(client))
            .ensure_role(&names(), MODEL_ARN)
            .await
            .unwrap();

        assert_eq!(arn, "arn:aws:iam::123456789012:role/kb");
    }

    #[tokio::test]
    async fn test_existing_role_is_reused_and_policy_rewritten() {
        let mut client = MockAccessClient::new();
        client
            .expect_create_role()
            .returning(|_, _, _| Ok(RoleCreation::AlreadyExists));
        client
            .expect_get_role_arn()
            .times(1)
            .returning(|_| Ok(Some("arn:aws:iam::123456789012:role/existing".to_string())));
        client
            .expect_put_role_policy()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let arn = AccessRoleManager::new(Arc::new(client))
            .ensure_role(&names(), MODEL_ARN)
            .await
            .unwrap();

        assert_eq!(arn, "arn:aws:iam::123456789012:role/existing");
    }

    #[tokio::test]
    async fn test_vanished_role_is_not_found() {
        let mut client = MockAccessClient::new();
        client
            .expect_create_role()
            .returning(|_, _, _| Ok(RoleCreation::AlreadyExists));
        client.expect_get_role_arn().returning(|_| Ok(None));
        client.expect_put_role_policy().never();

        let result = AccessRoleManager::new(Arc::new(client))
            .ensure_role(&names(), MODEL_ARN)
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_policy_failure_propagates() {
        let mut client = MockAccessClient::new();
        client.expect_create_role().returning(|_, _, _| {
            Ok(RoleCreation::Created {
                arn: "arn".to_string(),
            })
        });
        client
            .expect_put_role_policy()
            .returning(|_, _, _| Err(DomainError::service("iam", "MalformedPolicyDocument")));

        let result = AccessRoleManager::new(Arc::new(client))
            .ensure_role(&names(), MODEL_ARN)
            .await;

        assert!(matches!(result, Err(DomainError::Service { .. })));
    }
}

//! Caller identity and access management ports

use async_trait::async_trait;

use super::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// Resolves who is calling the cloud APIs
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Account identifier of the current credentials
    async fn caller_account_id(&self) -> Result<String, DomainError>;
}

/// Outcome of a role creation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleCreation {
    Created { arn: String },
    AlreadyExists,
}

/// Role and inline policy management
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AccessClient: Send + Sync {
    /// Create a role with the given trust policy document
    async fn create_role(
        &self,
        role_name: &str,
        trust_policy: &str,
        description: &str,
    ) -> Result<RoleCreation, DomainError>;

    /// ARN of an existing role, `None` when absent
    async fn get_role_arn(&self, role_name: &str) -> Result<Option<String>, DomainError>;

    /// Create or replace an inline policy on a role
    async fn put_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> Result<(), DomainError>;
}

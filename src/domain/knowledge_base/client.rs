//! Knowledge base service port

use async_trait::async_trait;

use super::entity::{
    DataSourceSpec, DataSourceSummary, IngestionJob, KnowledgeBaseId, KnowledgeBaseSpec,
    KnowledgeBaseState, KnowledgeBaseSummary,
};
use crate::domain::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// Management API of the knowledge base service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KnowledgeBaseClient: Send + Sync {
    async fn list_knowledge_bases(&self) -> Result<Vec<KnowledgeBaseSummary>, DomainError>;

    /// State of a knowledge base, `None` once it no longer exists
    async fn get_knowledge_base(
        &self,
        id: &KnowledgeBaseId,
    ) -> Result<Option<KnowledgeBaseState>, DomainError>;

    async fn create_knowledge_base(
        &self,
        spec: &KnowledgeBaseSpec,
    ) -> Result<KnowledgeBaseId, DomainError>;

    /// Returns `false` when the knowledge base was already gone
    async fn delete_knowledge_base(&self, id: &KnowledgeBaseId) -> Result<bool, DomainError>;

    async fn list_data_sources(
        &self,
        knowledge_base_id: &KnowledgeBaseId,
    ) -> Result<Vec<DataSourceSummary>, DomainError>;

    /// Returns the new data source id
    async fn create_data_source(
        &self,
        knowledge_base_id: &KnowledgeBaseId,
        spec: &DataSourceSpec,
    ) -> Result<String, DomainError>;

    async fn update_data_source(
        &self,
        knowledge_base_id: &KnowledgeBaseId,
        data_source_id: &str,
        spec: &DataSourceSpec,
    ) -> Result<(), DomainError>;

    /// Returns the new ingestion job id
    async fn start_ingestion_job(
        &self,
        knowledge_base_id: &KnowledgeBaseId,
        data_source_id: &str,
    ) -> Result<String, DomainError>;

    async fn get_ingestion_job(
        &self,
        knowledge_base_id: &KnowledgeBaseId,
        data_source_id: &str,
        ingestion_job_id: &str,
    ) -> Result<IngestionJob, DomainError>;
}

//! Knowledge base lifecycle: create or refresh, then ingest

use std::sync::Arc;

use tracing::{info, warn};

use super::cleanup::{deleted, tolerate};
use crate::domain::{
    wait_until, DataSourceSpec, DomainError, IngestionJobStatus, KnowledgeBaseClient,
    KnowledgeBaseId, KnowledgeBaseSpec, KnowledgeBaseStatus, KnowledgeBaseSummary, PollOutcome,
    ResourceNames, WaitPolicy,
};

const DATA_SOURCE_DESCRIPTION: &str = "S3 data source";

/// Embedding settings shared by every knowledge base this orchestrator creates
#[derive(Debug, Clone)]
pub struct EmbeddingSettings {
    pub model_arn: String,
    pub dimension: u32,
}

pub struct KnowledgeBaseOrchestrator {
    client: Arc<dyn KnowledgeBaseClient>,
    embedding: EmbeddingSettings,
    resource_wait: WaitPolicy,
    ingestion_wait: WaitPolicy,
}

impl KnowledgeBaseOrchestrator {
    pub fn new(
        client: Arc<dyn KnowledgeBaseClient>,
        embedding: EmbeddingSettings,
        resource_wait: WaitPolicy,
        ingestion_wait: WaitPolicy,
    ) -> Self {
        Self {
            client,
            embedding,
            resource_wait,
            ingestion_wait,
        }
    }

    /// First knowledge base carrying `name`, warning when there are several
    pub async fn find_by_name(&self, name: &str) -> Result<Option<KnowledgeBaseSummary>, DomainError> {
        let mut matches = self.list_by_name(name).await?;

        if matches.len() > 1 {
            warn!(
                name,
                count = matches.len(),
                "Multiple knowledge bases share one name, using the first"
            );
        }

        Ok((!matches.is_empty()).then(|| matches.swap_remove(0)))
    }

    async fn list_by_name(&self, name: &str) -> Result<Vec<KnowledgeBaseSummary>, DomainError> {
        Ok(self
            .client
            .list_knowledge_bases()
            .await?
            .into_iter()
            .filter(|kb| kb.name == name)
            .collect())
    }

    /// Create the knowledge base and its data source, then run a full ingestion
    pub async fn create_knowledge_base(
        &self,
        names: &ResourceNames,
        role_arn: &str,
        vector_index_arn: &str,
    ) -> Result<KnowledgeBaseId, DomainError> {
        self.remove_existing(&names.knowledge_base).await?;

        let spec = KnowledgeBaseSpec {
            name: names.knowledge_base.clone(),
            description: format!("Knowledge base: {} using S3 Vectors", names.knowledge_base),
            role_arn: role_arn.to_string(),
            embedding_model_arn: self.embedding.model_arn.clone(),
            dimension: self.embedding.dimension,
            vector_index_arn: vector_index_arn.to_string(),
        };

        let kb_id = self.client.create_knowledge_base(&spec).await?;
        info!(knowledge_base = %spec.name, knowledge_base_id = %kb_id, "Created knowledge base");

        self.wait_for_active(&kb_id).await?;

        let data_source_id = self
            .client
            .create_data_source(&kb_id, &self.data_source_spec(names))
            .await?;
        info!(
            knowledge_base_id = %kb_id,
            data_source_id = %data_source_id,
            data_source = %names.data_source,
            "Created data source"
        );

        self.run_ingestion(&kb_id, &data_source_id).await?;

        Ok(kb_id)
    }

    /// Point the existing data source at the bucket again and re-ingest.
    ///
    /// A knowledge base without its data source is left untouched.
    pub async fn update_knowledge_base(
        &self,
        names: &ResourceNames,
        kb_id: &KnowledgeBaseId,
    ) -> Result<KnowledgeBaseId, DomainError> {
        let data_source = self
            .client
            .list_data_sources(kb_id)
            .await?
            .into_iter()
            .find(|ds| ds.name == names.data_source);

        let Some(data_source) = data_source else {
            info!(
                knowledge_base_id = %kb_id,
                data_source = %names.data_source,
                "No data source to refresh"
            );
            return Ok(kb_id.clone());
        };

        self.client
            .update_data_source(kb_id, &data_source.id, &self.data_source_spec(names))
            .await?;
        info!(knowledge_base_id = %kb_id, data_source_id = %data_source.id, "Updated data source");

        self.run_ingestion(kb_id, &data_source.id).await?;

        Ok(kb_id.clone())
    }

    /// Start an ingestion job and wait for it to complete
    pub async fn run_ingestion(
        &self,
        kb_id: &KnowledgeBaseId,
        data_source_id: &str,
    ) -> Result<(), DomainError> {
        let job_id = self.client.start_ingestion_job(kb_id, data_source_id).await?;
        info!(knowledge_base_id = %kb_id, ingestion_job_id = %job_id, "Started ingestion job");

        let operation = format!("ingestion job {}", job_id);
        let job_id = job_id.as_str();

        wait_until(&self.ingestion_wait, &operation, || async move {
            let job = self
                .client
                .get_ingestion_job(kb_id, data_source_id, job_id)
                .await?;

            match job.status {
                IngestionJobStatus::Complete => Ok(PollOutcome::Ready(())),
                IngestionJobStatus::Failed => Err(DomainError::provisioning_failure(
                    format!("ingestion job {}", job.id),
                    job.failure_reasons,
                )),
                IngestionJobStatus::Unknown(status) => {
                    warn!(ingestion_job_id = job_id, status = %status, "Unrecognized ingestion status, still waiting");
                    Ok(PollOutcome::Pending(status))
                }
                status => Ok(PollOutcome::Pending(status.to_string())),
            }
        })
        .await?;

        info!(knowledge_base_id = %kb_id, ingestion_job_id = job_id, "Ingestion complete");

        Ok(())
    }

    fn data_source_spec(&self, names: &ResourceNames) -> DataSourceSpec {
        DataSourceSpec {
            name: names.data_source.clone(),
            description: DATA_SOURCE_DESCRIPTION.to_string(),
            bucket_arn: names.bucket_arn(),
        }
    }

    async fn remove_existing(&self, name: &str) -> Result<(), DomainError> {
        let Some(existing) =
            tolerate(self.list_by_name(name).await, "knowledge base lookup", name)?
        else {
            return Ok(());
        };

        for kb in existing {
            if deleted(self.client.delete_knowledge_base(&kb.id).await, "knowledge base", name)? {
                info!(knowledge_base_id = %kb.id, "Deleting previous knowledge base");
                self.wait_for_deleted(&kb.id).await?;
            }
        }

        Ok(())
    }

    async fn wait_for_deleted(&self, kb_id: &KnowledgeBaseId) -> Result<(), DomainError> {
        let operation = format!("knowledge base {} deletion", kb_id);

        wait_until(&self.resource_wait, &operation, || async move {
            Ok(match self.client.get_knowledge_base(kb_id).await? {
                None => PollOutcome::Ready(()),
                Some(state) if state.status == KnowledgeBaseStatus::DeleteUnsuccessful => {
                    return Err(DomainError::provisioning_failure(
                        format!("knowledge base {} deletion", kb_id),
                        state.failure_reasons,
                    ))
                }
                Some(state) => PollOutcome::Pending(state.status.as_str().to_string()),
            })
        })
        .await
    }

    async fn wait_for_active(&self, kb_id: &KnowledgeBaseId) -> Result<(), DomainError> {
        let operation = format!("knowledge base {} to become ACTIVE", kb_id);

        wait_until(&self.resource_wait, &operation, || async move {
            let Some(state) = self.client.get_knowledge_base(kb_id).await? else {
                return Ok(PollOutcome::Pending("NOT_VISIBLE".to_string()));
            };

            match state.status {
                KnowledgeBaseStatus::Active => Ok(PollOutcome::Ready(())),
                KnowledgeBaseStatus::Failed => Err(DomainError::provisioning_failure(
                    format!("knowledge base {}", kb_id),
                    state.failure_reasons,
                )),
                status => Ok(PollOutcome::Pending(status.as_str().to_string())),
            }
        })
        .await?;

        info!(knowledge_base_id = %kb_id, "Knowledge base is ACTIVE");

        Ok(())
    }
}

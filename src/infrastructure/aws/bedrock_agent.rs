//! Knowledge base management backed by the Bedrock Agent API

use std::fmt::Display;

use async_trait::async_trait;
use aws_sdk_bedrockagent::types::{
    BedrockEmbeddingModelConfiguration, DataSourceConfiguration, DataSourceType,
    EmbeddingModelConfiguration, KnowledgeBaseConfiguration, KnowledgeBaseStorageType,
    KnowledgeBaseType, S3DataSourceConfiguration, S3VectorsConfiguration, StorageConfiguration,
    VectorKnowledgeBaseConfiguration,
};
use aws_sdk_bedrockagent::Client as BedrockAgentClient;

use super::error::classify;
use crate::domain::{
    DataSourceSpec, DataSourceSummary, DomainError, IngestionJob, IngestionJobStatus,
    KnowledgeBaseClient, KnowledgeBaseId, KnowledgeBaseSpec, KnowledgeBaseState,
    KnowledgeBaseStatus, KnowledgeBaseSummary,
};

const SERVICE: &str = "bedrock-agent";

#[derive(Debug, Clone)]
pub struct BedrockKnowledgeBaseClient {
    client: BedrockAgentClient,
}

impl BedrockKnowledgeBaseClient {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: BedrockAgentClient::new(config),
        }
    }
}

fn build_error(what: &str, e: impl Display) -> DomainError {
    DomainError::internal(format!("Failed to build {}: {}", what, e))
}

fn missing(operation: &str, what: &str) -> DomainError {
    DomainError::service(SERVICE, format!("{} returned no {}", operation, what))
}

fn data_source_configuration(spec: &DataSourceSpec) -> Result<DataSourceConfiguration, DomainError> {
    let s3 = S3DataSourceConfiguration::builder()
        .bucket_arn(&spec.bucket_arn)
        .build()
        .map_err(|e| build_error("S3 data source configuration", e))?;

    DataSourceConfiguration::builder()
        .r#type(DataSourceType::from("S3"))
        .s3_configuration(s3)
        .build()
        .map_err(|e| build_error("data source configuration", e))
}

fn knowledge_base_configuration(
    spec: &KnowledgeBaseSpec,
) -> Result<(KnowledgeBaseConfiguration, StorageConfiguration), DomainError> {
    let embedding = EmbeddingModelConfiguration::builder()
        .bedrock_embedding_model_configuration(
            BedrockEmbeddingModelConfiguration::builder()
                .dimensions(spec.dimension as i32)
                .build(),
        )
        .build();

    let vector = VectorKnowledgeBaseConfiguration::builder()
        .embedding_model_arn(&spec.embedding_model_arn)
        .embedding_model_configuration(embedding)
        .build()
        .map_err(|e| build_error("vector knowledge base configuration", e))?;

    let knowledge_base = KnowledgeBaseConfiguration::builder()
        .r#type(KnowledgeBaseType::from("VECTOR"))
        .vector_knowledge_base_configuration(vector)
        .build()
        .map_err(|e| build_error("knowledge base configuration", e))?;

    let storage = StorageConfiguration::builder()
        .r#type(KnowledgeBaseStorageType::from("S3_VECTORS"))
        .s3_vectors_configuration(
            S3VectorsConfiguration::builder()
                .index_arn(&spec.vector_index_arn)
                .build(),
        )
        .build()
        .map_err(|e| build_error("storage configuration", e))?;

    Ok((knowledge_base, storage))
}

#[async_trait]
impl KnowledgeBaseClient for BedrockKnowledgeBaseClient {
    async fn list_knowledge_bases(&self) -> Result<Vec<KnowledgeBaseSummary>, DomainError> {
        let mut summaries = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = self
                .client
                .list_knowledge_bases()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| classify(SERVICE, "ListKnowledgeBases", e))?;

            for kb in response.knowledge_base_summaries() {
                summaries.push(KnowledgeBaseSummary {
                    id: KnowledgeBaseId::new(kb.knowledge_base_id()),
                    name: kb.name().to_string(),
                    status: KnowledgeBaseStatus::parse(kb.status().as_str()),
                });
            }

            match response.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(summaries)
    }

    async fn get_knowledge_base(
        &self,
        id: &KnowledgeBaseId,
    ) -> Result<Option<KnowledgeBaseState>, DomainError> {
        let response = match self
            .client
            .get_knowledge_base()
            .knowledge_base_id(id.as_str())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let err = classify(SERVICE, "GetKnowledgeBase", e);
                return if err.is_not_found() { Ok(None) } else { Err(err) };
            }
        };

        let kb = response
            .knowledge_base()
            .ok_or_else(|| missing("GetKnowledgeBase", "knowledge base"))?;

        Ok(Some(KnowledgeBaseState {
            id: KnowledgeBaseId::new(kb.knowledge_base_id()),
            status: KnowledgeBaseStatus::parse(kb.status().as_str()),
            failure_reasons: kb.failure_reasons().to_vec(),
        }))
    }

    async fn create_knowledge_base(
        &self,
        spec: &KnowledgeBaseSpec,
    ) -> Result<KnowledgeBaseId, DomainError> {
        let (configuration, storage) = knowledge_base_configuration(spec)?;

        let response = self
            .client
            .create_knowledge_base()
            .name(&spec.name)
            .description(&spec.description)
            .role_arn(&spec.role_arn)
            .knowledge_base_configuration(configuration)
            .storage_configuration(storage)
            .send()
            .await
            .map_err(|e| classify(SERVICE, "CreateKnowledgeBase", e))?;

        let kb = response
            .knowledge_base()
            .ok_or_else(|| missing("CreateKnowledgeBase", "knowledge base"))?;

        Ok(KnowledgeBaseId::new(kb.knowledge_base_id()))
    }

    async fn delete_knowledge_base(&self, id: &KnowledgeBaseId) -> Result<bool, DomainError> {
        match self
            .client
            .delete_knowledge_base()
            .knowledge_base_id(id.as_str())
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let err = classify(SERVICE, "DeleteKnowledgeBase", e);
                if err.is_not_found() { Ok(false) } else { Err(err) }
            }
        }
    }

    async fn list_data_sources(
        &self,
        knowledge_base_id: &KnowledgeBaseId,
    ) -> Result<Vec<DataSourceSummary>, DomainError> {
        let mut summaries = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = self
                .client
                .list_data_sources()
                .knowledge_base_id(knowledge_base_id.as_str())
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| classify(SERVICE, "ListDataSources", e))?;

            for ds in response.data_source_summaries() {
                summaries.push(DataSourceSummary {
                    id: ds.data_source_id().to_string(),
                    name: ds.name().to_string(),
                });
            }

            match response.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(summaries)
    }

    async fn create_data_source(
        &self,
        knowledge_base_id: &KnowledgeBaseId,
        spec: &DataSourceSpec,
    ) -> Result<String, DomainError> {
        let response = self
            .client
            .create_data_source()
            .knowledge_base_id(knowledge_base_id.as_str())
            .name(&spec.name)
            .description(&spec.description)
            .data_source_configuration(data_source_configuration(spec)?)
            .send()
            .await
            .map_err(|e| classify(SERVICE, "CreateDataSource", e))?;

        response
            .data_source()
            .map(|ds| ds.data_source_id().to_string())
            .ok_or_else(|| missing("CreateDataSource", "data source"))
    }

    async fn update_data_source(
        &self,
        knowledge_base_id: &KnowledgeBaseId,
        data_source_id: &str,
        spec: &DataSourceSpec,
    ) -> Result<(), DomainError> {
        self.client
            .update_data_source()
            .knowledge_base_id(knowledge_base_id.as_str())
            .data_source_id(data_source_id)
            .name(&spec.name)
            .description(&spec.description)
            .data_source_configuration(data_source_configuration(spec)?)
            .send()
            .await
            .map_err(|e| classify(SERVICE, "UpdateDataSource", e))?;

        Ok(())
    }

    async fn start_ingestion_job(
        &self,
        knowledge_base_id: &KnowledgeBaseId,
        data_source_id: &str,
    ) -> Result<String, DomainError> {
        let response = self
            .client
            .start_ingestion_job()
            .knowledge_base_id(knowledge_base_id.as_str())
            .data_source_id(data_source_id)
            .send()
            .await
            .map_err(|e| classify(SERVICE, "StartIngestionJob", e))?;

        response
            .ingestion_job()
            .map(|job| job.ingestion_job_id().to_string())
            .ok_or_else(|| missing("StartIngestionJob", "ingestion job"))
    }

    async fn get_ingestion_job(
        &self,
        knowledge_base_id: &KnowledgeBaseId,
        data_source_id: &str,
        ingestion_job_id: &str,
    ) -> Result<IngestionJob, DomainError> {
        let response = self
            .client
            .get_ingestion_job()
            .knowledge_base_id(knowledge_base_id.as_str())
            .data_source_id(data_source_id)
            .ingestion_job_id(ingestion_job_id)
            .send()
            .await
            .map_err(|e| classify(SERVICE, "GetIngestionJob", e))?;

        let job = response
            .ingestion_job()
            .ok_or_else(|| missing("GetIngestionJob", "ingestion job"))?;

        Ok(IngestionJob {
            id: job.ingestion_job_id().to_string(),
            status: IngestionJobStatus::parse(job.status().as_str()),
            failure_reasons: job.failure_reasons().to_vec(),
        })
    }
}

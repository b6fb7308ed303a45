//! Retrieval queries against a provisioned knowledge base

use std::fmt::Debug;

use aws_sdk_bedrockagentruntime::types::{
    KnowledgeBaseQuery, KnowledgeBaseRetrievalConfiguration,
    KnowledgeBaseVectorSearchConfiguration,
};
use aws_sdk_bedrockagentruntime::Client as BedrockAgentRuntimeClient;

use super::error::classify;
use crate::domain::{DomainError, KnowledgeBaseId, RetrievedChunk};

/// Bedrock Knowledge Base retriever
pub struct KnowledgeBaseRetriever {
    client: BedrockAgentRuntimeClient,
}

impl Debug for KnowledgeBaseRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBaseRetriever").finish()
    }
}

impl KnowledgeBaseRetriever {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: BedrockAgentRuntimeClient::new(config),
        }
    }

    /// Return the `top_k` chunks closest to `query`
    pub async fn retrieve(
        &self,
        knowledge_base_id: &KnowledgeBaseId,
        query: &str,
        top_k: u32,
    ) -> Result<Vec<RetrievedChunk>, DomainError> {
        let retrieval_config = KnowledgeBaseRetrievalConfiguration::builder()
            .vector_search_configuration(
                KnowledgeBaseVectorSearchConfiguration::builder()
                    .number_of_results(top_k as i32)
                    .build(),
            )
            .build();

        let query = KnowledgeBaseQuery::builder().text(query).build();

        let response = self
            .client
            .retrieve()
            .knowledge_base_id(knowledge_base_id.as_str())
            .retrieval_query(query)
            .retrieval_configuration(retrieval_config)
            .send()
            .await
            .map_err(|e| classify("bedrock-agent-runtime", "Retrieve", e))?;

        let mut results = Vec::new();

        for r in response.retrieval_results() {
            let content = match r.content() {
                Some(c) => c.text().to_string(),
                None => continue,
            };

            let source = r
                .location()
                .and_then(|l| l.s3_location())
                .and_then(|s3| s3.uri())
                .map(|uri| uri.to_string());

            results.push(RetrievedChunk {
                content,
                score: r.score().unwrap_or(0.0),
                source,
            });
        }

        Ok(results)
    }
}

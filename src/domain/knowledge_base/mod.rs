//! Knowledge Base domain - managed retrieval knowledge bases and their ingestion

mod client;
mod entity;

pub use client::KnowledgeBaseClient;
pub use entity::{
    DataSourceSpec, DataSourceSummary, IngestionJob, IngestionJobStatus, KnowledgeBaseId,
    KnowledgeBaseSpec, KnowledgeBaseState, KnowledgeBaseStatus, KnowledgeBaseSummary,
    RetrievedChunk,
};

#[cfg(test)]
pub use client::MockKnowledgeBaseClient;

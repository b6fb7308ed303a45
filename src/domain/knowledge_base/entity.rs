//! Knowledge base, data source and ingestion job entities

use std::fmt;

/// Opaque knowledge base identifier assigned by the service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KnowledgeBaseId(String);

impl KnowledgeBaseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KnowledgeBaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for KnowledgeBaseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<KnowledgeBaseId> for String {
    fn from(id: KnowledgeBaseId) -> Self {
        id.0
    }
}

/// Knowledge base lifecycle as reported by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeBaseStatus {
    Creating,
    Active,
    Failed,
    /// Deletion stopped; the knowledge base stays until deleted again
    DeleteUnsuccessful,
    /// Any other service status (updating, deleting, ...)
    Other(String),
}

impl KnowledgeBaseStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "CREATING" => Self::Creating,
            "ACTIVE" => Self::Active,
            "FAILED" => Self::Failed,
            "DELETE_UNSUCCESSFUL" => Self::DeleteUnsuccessful,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Creating => "CREATING",
            Self::Active => "ACTIVE",
            Self::Failed => "FAILED",
            Self::DeleteUnsuccessful => "DELETE_UNSUCCESSFUL",
            Self::Other(status) => status,
        }
    }
}

impl fmt::Display for KnowledgeBaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBaseSummary {
    pub id: KnowledgeBaseId,
    pub name: String,
    pub status: KnowledgeBaseStatus,
}

/// Current state of one knowledge base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBaseState {
    pub id: KnowledgeBaseId,
    pub status: KnowledgeBaseStatus,
    pub failure_reasons: Vec<String>,
}

/// Everything needed to create a vector knowledge base backed by a vector index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBaseSpec {
    pub name: String,
    pub description: String,
    pub role_arn: String,
    pub embedding_model_arn: String,
    pub dimension: u32,
    pub vector_index_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceSummary {
    pub id: String,
    pub name: String,
}

/// A data source reading documents from one bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceSpec {
    pub name: String,
    pub description: String,
    pub bucket_arn: String,
}

/// Ingestion job lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestionJobStatus {
    Starting,
    InProgress,
    Complete,
    Failed,
    /// Status values this crate does not know yet; treated as in progress
    Unknown(String),
}

impl IngestionJobStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "STARTING" => Self::Starting,
            "IN_PROGRESS" => Self::InProgress,
            "COMPLETE" => Self::Complete,
            "FAILED" => Self::Failed,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Starting => "STARTING",
            Self::InProgress => "IN_PROGRESS",
            Self::Complete => "COMPLETE",
            Self::Failed => "FAILED",
            Self::Unknown(status) => status,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl fmt::Display for IngestionJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionJob {
    pub id: String,
    pub status: IngestionJobStatus,
    pub failure_reasons: Vec<String>,
}

/// One chunk returned by a retrieval query
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    pub content: String,
    pub score: f64,
    pub source: Option<String>,
}

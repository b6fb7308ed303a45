//! Domain layer - Resource naming, cloud ports and provisioning primitives

pub mod error;
pub mod fetch;
pub mod files;
pub mod identity;
pub mod knowledge_base;
pub mod naming;
pub mod object_store;
pub mod policy;
pub mod polling;
pub mod vector_store;

pub use error::DomainError;
pub use fetch::DocumentFetcher;
pub use files::StoredFile;
pub use identity::{AccessClient, IdentityClient, RoleCreation};
pub use knowledge_base::{
    DataSourceSpec, DataSourceSummary, IngestionJob, IngestionJobStatus, KnowledgeBaseClient,
    KnowledgeBaseId, KnowledgeBaseSpec, KnowledgeBaseState, KnowledgeBaseStatus,
    KnowledgeBaseSummary, RetrievedChunk,
};
pub use naming::{derive_names, validate_topic, ResourceKey, ResourceNames};
pub use object_store::{BucketCreation, ObjectStoreClient};
pub use polling::{wait_until, PollOutcome, WaitPolicy};
pub use vector_store::{DistanceMetric, VectorDataType, VectorIndexSpec, VectorStoreClient};

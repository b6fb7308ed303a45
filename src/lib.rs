//! Knowledge Base Provisioner
//!
//! Turns a topic and a set of documents into a managed, searchable knowledge
//! base:
//! - Deterministic per-topic resource naming
//! - Document bucket, vector bucket and fixed-schema vector index
//! - Least-privilege access role for the knowledge base service
//! - Knowledge base, data source and ingestion with bounded waits
//! - Create-or-update provisioning that converges on one knowledge base per topic

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{DomainError, KnowledgeBaseId, StoredFile};
pub use infrastructure::services::{ProvisioningClients, ProvisioningEngine};

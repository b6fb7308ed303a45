//! Infrastructure services

mod access_role_manager;
mod cleanup;
mod knowledge_base_orchestrator;
mod object_store_gateway;
mod provisioning_engine;
mod vector_store_gateway;

#[cfg(test)]
pub(crate) mod fake_cloud;

pub use access_role_manager::AccessRoleManager;
pub use knowledge_base_orchestrator::{EmbeddingSettings, KnowledgeBaseOrchestrator};
pub use object_store_gateway::ObjectStoreGateway;
pub use provisioning_engine::{ProvisioningClients, ProvisioningEngine};
pub use vector_store_gateway::VectorStoreGateway;

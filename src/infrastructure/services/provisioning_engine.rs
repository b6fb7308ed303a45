//! Provisioning facade: one call turns a topic and a file set into a
//! searchable knowledge base.
//!
//! A topic without a knowledge base goes through the full create path
//! (document bucket, uploads, vector index, access role, knowledge base,
//! data source, ingestion). A topic that already has one only uploads the
//! files and re-ingests, so repeated runs converge on the same id.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};

use super::access_role_manager::AccessRoleManager;
use super::knowledge_base_orchestrator::{EmbeddingSettings, KnowledgeBaseOrchestrator};
use super::object_store_gateway::ObjectStoreGateway;
use super::vector_store_gateway::VectorStoreGateway;
use crate::config::ProvisioningConfig;
use crate::domain::{
    derive_names, validate_topic, AccessClient, DomainError, IdentityClient, KnowledgeBaseClient,
    KnowledgeBaseId, ObjectStoreClient, ResourceNames, StoredFile, VectorIndexSpec,
    VectorStoreClient,
};

/// Cloud ports the engine drives
#[derive(Clone)]
pub struct ProvisioningClients {
    pub identity: Arc<dyn IdentityClient>,
    pub object_store: Arc<dyn ObjectStoreClient>,
    pub vector_store: Arc<dyn VectorStoreClient>,
    pub access: Arc<dyn AccessClient>,
    pub knowledge_base: Arc<dyn KnowledgeBaseClient>,
}

/// Serializes runs for the same topic within this process
#[derive(Default)]
struct TopicLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TopicLocks {
    async fn acquire(&self, topic: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(topic.to_string()).or_default().clone()
        };

        lock.lock_owned().await
    }
}

pub struct ProvisioningEngine {
    config: ProvisioningConfig,
    identity: Arc<dyn IdentityClient>,
    object_store: ObjectStoreGateway,
    vector_store: VectorStoreGateway,
    access_roles: AccessRoleManager,
    orchestrator: KnowledgeBaseOrchestrator,
    topic_locks: TopicLocks,
}

impl ProvisioningEngine {
    pub fn new(config: ProvisioningConfig, clients: ProvisioningClients) -> Result<Self, DomainError> {
        config.validate()?;

        let embedding = EmbeddingSettings {
            model_arn: config.embedding_model_arn(),
            dimension: config.vector_dimension,
        };

        Ok(Self {
            identity: clients.identity,
            object_store: ObjectStoreGateway::new(clients.object_store),
            vector_store: VectorStoreGateway::new(
                clients.vector_store,
                VectorIndexSpec::for_knowledge_base(config.vector_dimension),
                config.resource_wait.clone(),
            ),
            access_roles: AccessRoleManager::new(clients.access),
            orchestrator: KnowledgeBaseOrchestrator::new(
                clients.knowledge_base,
                embedding,
                config.resource_wait.clone(),
                config.ingestion_wait.clone(),
            ),
            topic_locks: TopicLocks::default(),
            config,
        })
    }

    pub fn config(&self) -> &ProvisioningConfig {
        &self.config
    }

    /// Create or refresh the knowledge base for `topic` and return its id
    pub async fn provision(
        &self,
        topic: &str,
        files: &[StoredFile],
    ) -> Result<KnowledgeBaseId, DomainError> {
        validate_topic(topic)?;
        let _guard = self.topic_locks.acquire(topic).await;

        check_local_files(files).await?;

        let names = self.resolve_names(topic).await?;
        let existing = self.orchestrator.find_by_name(&names.knowledge_base).await?;

        let kb_id = match existing {
            None => {
                info!(topic, knowledge_base = %names.knowledge_base, "No knowledge base yet, creating");
                self.create(&names, files).await?
            }
            Some(kb) => {
                info!(topic, knowledge_base_id = %kb.id, "Knowledge base exists, updating");
                self.update(&names, files, &kb.id).await?
            }
        };

        info!(topic, knowledge_base_id = %kb_id, files = files.len(), "Provisioning complete");

        Ok(kb_id)
    }

    /// Id of the knowledge base provisioned for `topic`, if any
    pub async fn lookup(&self, topic: &str) -> Result<Option<KnowledgeBaseId>, DomainError> {
        let names = self.resolve_names(topic).await?;

        let found = self.orchestrator.find_by_name(&names.knowledge_base).await?;
        if found.is_none() {
            info!(topic, knowledge_base = %names.knowledge_base, "No knowledge base for topic");
        }

        Ok(found.map(|kb| kb.id))
    }

    async fn resolve_names(&self, topic: &str) -> Result<ResourceNames, DomainError> {
        let account_id = self.identity.caller_account_id().await?;
        derive_names(topic, &account_id)
    }

    async fn create(
        &self,
        names: &ResourceNames,
        files: &[StoredFile],
    ) -> Result<KnowledgeBaseId, DomainError> {
        let region = self.config.region.as_str();

        self.object_store.ensure_bucket(&names.bucket, region).await?;
        self.object_store.upload_files(&names.bucket, files).await?;

        let index_arn = self
            .vector_store
            .provision_vector_index(names, region)
            .await?;

        let role_arn = self
            .access_roles
            .ensure_role(names, &self.config.embedding_model_arn())
            .await?;
        self.wait_for_role_propagation().await;

        self.orchestrator
            .create_knowledge_base(names, &role_arn, &index_arn)
            .await
    }

    async fn update(
        &self,
        names: &ResourceNames,
        files: &[StoredFile],
        kb_id: &KnowledgeBaseId,
    ) -> Result<KnowledgeBaseId, DomainError> {
        self.object_store
            .ensure_bucket(&names.bucket, &self.config.region)
            .await?;
        self.object_store.upload_files(&names.bucket, files).await?;

        self.orchestrator.update_knowledge_base(names, kb_id).await
    }

    async fn wait_for_role_propagation(&self) {
        let delay = self.config.role_propagation_delay_ms;
        if delay > 0 {
            info!(delay_ms = delay, "Waiting for role propagation");
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }
}

/// Reject the run before any cloud call when a local file is missing
async fn check_local_files(files: &[StoredFile]) -> Result<(), DomainError> {
    let mut missing = Vec::new();

    for file in files {
        if !tokio::fs::try_exists(file.local_path()).await.unwrap_or(false) {
            missing.push(file.local_path().display().to_string());
        }
    }

    if missing.is_empty() {
        return Ok(());
    }

    warn!(missing = ?missing, "Local files missing");

    Err(DomainError::configuration(format!(
        "Local files not found: {}",
        missing.join(", ")
    )))
}

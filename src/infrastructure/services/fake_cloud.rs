//! In-memory implementation of every cloud port, for engine tests

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::{
    AccessClient, BucketCreation, DataSourceSpec, DataSourceSummary, DomainError, IdentityClient,
    IngestionJob, IngestionJobStatus, KnowledgeBaseClient, KnowledgeBaseId, KnowledgeBaseSpec,
    KnowledgeBaseState, KnowledgeBaseStatus, KnowledgeBaseSummary, ObjectStoreClient,
    RoleCreation, VectorIndexSpec, VectorStoreClient,
};

/// How ingestion jobs started against the fake end
#[derive(Debug, Clone)]
pub enum IngestionOutcome {
    Complete,
    Fail(Vec<String>),
    Stuck,
}

#[derive(Debug, Clone)]
pub struct FakeKnowledgeBase {
    pub id: KnowledgeBaseId,
    pub name: String,
    pub status: KnowledgeBaseStatus,
    pub vector_index_arn: String,
    pub data_sources: Vec<FakeDataSource>,
}

#[derive(Debug, Clone)]
pub struct FakeDataSource {
    pub id: String,
    pub name: String,
    pub bucket_arn: String,
}

#[derive(Debug)]
pub struct FakeState {
    pub account_id: String,
    pub buckets: BTreeMap<String, BTreeSet<String>>,
    pub foreign_buckets: BTreeSet<String>,
    pub vector_buckets: BTreeSet<String>,
    pub indexes: BTreeSet<(String, String)>,
    pub roles: HashMap<String, String>,
    pub role_policies: HashMap<(String, String), String>,
    pub knowledge_bases: Vec<FakeKnowledgeBase>,
    pub jobs: HashMap<String, (IngestionJob, u32)>,
    pub ingestion_outcome: IngestionOutcome,
    pub knowledge_bases_created: u32,
    pub ingestions_started: u32,
    next_id: u32,
}

/// Fake cloud account shared by all ports
#[derive(Clone)]
pub struct FakeCloud {
    state: Arc<Mutex<FakeState>>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                account_id: "123456789012".to_string(),
                buckets: BTreeMap::new(),
                foreign_buckets: BTreeSet::new(),
                vector_buckets: BTreeSet::new(),
                indexes: BTreeSet::new(),
                roles: HashMap::new(),
                role_policies: HashMap::new(),
                knowledge_bases: Vec::new(),
                jobs: HashMap::new(),
                ingestion_outcome: IngestionOutcome::Complete,
                knowledge_bases_created: 0,
                ingestions_started: 0,
                next_id: 0,
            })),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn set_ingestion_outcome(&self, outcome: IngestionOutcome) {
        self.state().ingestion_outcome = outcome;
    }

    /// Register a knowledge base created outside the engine
    pub fn seed_knowledge_base(&self, name: &str, data_sources: Vec<FakeDataSource>) -> KnowledgeBaseId {
        let mut state = self.state();
        let id = KnowledgeBaseId::new(state.allocate_id("KB"));
        state.knowledge_bases.push(FakeKnowledgeBase {
            id: id.clone(),
            name: name.to_string(),
            status: KnowledgeBaseStatus::Active,
            vector_index_arn: String::new(),
            data_sources,
        });
        id
    }

    pub fn objects(&self, bucket: &str) -> Vec<String> {
        self.state()
            .buckets
            .get(bucket)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl FakeState {
    fn allocate_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }

    fn knowledge_base_mut(&mut self, id: &KnowledgeBaseId) -> Result<&mut FakeKnowledgeBase, DomainError> {
        self.knowledge_bases
            .iter_mut()
            .find(|kb| &kb.id == id)
            .ok_or_else(|| DomainError::not_found(format!("knowledge base {}", id)))
    }
}

#[async_trait]
impl IdentityClient for FakeCloud {
    async fn caller_account_id(&self) -> Result<String, DomainError> {
        Ok(self.state().account_id.clone())
    }
}

#[async_trait]
impl ObjectStoreClient for FakeCloud {
    async fn create_bucket(&self, bucket: &str, _region: &str) -> Result<BucketCreation, DomainError> {
        let mut state = self.state();
        if state.foreign_buckets.contains(bucket) {
            return Err(DomainError::conflict(format!("bucket {} is owned by another account", bucket)));
        }
        if state.buckets.contains_key(bucket) {
            return Ok(BucketCreation::AlreadyOwned);
        }
        state.buckets.insert(bucket.to_string(), BTreeSet::new());
        Ok(BucketCreation::Created)
    }

    async fn put_object(&self, bucket: &str, key: &str, _local_path: &Path) -> Result<(), DomainError> {
        self.state()
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| DomainError::not_found(format!("bucket {}", bucket)))?
            .insert(key.to_string());
        Ok(())
    }
}

#[async_trait]
impl VectorStoreClient for FakeCloud {
    async fn vector_bucket_exists(&self, bucket: &str) -> Result<bool, DomainError> {
        Ok(self.state().vector_buckets.contains(bucket))
    }

    async fn delete_vector_bucket(&self, bucket: &str) -> Result<bool, DomainError> {
        let mut state = self.state();
        if state.indexes.iter().any(|(b, _)| b == bucket) {
            return Err(DomainError::conflict(format!(
                "DeleteVectorBucket failed: ConflictException: vector bucket {} is not empty",
                bucket
            )));
        }
        Ok(state.vector_buckets.remove(bucket))
    }

    async fn create_vector_bucket(&self, bucket: &str) -> Result<(), DomainError> {
        if !self.state().vector_buckets.insert(bucket.to_string()) {
            return Err(DomainError::conflict(format!("vector bucket {}", bucket)));
        }
        Ok(())
    }

    async fn index_exists(&self, bucket: &str, index: &str) -> Result<bool, DomainError> {
        Ok(self
            .state()
            .indexes
            .contains(&(bucket.to_string(), index.to_string())))
    }

    async fn delete_index(&self, bucket: &str, index: &str) -> Result<bool, DomainError> {
        Ok(self
            .state()
            .indexes
            .remove(&(bucket.to_string(), index.to_string())))
    }

    async fn create_index(&self, bucket: &str, index: &str, _spec: &VectorIndexSpec) -> Result<(), DomainError> {
        let mut state = self.state();
        if !state.vector_buckets.contains(bucket) {
            return Err(DomainError::not_found(format!("vector bucket {}", bucket)));
        }
        state.indexes.insert((bucket.to_string(), index.to_string()));
        Ok(())
    }
}

#[async_trait]
impl AccessClient for FakeCloud {
    async fn create_role(&self, role_name: &str, _trust: &str, _description: &str) -> Result<RoleCreation, DomainError> {
        let mut state = self.state();
        if state.roles.contains_key(role_name) {
            return Ok(RoleCreation::AlreadyExists);
        }
        let arn = format!("arn:aws:iam::{}:role/{}", state.account_id, role_name);
        state.roles.insert(role_name.to_string(), arn.clone());
        Ok(RoleCreation::Created { arn })
    }

    async fn get_role_arn(&self, role_name: &str) -> Result<Option<String>, DomainError> {
        Ok(self.state().roles.get(role_name).cloned())
    }

    async fn put_role_policy(&self, role_name: &str, policy_name: &str, document: &str) -> Result<(), DomainError> {
        let mut state = self.state();
        if !state.roles.contains_key(role_name) {
            return Err(DomainError::not_found(format!("role {}", role_name)));
        }
        state
            .role_policies
            .insert((role_name.to_string(), policy_name.to_string()), document.to_string());
        Ok(())
    }
}

#[async_trait]
impl KnowledgeBaseClient for FakeCloud {
    async fn list_knowledge_bases(&self) -> Result<Vec<KnowledgeBaseSummary>, DomainError> {
        Ok(self
            .state()
            .knowledge_bases
            .iter()
            .map(|kb| KnowledgeBaseSummary {
                id: kb.id.clone(),
                name: kb.name.clone(),
                status: kb.status.clone(),
            })
            .collect())
    }

    async fn get_knowledge_base(&self, id: &KnowledgeBaseId) -> Result<Option<KnowledgeBaseState>, DomainError> {
        let mut state = self.state();
        let Ok(kb) = state.knowledge_base_mut(id) else {
            return Ok(None);
        };

        let observed = KnowledgeBaseState {
            id: kb.id.clone(),
            status: kb.status.clone(),
            failure_reasons: vec![],
        };

        // creation settles after being observed once
        if kb.status == KnowledgeBaseStatus::Creating {
            kb.status = KnowledgeBaseStatus::Active;
        }

        Ok(Some(observed))
    }

    async fn create_knowledge_base(&self, spec: &KnowledgeBaseSpec) -> Result<KnowledgeBaseId, DomainError> {
        let mut state = self.state();
        let id = KnowledgeBaseId::new(state.allocate_id("KB"));
        state.knowledge_bases_created += 1;
        state.knowledge_bases.push(FakeKnowledgeBase {
            id: id.clone(),
            name: spec.name.clone(),
            status: KnowledgeBaseStatus::Creating,
            vector_index_arn: spec.vector_index_arn.clone(),
            data_sources: vec![],
        });
        Ok(id)
    }

    async fn delete_knowledge_base(&self, id: &KnowledgeBaseId) -> Result<bool, DomainError> {
        let mut state = self.state();
        let before = state.knowledge_bases.len();
        state.knowledge_bases.retain(|kb| &kb.id != id);
        Ok(state.knowledge_bases.len() != before)
    }

    async fn list_data_sources(&self, kb_id: &KnowledgeBaseId) -> Result<Vec<DataSourceSummary>, DomainError> {
        let mut state = self.state();
        Ok(state
            .knowledge_base_mut(kb_id)?
            .data_sources
            .iter()
            .map(|ds| DataSourceSummary {
                id: ds.id.clone(),
                name: ds.name.clone(),
            })
            .collect())
    }

    async fn create_data_source(&self, kb_id: &KnowledgeBaseId, spec: &DataSourceSpec) -> Result<String, DomainError> {
        let mut state = self.state();
        let id = state.allocate_id("DS");
        state.knowledge_base_mut(kb_id)?.data_sources.push(FakeDataSource {
            id: id.clone(),
            name: spec.name.clone(),
            bucket_arn: spec.bucket_arn.clone(),
        });
        Ok(id)
    }

    async fn update_data_source(
        &self,
        kb_id: &KnowledgeBaseId,
        data_source_id: &str,
        spec: &DataSourceSpec,
    ) -> Result<(), DomainError> {
        let mut state = self.state();
        let data_source = state
            .knowledge_base_mut(kb_id)?
            .data_sources
            .iter_mut()
            .find(|ds| ds.id == data_source_id)
            .ok_or_else(|| DomainError::not_found(format!("data source {}", data_source_id)))?;
        data_source.bucket_arn = spec.bucket_arn.clone();
        Ok(())
    }

    async fn start_ingestion_job(&self, kb_id: &KnowledgeBaseId, _data_source_id: &str) -> Result<String, DomainError> {
        let mut state = self.state();
        state.knowledge_base_mut(kb_id)?;
        let id = state.allocate_id("JOB");
        state.ingestions_started += 1;
        state.jobs.insert(
            id.clone(),
            (
                IngestionJob {
                    id: id.clone(),
                    status: IngestionJobStatus::Starting,
                    failure_reasons: vec![],
                },
                0,
            ),
        );
        Ok(id)
    }

    async fn get_ingestion_job(
        &self,
        _kb_id: &KnowledgeBaseId,
        _data_source_id: &str,
        ingestion_job_id: &str,
    ) -> Result<IngestionJob, DomainError> {
        let mut state = self.state();
        let outcome = state.ingestion_outcome.clone();
        let (job, polls) = state
            .jobs
            .get_mut(ingestion_job_id)
            .ok_or_else(|| DomainError::not_found(format!("ingestion job {}", ingestion_job_id)))?;

        *polls += 1;
        let (status, reasons) = match (*polls, outcome) {
            (1, _) => (IngestionJobStatus::Starting, vec![]),
            (_, IngestionOutcome::Stuck) | (2, _) => (IngestionJobStatus::InProgress, vec![]),
            (_, IngestionOutcome::Complete) => (IngestionJobStatus::Complete, vec![]),
            (_, IngestionOutcome::Fail(reasons)) => (IngestionJobStatus::Failed, reasons),
        };
        job.status = status;
        job.failure_reasons = reasons;

        Ok(job.clone())
    }
}

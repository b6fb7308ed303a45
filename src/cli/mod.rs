//! CLI module for the knowledge base provisioner
//!
//! Subcommands:
//! - `provision`: upload local files and create or refresh a topic's knowledge base
//! - `lookup`: print the knowledge base id of a topic
//! - `ingest`: download yearly reports, then provision them
//! - `query`: retrieve the closest chunks from a topic's knowledge base

pub mod ingest;
pub mod lookup;
pub mod provision;
pub mod query;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::aws::{
    self, BedrockKnowledgeBaseClient, IamAccessClient, S3ObjectStoreClient, S3VectorStoreClient,
    StsIdentityClient,
};
use crate::infrastructure::logging;
use crate::infrastructure::services::{ProvisioningClients, ProvisioningEngine};

/// Knowledge base provisioner - turns document sets into searchable knowledge bases
#[derive(Parser)]
#[command(name = "kb-provisioner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Upload files and create or refresh the topic's knowledge base
    Provision(provision::ProvisionArgs),

    /// Print the knowledge base id provisioned for a topic
    Lookup(lookup::LookupArgs),

    /// Download yearly reports and provision them
    Ingest(ingest::IngestArgs),

    /// Retrieve the chunks closest to a query
    Query(query::QueryArgs),
}

/// Loaded configuration and SDK settings shared by every command
pub(crate) struct Context {
    pub config: AppConfig,
    pub sdk: aws_config::SdkConfig,
}

impl Context {
    pub async fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = AppConfig::load().unwrap_or_default();
        logging::init_logging(&config.logging)?;

        let sdk = aws::load_sdk_config(&config.aws).await;

        Ok(Self { config, sdk })
    }

    /// Topic from the command line, falling back to the configured default
    pub fn topic(&self, topic: Option<String>) -> String {
        topic.unwrap_or_else(|| self.config.provisioning.default_topic.clone())
    }

    pub fn engine(&self) -> anyhow::Result<ProvisioningEngine> {
        let clients = ProvisioningClients {
            identity: Arc::new(StsIdentityClient::new(&self.sdk)),
            object_store: Arc::new(S3ObjectStoreClient::new(&self.sdk)),
            vector_store: Arc::new(S3VectorStoreClient::new(&self.sdk)),
            access: Arc::new(IamAccessClient::new(&self.sdk)),
            knowledge_base: Arc::new(BedrockKnowledgeBaseClient::new(&self.sdk)),
        };

        Ok(ProvisioningEngine::new(
            self.config.provisioning.clone(),
            clients,
        )?)
    }
}

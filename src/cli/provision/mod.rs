//! Provision command - uploads local files and provisions the topic's knowledge base

use clap::Args;
use tracing::info;

use super::Context;
use crate::domain::StoredFile;

/// Arguments for the provision command
#[derive(Args, Clone)]
pub struct ProvisionArgs {
    /// Topic naming the knowledge base (defaults to provisioning.default_topic)
    #[arg(long)]
    pub topic: Option<String>,

    /// File to store, as LOCAL_PATH=TARGET_KEY (repeatable)
    #[arg(long = "file", value_name = "LOCAL=TARGET", value_parser = StoredFile::parse, required = true)]
    pub files: Vec<StoredFile>,
}

pub async fn run(args: ProvisionArgs) -> anyhow::Result<()> {
    let context = Context::load().await?;
    let topic = context.topic(args.topic);
    let engine = context.engine()?;

    info!(topic = %topic, files = args.files.len(), "Provisioning knowledge base");

    let kb_id = engine.provision(&topic, &args.files).await?;
    println!("{}", kb_id);

    Ok(())
}

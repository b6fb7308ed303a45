//! Query command - retrieval smoke test against a provisioned knowledge base

use clap::Args;

use super::Context;
use crate::infrastructure::aws::KnowledgeBaseRetriever;

/// Arguments for the query command
#[derive(Args, Clone)]
pub struct QueryArgs {
    /// Topic whose knowledge base is queried (defaults to provisioning.default_topic)
    #[arg(long)]
    pub topic: Option<String>,

    /// Number of chunks to return
    #[arg(long, default_value_t = 5)]
    pub top_k: u32,

    /// Free-text query
    pub query: String,
}

pub async fn run(args: QueryArgs) -> anyhow::Result<()> {
    let context = Context::load().await?;
    let topic = context.topic(args.topic);

    let Some(kb_id) = context.engine()?.lookup(&topic).await? else {
        anyhow::bail!("No knowledge base provisioned for topic '{}'", topic);
    };

    let chunks = KnowledgeBaseRetriever::new(&context.sdk)
        .retrieve(&kb_id, &args.query, args.top_k)
        .await?;

    println!("{}", kb_id);
    for (rank, chunk) in chunks.iter().enumerate() {
        println!(
            "\n#{} score={:.4} source={}",
            rank + 1,
            chunk.score,
            chunk.source.as_deref().unwrap_or("-")
        );
        println!("{}", chunk.content.trim());
    }

    Ok(())
}

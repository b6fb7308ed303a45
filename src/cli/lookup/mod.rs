//! Lookup command - prints the knowledge base id of a topic

use clap::Args;

use super::Context;

/// Arguments for the lookup command
#[derive(Args, Clone)]
pub struct LookupArgs {
    /// Topic to look up (defaults to provisioning.default_topic)
    #[arg(long)]
    pub topic: Option<String>,
}

pub async fn run(args: LookupArgs) -> anyhow::Result<()> {
    let context = Context::load().await?;
    let topic = context.topic(args.topic);

    match context.engine()?.lookup(&topic).await? {
        Some(kb_id) => {
            println!("{}", kb_id);
            Ok(())
        }
        None => anyhow::bail!("No knowledge base provisioned for topic '{}'", topic),
    }
}

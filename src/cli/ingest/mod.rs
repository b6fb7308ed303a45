//! Ingest command - downloads yearly reports for one animal and state, then
//! provisions them under `{animal}/{state}/{year}.pdf`

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use super::Context;
use crate::domain::{DocumentFetcher, StoredFile};
use crate::infrastructure::fetch::HttpDocumentFetcher;

/// One report to download, given as YEAR=URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSource {
    pub year: String,
    pub url: String,
}

impl ReportSource {
    pub fn parse(pair: &str) -> Result<Self, String> {
        let (year, url) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected YEAR=URL, got '{}'", pair))?;

        if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("invalid year '{}'", year));
        }

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(format!("invalid report URL '{}'", url));
        }

        Ok(Self {
            year: year.to_string(),
            url: url.to_string(),
        })
    }
}

/// Arguments for the ingest command
#[derive(Args, Clone)]
pub struct IngestArgs {
    /// Topic naming the knowledge base (defaults to ANIMAL-STATE)
    #[arg(long)]
    pub topic: Option<String>,

    #[arg(long)]
    pub animal: String,

    #[arg(long)]
    pub state: String,

    /// Report to download, as YEAR=URL (repeatable)
    #[arg(long = "report", value_name = "YEAR=URL", value_parser = ReportSource::parse, required = true)]
    pub reports: Vec<ReportSource>,
}

impl IngestArgs {
    fn topic(&self) -> String {
        self.topic.clone().unwrap_or_else(|| {
            format!("{}-{}", self.animal.trim(), self.state.trim())
                .to_lowercase()
                .replace(' ', "-")
        })
    }
}

pub async fn run(args: IngestArgs) -> anyhow::Result<()> {
    let context = Context::load().await?;
    let topic = args.topic();
    let engine = context.engine()?;

    let fetcher = HttpDocumentFetcher::new();
    let files = download_reports(&fetcher, &args, &context.config.download.dir).await?;

    info!(topic = %topic, reports = files.len(), "Provisioning downloaded reports");

    let kb_id = engine.provision(&topic, &files).await?;
    println!("{}", kb_id);

    Ok(())
}

async fn download_reports(
    fetcher: &dyn DocumentFetcher,
    args: &IngestArgs,
    download_dir: &Path,
) -> anyhow::Result<Vec<StoredFile>> {
    let mut files = Vec::with_capacity(args.reports.len());

    for report in &args.reports {
        let mut file = StoredFile::report(&args.animal, &args.state, &report.year, PathBuf::new());
        file.local_path = download_dir.join(&file.target_key);

        fetcher.fetch(&report.url, &file.local_path).await?;

        files.push(file);
    }

    Ok(files)
}

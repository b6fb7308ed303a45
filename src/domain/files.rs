//! Local documents waiting to be stored under a logical key

use std::path::{Path, PathBuf};

/// A local file and the object key it is stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub local_path: PathBuf,
    pub target_key: String,
}

impl StoredFile {
    pub fn new(local_path: impl Into<PathBuf>, target_key: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            target_key: target_key.into(),
        }
    }

    /// A yearly report filed as `{animal}/{state}/{year}.pdf`
    pub fn report(
        animal: &str,
        state: &str,
        year: &str,
        local_path: impl Into<PathBuf>,
    ) -> Self {
        Self::new(
            local_path,
            format!(
                "{}/{}/{}.pdf",
                animal.trim().to_lowercase(),
                state.trim().to_lowercase(),
                year.trim()
            ),
        )
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Parse a `LOCAL=TARGET` pair
    pub fn parse(pair: &str) -> Result<Self, String> {
        let (local, target) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected LOCAL=TARGET, got '{}'", pair))?;

        if local.is_empty() || target.is_empty() {
            return Err(format!("expected LOCAL=TARGET, got '{}'", pair));
        }

        Ok(Self::new(local, target.trim_start_matches('/')))
    }
}

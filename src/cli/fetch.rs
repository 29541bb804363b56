//! Fetch-odds command implementation

use clap::Args;
use std::path::PathBuf;

use crate::config::Config;
use crate::data::SlateSnapshot;
use crate::provider::{OddsProvider, TheOddsApi};

#[derive(Args, Debug)]
pub struct FetchOddsArgs {
    /// Snapshot file to write
    #[arg(long, default_value = "slate.json")]
    pub out: PathBuf,

    /// Existing snapshot whose priors and context are kept
    #[arg(long)]
    pub base: Option<PathBuf>,
}

impl FetchOddsArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let provider = TheOddsApi::from_env(config.odds.clone())?;
        let snapshot = self.fetch_into_snapshot(&provider).await?;
        snapshot.save(&self.out)?;

        tracing::info!(
            path = ?self.out,
            quotes = snapshot.quotes.len(),
            "Wrote slate snapshot"
        );
        Ok(())
    }

    /// Fetch quotes and place them in a snapshot, replacing any previous quotes
    pub async fn fetch_into_snapshot(&self, provider: &dyn OddsProvider) -> anyhow::Result<SlateSnapshot> {
        let mut snapshot = match &self.base {
            Some(path) => SlateSnapshot::load(path)?,
            None => SlateSnapshot::default(),
        };
        snapshot.quotes = provider.fetch_quotes().await?;
        Ok(snapshot)
    }
}

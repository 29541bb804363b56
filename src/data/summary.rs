//! Run summary document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::parlay::{ParlayLeg, ParlayResult};
use crate::pricing::{PricingReport, SkippedRow};
use crate::risk::Tier;

/// Number of best single legs listed in the summary
pub const TOP_EDGES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierCounts {
    pub green: usize,
    pub amber: usize,
    pub red: usize,
    pub pass: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParlaySummary {
    pub bucket: String,
    pub legs: usize,
    pub probability: f64,
    pub decimal_odds: f64,
    pub ev: f64,
    pub description: String,
}

/// Counts and highlights for one pricing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub lines_priced: usize,
    pub touchdowns_priced: usize,
    pub tiers: TierCounts,
    pub skipped: Vec<SkippedRow>,
    pub top_edges: Vec<ParlayLeg>,
    pub parlays: Vec<ParlaySummary>,
    pub files: Vec<PathBuf>,
}

impl RunSummary {
    pub fn new(report: &PricingReport, parlays: &[ParlayResult]) -> Self {
        Self {
            run_id: report.run_id,
            generated_at: report.generated_at,
            lines_priced: report.lines().count(),
            touchdowns_priced: report.binaries().count(),
            tiers: TierCounts {
                green: report.count_tier(Tier::Green),
                amber: report.count_tier(Tier::Amber),
                red: report.count_tier(Tier::Red),
                pass: report.count_tier(Tier::Pass),
            },
            skipped: report.skipped.clone(),
            top_edges: report.top_edges(TOP_EDGES),
            parlays: parlays
                .iter()
                .map(|p| ParlaySummary {
                    bucket: p.bucket.clone(),
                    legs: p.legs.len(),
                    probability: p.probability,
                    decimal_odds: p.decimal_odds,
                    ev: p.ev,
                    description: p.describe(),
                })
                .collect(),
            files: Vec::new(),
        }
    }

    pub fn with_files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = files;
        self
    }

    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::debug!(path = ?path, "Wrote run summary");
        Ok(())
    }
}

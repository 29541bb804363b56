//! Slate snapshot files
//!
//! A snapshot is one JSON document holding the quotes, priors and context
//! for a run. `fetch-odds` writes the quotes section; `price` reads it all.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::context::{ContextRecord, ContextSignals};
use crate::market::{Prior, PriorRecord, Quote, QuoteRecord};

/// Loader rows for one slate
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SlateSnapshot {
    pub quotes: Vec<QuoteRecord>,
    pub priors: Vec<PriorRecord>,
    pub context: ContextRecord,
}

/// Typed inputs ready for pricing
#[derive(Debug, Clone)]
pub struct Slate {
    pub quotes: Vec<Quote>,
    pub priors: Vec<Prior>,
    pub context: ContextSignals,
    /// Quote rows that could not describe a proposition
    pub rejected: usize,
}

impl SlateSnapshot {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading slate snapshot {}", path.display()))?;
        let snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("parsing slate snapshot {}", path.display()))?;
        Ok(snapshot)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing slate snapshot {}", path.display()))?;
        Ok(())
    }

    /// Convert loader rows into typed pricing inputs
    pub fn into_slate(self) -> Slate {
        let total = self.quotes.len();
        let quotes: Vec<Quote> = self.quotes.into_iter().filter_map(Quote::from_record).collect();
        let rejected = total - quotes.len();
        if rejected > 0 {
            tracing::warn!(rejected, "Dropped quote rows without a usable line");
        }

        Slate {
            quotes,
            priors: self.priors.into_iter().map(Prior::from).collect(),
            context: ContextSignals::from(self.context),
            rejected,
        }
    }
}

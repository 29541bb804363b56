//! Run inputs and outputs
//!
//! Slate snapshots in, Parquet tables and a JSON summary out

mod parquet;
mod slate;
mod summary;

pub use parquet::{line_eval_schema, parlay_schema, td_eval_schema, ReportWriter};
pub use slate::{Slate, SlateSnapshot};
pub use summary::{ParlaySummary, RunSummary, TierCounts, TOP_EDGES};

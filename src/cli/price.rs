//! Price command implementation

use clap::Args;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::context::{ContextSignals, FeedLoader};
use crate::data::{ReportWriter, RunSummary, SlateSnapshot};
use crate::market::{Prior, Quote};
use crate::parlay::{ParlayBuilder, ParlayResult};
use crate::pricing::{PricingReport, SlatePricer};

#[derive(Args, Debug)]
pub struct PriceArgs {
    /// Slate snapshot (JSON) with quotes, priors and context
    #[arg(long)]
    pub slate: PathBuf,

    /// Output directory, overrides `outputs.folder`
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Load team feeds from the configured URLs before pricing
    #[arg(long)]
    pub fetch_feeds: bool,

    /// Pricing worker threads
    #[arg(long, default_value = "4")]
    pub workers: usize,

    /// Bankroll for stake sizing, overrides `risk.bankroll`
    #[arg(long)]
    pub bankroll: Option<Decimal>,

    /// Number of top edges to print
    #[arg(long, default_value = "10")]
    pub top: usize,
}

/// What a price run produced
#[derive(Debug)]
pub struct PriceOutcome {
    pub summary: RunSummary,
    pub output_dir: PathBuf,
}

impl PriceArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<PriceOutcome> {
        let mut config = config.clone();
        if let Some(bankroll) = self.bankroll {
            config.risk.bankroll = Some(bankroll);
        }
        let output_dir = self.out.clone().unwrap_or_else(|| config.outputs.folder.clone());

        let slate = SlateSnapshot::load(&self.slate)?.into_slate();
        let mut context = slate.context;
        if self.fetch_feeds {
            let loader = FeedLoader::new(config.feeds.clone())?;
            context.merge_feeds(loader.load().await);
        }

        tracing::info!(
            quotes = slate.quotes.len(),
            priors = slate.priors.len(),
            workers = self.workers,
            "Pricing slate"
        );

        let workers = self.workers.max(1);
        let quotes = slate.quotes;
        let priors = slate.priors;
        let (report, parlays) = tokio::task::spawn_blocking(move || {
            price_and_build(&config, &quotes, &priors, &context, workers)
        })
        .await?;

        let summary = write_outputs(&output_dir, &report, &parlays)?;
        print_summary(&summary, self.top);

        Ok(PriceOutcome {
            summary,
            output_dir,
        })
    }
}

/// Price every quote, then build parlays from the finished report
pub fn price_and_build(
    config: &Config,
    quotes: &[Quote],
    priors: &[Prior],
    context: &ContextSignals,
    workers: usize,
) -> (PricingReport, Vec<ParlayResult>) {
    let report = SlatePricer::new(config).price_parallel(quotes, priors, context, workers);
    let parlays = ParlayBuilder::new(&config.parlays).build(&report.opportunities);
    (report, parlays)
}

/// Write the Parquet tables and the JSON summary for a run
pub fn write_outputs(
    dir: &Path,
    report: &PricingReport,
    parlays: &[ParlayResult],
) -> anyhow::Result<RunSummary> {
    let writer = ReportWriter::new(dir, report.run_id, report.generated_at);

    let lines: Vec<_> = report.lines().collect();
    let touchdowns: Vec<_> = report.binaries().collect();
    let files = vec![
        writer.write_lines(&lines)?,
        writer.write_touchdowns(&touchdowns)?,
        writer.write_parlays(parlays)?,
    ];

    let summary_path = writer.file_path("summary", "json");
    let summary = RunSummary::new(report, parlays).with_files(files);
    summary.write(&summary_path)?;

    tracing::info!(
        run_id = %summary.run_id,
        dir = ?dir,
        lines = summary.lines_priced,
        touchdowns = summary.touchdowns_priced,
        skipped = summary.skipped.len(),
        "Wrote run outputs"
    );

    Ok(summary)
}

fn print_summary(summary: &RunSummary, top: usize) {
    println!("Run {}", summary.run_id);
    println!(
        "  Priced: {} lines, {} touchdowns ({} skipped)",
        summary.lines_priced,
        summary.touchdowns_priced,
        summary.skipped.len()
    );
    println!(
        "  Tiers: GREEN={} AMBER={} RED={} Pass={}",
        summary.tiers.green, summary.tiers.amber, summary.tiers.red, summary.tiers.pass
    );

    if !summary.top_edges.is_empty() {
        println!("\nTop edges:");
        for leg in summary.top_edges.iter().take(top) {
            println!(
                "  {:<40} {:>+6} edge {:>5.1}%  ev {:>+.3}",
                leg.label(),
                leg.price,
                leg.edge_pct,
                leg.ev
            );
        }
    }

    println!("\nParlays:");
    for parlay in &summary.parlays {
        println!(
            "  {:<10} legs={} p={:.4} odds={:.2} ev={:+.3}",
            parlay.bucket, parlay.legs, parlay.probability, parlay.decimal_odds, parlay.ev
        );
    }
}

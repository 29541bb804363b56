//! Slate pricing engine
//!
//! Rows are independent: a failed row is logged and recorded as skipped,
//! and never stops the batch.

use std::thread;

use super::{
    BinaryPricing, LinePricing, Note, PricedOpportunity, PricingError, PricingReport, PriorBook,
    PropKey, SkippedRow,
};
use crate::config::Config;
use crate::context::ContextSignals;
use crate::market::{Proposition, Quote, Side};
use crate::model::{touchdown_probability, AdjustmentPipeline, DistributionModel, NormalModel};
use crate::odds::devig_american;
use crate::risk::{EdgeSizer, SidePricing, Tier};
use crate::telemetry::{increment, set_gauge, CounterMetric, GaugeMetric};

/// Team or EPA factor above which a line is annotated
const STRONG_FACTOR: f64 = 1.025;

/// Prices quotes against priors and context
pub struct SlatePricer<'a, M = NormalModel> {
    config: &'a Config,
    model: M,
}

impl<'a> SlatePricer<'a, NormalModel> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            model: NormalModel::new(),
        }
    }
}

impl<'a, M: DistributionModel> SlatePricer<'a, M> {
    /// Use a different line model
    pub fn with_model(config: &'a Config, model: M) -> Self {
        Self { config, model }
    }

    fn key(quote: &Quote) -> PropKey {
        PropKey {
            game_id: quote.game_id.clone(),
            player: quote.player.clone(),
            team: quote.team.clone(),
            market: quote.market,
            book: quote.book.clone(),
        }
    }

    /// Price a single quote
    pub fn price_quote(
        &self,
        quote: &Quote,
        priors: &PriorBook,
        ctx: &ContextSignals,
    ) -> Result<PricedOpportunity, PricingError> {
        match quote.proposition {
            Proposition::OverUnder {
                line,
                price_over,
                price_under,
            } => self
                .price_line(quote, line, price_over, price_under, priors, ctx)
                .map(PricedOpportunity::Line),
            Proposition::Yes { price_yes } => {
                Ok(PricedOpportunity::Binary(self.price_binary(quote, price_yes, ctx)))
            }
        }
    }

    fn price_line(
        &self,
        quote: &Quote,
        line: f64,
        price_over: Option<f64>,
        price_under: Option<f64>,
        priors: &PriorBook,
        ctx: &ContextSignals,
    ) -> Result<LinePricing, PricingError> {
        let prior = priors
            .lookup(&quote.player, &quote.team, quote.market)
            .ok_or_else(|| PricingError::InsufficientPrior {
                player: quote.player.clone(),
                market: quote.market,
            })?;

        let pipeline =
            AdjustmentPipeline::new(&self.config.volatility, &self.config.defaults.sd);
        let adj = pipeline.adjust(quote, prior, ctx)?;
        let probs = self.model.line_probabilities(adj.mean, adj.sd, line);

        let sizer = EdgeSizer::new(&self.config.risk);
        let over = sizer.price_side(Side::Over, probs.p_over, price_over, quote.line_kind);
        let under = sizer.price_side(Side::Under, probs.p_under, price_under, quote.line_kind);

        let sides = [over, under];
        let picked = sizer.pick(&sides);
        let pick = picked.map(|s| s.side);
        let recommendation = sizer.tier(picked.and_then(|s| s.ev));
        let [over, under] = sides;

        let no_vig_over = match (price_over, price_under) {
            (Some(o), Some(u)) => devig_american(o, u).map(|(p, _)| p),
            _ => None,
        };

        let mut notes = price_notes(&[&over, &under]);
        if adj.wind {
            notes.push(Note::Wind);
        }
        if adj.cold {
            notes.push(Note::Cold);
        }
        if adj.pressure {
            notes.push(Note::Pressure);
        }
        if adj.qb_lowtier {
            notes.push(Note::QbLowtier);
        }
        if adj.team.pace > STRONG_FACTOR {
            notes.push(Note::FastPace);
        }
        if adj.team.off_epa > STRONG_FACTOR {
            notes.push(Note::StrongTeamEpa);
        }
        if adj.default_sd {
            notes.push(Note::DefaultSd);
        }

        Ok(LinePricing {
            key: Self::key(quote),
            line,
            line_kind: quote.line_kind,
            adjusted_mean: adj.mean,
            adjusted_sd: adj.sd,
            over,
            under,
            no_vig_over,
            pick,
            recommendation,
            notes,
        })
    }

    fn price_binary(
        &self,
        quote: &Quote,
        price_yes: Option<f64>,
        ctx: &ContextSignals,
    ) -> BinaryPricing {
        let td = &self.config.touchdown;
        let team_td_rate = ctx.team_td_rate(&quote.team).unwrap_or(td.team_td_rate);
        let player_share = ctx.td_share(&quote.player).unwrap_or(td.player_share);
        let p_yes = touchdown_probability(team_td_rate, player_share);

        let sizer = EdgeSizer::new(&self.config.risk);
        let yes = sizer.price_side(Side::Yes, p_yes, price_yes, quote.line_kind);
        let recommendation = sizer.tier(yes.ev);
        let notes = price_notes(&[&yes]);

        BinaryPricing {
            key: Self::key(quote),
            team_td_rate,
            player_share,
            p_yes,
            yes,
            recommendation,
            notes,
        }
    }

    /// Price a slate on the current thread
    pub fn price_slate(
        &self,
        quotes: &[Quote],
        priors: &[crate::market::Prior],
        ctx: &ContextSignals,
    ) -> PricingReport {
        let book = PriorBook::new(priors);
        let results = quotes
            .iter()
            .map(|q| (q, self.price_quote(q, &book, ctx)))
            .collect::<Vec<_>>();
        collect_report(results)
    }
}

impl<'a, M: DistributionModel> SlatePricer<'a, M> {
    /// Price a slate across `workers` threads; output keeps input order
    pub fn price_parallel(
        &self,
        quotes: &[Quote],
        priors: &[crate::market::Prior],
        ctx: &ContextSignals,
        workers: usize,
    ) -> PricingReport {
        if quotes.is_empty() || workers <= 1 {
            return self.price_slate(quotes, priors, ctx);
        }

        let book = PriorBook::new(priors);
        let chunk_size = quotes.len().div_ceil(workers);

        let results = thread::scope(|scope| {
            let handles: Vec<_> = quotes
                .chunks(chunk_size)
                .map(|chunk| {
                    let book = &book;
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|q| (q, self.price_quote(q, book, ctx)))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|h| match h.join() {
                    Ok(rows) => rows,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect::<Vec<_>>()
        });

        collect_report(results)
    }
}

fn price_notes(sides: &[&SidePricing]) -> Vec<Note> {
    let mut notes = Vec::new();
    if sides.iter().any(|s| s.price.is_none()) {
        notes.push(Note::NoBookPrice);
    }
    if sides.iter().any(|s| s.invalid_price) {
        notes.push(Note::InvalidOdds);
    }
    notes
}

fn collect_report(results: Vec<(&Quote, Result<PricedOpportunity, PricingError>)>) -> PricingReport {
    let mut opportunities = Vec::with_capacity(results.len());
    let mut skipped = Vec::new();

    for (quote, result) in results {
        match result {
            Ok(opp) => {
                let (metric, invalid) = match &opp {
                    PricedOpportunity::Line(l) => (
                        CounterMetric::LineRowsPriced,
                        [l.over.invalid_price, l.under.invalid_price]
                            .iter()
                            .filter(|b| **b)
                            .count(),
                    ),
                    PricedOpportunity::Binary(b) => {
                        (CounterMetric::BinaryRowsPriced, usize::from(b.yes.invalid_price))
                    }
                };
                increment(metric, 1);
                if invalid > 0 {
                    tracing::warn!(
                        player = %quote.player,
                        market = %quote.market,
                        "Book price outside the American odds domain"
                    );
                    increment(CounterMetric::InvalidOdds, invalid as u64);
                }
                opportunities.push(opp);
            }
            Err(e) => {
                tracing::warn!(
                    game_id = %quote.game_id,
                    player = %quote.player,
                    market = %quote.market,
                    error = %e,
                    "Skipping row"
                );
                increment(CounterMetric::RowsSkipped, 1);
                skipped.push(SkippedRow {
                    game_id: quote.game_id.clone(),
                    player: quote.player.clone(),
                    market: quote.market,
                    reason: e.to_string(),
                });
            }
        }
    }

    let report = PricingReport::new(opportunities, skipped);
    set_gauge(GaugeMetric::GreenPicks, report.count_tier(Tier::Green) as f64);
    if let Some(best) = report.top_edges(1).first() {
        set_gauge(GaugeMetric::BestEdgePct, best.edge_pct);
    }

    tracing::info!(
        run_id = %report.run_id,
        priced = report.opportunities.len(),
        skipped = report.skipped.len(),
        "Priced slate"
    );

    report
}

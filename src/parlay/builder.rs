//! Bucketed parlay builder

use super::{ParlayLeg, ParlayResult};
use crate::config::{ParlayBucket, ParlayConfig};
use crate::pricing::PricedOpportunity;
use crate::telemetry::{increment, set_gauge, CounterMetric, GaugeMetric};

/// Leg probabilities are clamped into this range before combining
const MIN_LEG_PROBABILITY: f64 = 0.001;
const MAX_LEG_PROBABILITY: f64 = 0.999;

/// Builds one parlay per configured bucket
#[derive(Debug, Clone)]
pub struct ParlayBuilder<'a> {
    config: &'a ParlayConfig,
}

impl<'a> ParlayBuilder<'a> {
    pub fn new(config: &'a ParlayConfig) -> Self {
        Self { config }
    }

    /// One result per bucket in configuration order; empty buckets get the sentinel
    pub fn build(&self, opportunities: &[PricedOpportunity]) -> Vec<ParlayResult> {
        let candidates: Vec<ParlayLeg> = opportunities
            .iter()
            .filter_map(PricedOpportunity::picked_leg)
            .collect();

        let results: Vec<ParlayResult> = self
            .config
            .buckets
            .iter()
            .map(|bucket| self.build_bucket(bucket, &candidates))
            .collect();

        let best = results
            .iter()
            .filter(|r| !r.is_empty())
            .map(|r| r.ev)
            .fold(None, |best: Option<f64>, ev| Some(best.map_or(ev, |b| b.max(ev))));
        if let Some(ev) = best {
            set_gauge(GaugeMetric::BestParlayEv, ev);
        }

        results
    }

    /// Select and combine legs for a single bucket
    pub fn build_bucket(&self, bucket: &ParlayBucket, candidates: &[ParlayLeg]) -> ParlayResult {
        let min_edge = bucket.min_edge_points();
        let mut pool: Vec<ParlayLeg> = candidates
            .iter()
            .filter(|leg| leg.edge_pct >= min_edge)
            .cloned()
            .collect();

        // sort_by is stable, equal edges keep slate order
        pool.sort_by(|a, b| b.edge_pct.total_cmp(&a.edge_pct));
        pool.truncate(self.config.pool_cap);
        pool.truncate(bucket.max_legs);

        if pool.is_empty() {
            tracing::debug!(bucket = %bucket.name, min_edge, "No legs meet bucket minimum");
            increment(CounterMetric::EmptyParlayBuckets, 1);
            return ParlayResult::sentinel(&bucket.name);
        }

        let penalty = bucket
            .correlation_penalty
            .unwrap_or(self.config.correlation_penalty);
        let result = combine(&bucket.name, pool, penalty);

        tracing::info!(
            bucket = %result.bucket,
            legs = result.legs.len(),
            probability = result.probability,
            decimal_odds = result.decimal_odds,
            ev = result.ev,
            "Built parlay"
        );

        result
    }
}

/// Combine legs into a parlay, applying `penalty` once per leg
pub fn combine(bucket: &str, legs: Vec<ParlayLeg>, penalty: f64) -> ParlayResult {
    if legs.is_empty() {
        return ParlayResult::sentinel(bucket);
    }

    let probability = legs
        .iter()
        .map(|leg| leg.probability.clamp(MIN_LEG_PROBABILITY, MAX_LEG_PROBABILITY) * penalty)
        .product::<f64>();
    let decimal_odds = legs.iter().map(|leg| leg.decimal_odds).product::<f64>();

    ParlayResult {
        bucket: bucket.to_string(),
        legs,
        probability,
        decimal_odds,
        ev: probability * decimal_odds - 1.0,
    }
}

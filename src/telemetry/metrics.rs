//! Run metrics
//!
//! Recorded through the `metrics` facade; without an installed recorder the
//! calls are no-ops, so library code can record unconditionally.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Line market rows priced
    LineRowsPriced,
    /// Anytime touchdown rows priced
    BinaryRowsPriced,
    /// Rows skipped for missing priors or lines
    RowsSkipped,
    /// Sides left unpriced because of an out-of-domain price
    InvalidOdds,
    /// Parlay buckets that produced the empty sentinel
    EmptyParlayBuckets,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Opportunities tiered GREEN in the latest run
    GreenPicks,
    /// Best single-leg edge in percentage points
    BestEdgePct,
    /// Best parlay EV per unit in the latest run
    BestParlayEv,
}

fn counter_name(metric: CounterMetric) -> &'static str {
    match metric {
        CounterMetric::LineRowsPriced => "propedge_line_rows_priced_total",
        CounterMetric::BinaryRowsPriced => "propedge_binary_rows_priced_total",
        CounterMetric::RowsSkipped => "propedge_rows_skipped_total",
        CounterMetric::InvalidOdds => "propedge_invalid_odds_total",
        CounterMetric::EmptyParlayBuckets => "propedge_empty_parlay_buckets_total",
    }
}

fn gauge_name(metric: GaugeMetric) -> &'static str {
    match metric {
        GaugeMetric::GreenPicks => "propedge_green_picks",
        GaugeMetric::BestEdgePct => "propedge_best_edge_pct",
        GaugeMetric::BestParlayEv => "propedge_best_parlay_ev",
    }
}

/// Increment a counter
pub fn increment(metric: CounterMetric, by: u64) {
    let name = counter_name(metric);
    metrics::counter!(name).increment(by);
    tracing::trace!(metric = name, by, "Incremented counter");
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let name = gauge_name(metric);
    metrics::gauge!(name).set(value);
    tracing::debug!(metric = name, value, "Setting gauge");
}

/// Install the Prometheus recorder as the global metrics sink
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_are_prefixed() {
        for metric in [
            CounterMetric::LineRowsPriced,
            CounterMetric::BinaryRowsPriced,
            CounterMetric::RowsSkipped,
            CounterMetric::InvalidOdds,
            CounterMetric::EmptyParlayBuckets,
        ] {
            assert!(counter_name(metric).starts_with("propedge_"));
            assert!(counter_name(metric).ends_with("_total"));
        }
        assert_eq!(gauge_name(GaugeMetric::BestParlayEv), "propedge_best_parlay_ev");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        increment(CounterMetric::RowsSkipped, 1);
        set_gauge(GaugeMetric::GreenPicks, 3.0);
    }
}

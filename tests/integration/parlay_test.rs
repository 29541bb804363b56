//! Pricing through parlay construction

use prop_edge::config::{Config, ParlayBucket};
use prop_edge::context::ContextSignals;
use prop_edge::market::{MarketKind, Prior, Quote};
use prop_edge::parlay::ParlayBuilder;
use prop_edge::pricing::SlatePricer;

fn slate() -> (Vec<Quote>, Vec<Prior>) {
    let players = [
        ("A", 60.0, 55.5),
        ("B", 80.0, 70.5),
        ("C", 40.0, 39.5),
        ("D", 100.0, 85.5),
    ];
    let quotes = players
        .iter()
        .map(|(p, _, line)| {
            Quote::over_under("g", *p, "KC", MarketKind::ReceivingYards, *line, Some(-110.0), Some(-110.0))
        })
        .collect();
    let priors = players
        .iter()
        .map(|(p, mean, _)| Prior::new(*p, "KC", MarketKind::ReceivingYards, Some(*mean), Some(20.0)))
        .collect();
    (quotes, priors)
}

#[test]
fn test_buckets_from_priced_slate() {
    let config = Config::default();
    let (quotes, priors) = slate();
    let report = SlatePricer::new(&config).price_slate(&quotes, &priors, &ContextSignals::new());
    let parlays = ParlayBuilder::new(&config.parlays).build(&report.opportunities);

    assert_eq!(parlays.len(), 3);

    let safe = &parlays[0];
    assert_eq!(safe.bucket, "safe");
    assert_eq!(safe.legs.len(), 2);
    // D has the largest mean-to-line gap, B the next
    assert_eq!(safe.legs[0].player, "D");
    assert_eq!(safe.legs[1].player, "B");
    assert!(safe.legs[0].edge_pct >= safe.legs[1].edge_pct);

    let expected_prob: f64 = safe.legs.iter().map(|l| l.probability * 0.95).product();
    let expected_odds: f64 = safe.legs.iter().map(|l| l.decimal_odds).product();
    assert!((safe.probability - expected_prob).abs() < 1e-12);
    assert!((safe.decimal_odds - expected_odds).abs() < 1e-12);
    assert!((safe.ev - (expected_prob * expected_odds - 1.0)).abs() < 1e-12);
}

#[test]
fn test_unreachable_bucket_is_sentinel() {
    let mut config = Config::default();
    config.parlays.buckets = vec![ParlayBucket::new("impossible", 90.0, 4)];
    let (quotes, priors) = slate();
    let report = SlatePricer::new(&config).price_slate(&quotes, &priors, &ContextSignals::new());
    let parlays = ParlayBuilder::new(&config.parlays).build(&report.opportunities);

    assert_eq!(parlays.len(), 1);
    assert!(parlays[0].legs.is_empty());
    assert_eq!(parlays[0].probability, 0.0);
    assert_eq!(parlays[0].decimal_odds, 1.0);
    assert_eq!(parlays[0].ev, -1.0);
}

//! End-to-end slate pricing tests

use prop_edge::config::Config;
use prop_edge::data::SlateSnapshot;
use prop_edge::market::Side;
use prop_edge::pricing::{Note, SlatePricer};
use prop_edge::risk::Tier;

const SLATE: &str = r#"{
    "quotes": [
        {"game_id":"BUF@KC","player":"Travis Kelce","team":"KC","market":"receiving_yards",
         "line":55.5,"price_over":-120,"price_under":"+100","book":"draftkings"},
        {"game_id":"BUF@KC","player":"Josh Allen","team":"BUF","market":"Passing Yards",
         "line":262.5,"price_over":-110,"price_under":-110},
        {"game_id":"BUF@KC","player":"James Cook","team":"BUF","market":"rushing_yards",
         "line":70.5,"price_over":-115,"price_under":-105,"alt":true},
        {"game_id":"BUF@KC","player":"Isiah Pacheco","team":"KC","market":"anytime_td","odds_yes":"+110"},
        {"game_id":"BUF@KC","player":"Unknown Player","team":"KC","market":"receptions",
         "line":3.5,"price_over":-110,"price_under":-110}
    ],
    "priors": [
        {"player":"Travis Kelce","team":"KC","market":"receiving_yards","mean":60.0,"sd":20.0},
        {"player":"Josh Allen","team":"BUF","market":"passing_yards","mean":250.0},
        {"player":"James Cook","team":"BUF","market":"rushing_yards","mean":72.0,"sd":18.0}
    ],
    "context": {
        "team_factors": {"pace": {"BUF": 1.04}},
        "low_tier_qb": ["Josh Allen"],
        "top10_pressure": ["KC"],
        "weather": [{"game_id":"BUF@KC","temp_f":25.0,"wind_mph":18.0}],
        "schedule": [{"game_id":"BUF@KC","home":"KC","away":"BUF"}],
        "team_td_rates": {"KC": 2.8},
        "td_shares": {"Isiah Pacheco": 0.3}
    }
}"#;

#[test]
fn test_full_slate() {
    let config = Config::default();
    let slate = serde_json::from_str::<SlateSnapshot>(SLATE).unwrap().into_slate();
    let report = SlatePricer::new(&config).price_slate(&slate.quotes, &slate.priors, &slate.context);

    assert_eq!(report.opportunities.len(), 4);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].player, "Unknown Player");

    let lines: Vec<_> = report.lines().collect();
    let kelce = lines[0];
    assert_eq!(kelce.key.book.as_deref(), Some("draftkings"));
    // weather widens the sd: 20 * 1.10 * 1.05
    assert!((kelce.adjusted_sd - 23.1).abs() < 1e-9);
    assert!(kelce.notes.contains(&Note::Wind));
    assert!(kelce.notes.contains(&Note::Cold));
    assert!(!kelce.notes.contains(&Note::Pressure));

    let allen = lines[1];
    assert!((allen.adjusted_mean - 250.0 * 1.04).abs() < 1e-9);
    // default sd 45, wind, cold, pressure from KC, low-tier passer
    let expected_sd = 45.0 * 1.10 * 1.05 * 1.08 * 1.10;
    assert!((allen.adjusted_sd - expected_sd).abs() < 1e-9);
    for note in [Note::Pressure, Note::QbLowtier, Note::FastPace, Note::DefaultSd] {
        assert!(allen.notes.contains(&note), "missing {}", note);
    }

    let cook = lines[2];
    assert!(cook.over.kelly <= config.risk.kelly_cap_alt);
    assert!(cook.under.kelly <= config.risk.kelly_cap_alt);

    let td = report.binaries().next().unwrap();
    assert!((td.p_yes - (1.0 - (-0.84f64).exp())).abs() < 1e-12);
    assert_eq!(td.yes.side, Side::Yes);
    // p = 0.568 at +110: EV = 0.568 * 1.1 - 0.432 = 0.193
    assert_eq!(td.recommendation, Tier::Green);
}

#[test]
fn test_every_priced_side_respects_kelly_caps() {
    let config = Config::default();
    let slate = serde_json::from_str::<SlateSnapshot>(SLATE).unwrap().into_slate();
    let report = SlatePricer::new(&config).price_slate(&slate.quotes, &slate.priors, &slate.context);

    for line in report.lines() {
        for side in [&line.over, &line.under] {
            assert!(side.kelly >= 0.0);
            assert!(side.kelly <= config.risk.kelly_cap_straight);
        }
    }
}

#[test]
fn test_parallel_pricing_matches() {
    let config = Config::default();
    let slate = serde_json::from_str::<SlateSnapshot>(SLATE).unwrap().into_slate();
    let pricer = SlatePricer::new(&config);

    let seq = pricer.price_slate(&slate.quotes, &slate.priors, &slate.context);
    let par = pricer.price_parallel(&slate.quotes, &slate.priors, &slate.context, 3);
    assert_eq!(seq.opportunities, par.opportunities);
    assert_eq!(seq.skipped, par.skipped);
}

#[test]
fn test_missing_context_is_neutral() {
    let config = Config::default();
    let mut snapshot: SlateSnapshot = serde_json::from_str(SLATE).unwrap();
    snapshot.context = Default::default();
    let slate = snapshot.into_slate();
    let report = SlatePricer::new(&config).price_slate(&slate.quotes, &slate.priors, &slate.context);

    let kelce = report.lines().next().unwrap();
    assert_eq!(kelce.adjusted_mean, 60.0);
    assert_eq!(kelce.adjusted_sd, 20.0);
    assert!(kelce.notes.is_empty());

    let td = report.binaries().next().unwrap();
    assert_eq!(td.team_td_rate, config.touchdown.team_td_rate);
    assert_eq!(td.player_share, config.touchdown.player_share);
}

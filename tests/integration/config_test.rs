//! Configuration loading tests

use prop_edge::config::Config;
use std::io::Write;

#[test]
fn test_config_example_loads() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    config.validate().unwrap();

    assert_eq!(config.volatility.wind_threshold_mph, 15.0);
    assert_eq!(config.risk.kelly_cap_alt, 0.03);
    assert_eq!(config.parlays.buckets.len(), 3);
    assert_eq!(config.parlays.buckets[2].correlation_penalty, Some(0.92));
    assert_eq!(config.odds.markets.len(), 6);
    assert!(config.feeds.team_pace.is_none());
}

#[test]
fn test_partial_config_uses_defaults() {
    let config: Config = toml::from_str(
        r#"
        [risk]
        edge_green = 0.06
        "#,
    )
    .unwrap();

    assert_eq!(config.risk.edge_green, 0.06);
    assert_eq!(config.risk.edge_amber, 0.01);
    assert_eq!(config.touchdown.team_td_rate, 2.3);
    assert_eq!(config.parlays.pool_cap, 40);
}

#[test]
fn test_load_rejects_invalid_values() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[parlays]\ncorrelation_penalty = 1.5").unwrap();
    let err = Config::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("correlation_penalty"));
}

#[test]
fn test_invalid_file_is_not_replaced_by_example() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[risk]\nkelly_cap_straight = 1.5").unwrap();
    let err = Config::load_or_example(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("kelly_cap_straight"));

    let mut typo = tempfile::NamedTempFile::new().unwrap();
    writeln!(typo, "[risk\nedge_green = 0.05").unwrap();
    assert!(Config::load_or_example(typo.path()).is_err());
}

#[test]
fn test_missing_file_uses_example() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_or_example(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.parlays.buckets.len(), 3);
    assert_eq!(config.risk.kelly_cap_alt, 0.03);
}

#[test]
fn test_config_round_trips_through_toml() {
    let config = Config::default();
    let text = toml::to_string_pretty(&config).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed.parlays.buckets, config.parlays.buckets);
    assert_eq!(parsed.outputs.folder, config.outputs.folder);
}

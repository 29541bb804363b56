//! prop-edge: pricing engine for player prop markets
//!
//! This library provides the core components for:
//! - American odds math and vig removal
//! - Context-adjusted Normal pricing of over/under lines
//! - Anytime touchdown exposure pricing
//! - Edge measurement, recommendation tiers and capped Kelly sizing
//! - Bucketed parlay construction with a correlation penalty
//! - Team feed and sportsbook odds adapters
//! - Parquet and JSON run outputs
//! - Structured logging and run metrics

pub mod cli;
pub mod config;
pub mod context;
pub mod data;
pub mod market;
pub mod model;
pub mod odds;
pub mod parlay;
pub mod pricing;
pub mod provider;
pub mod risk;
pub mod telemetry;

//! CLI interface for prop-edge
//!
//! Provides subcommands for:
//! - `price`: Price a slate snapshot and write the run outputs
//! - `fetch-odds`: Pull bookmaker quotes into a slate snapshot
//! - `odds`: Convert a single American price
//! - `config`: Show the effective configuration

mod fetch;
mod odds;
mod price;

pub use fetch::FetchOddsArgs;
pub use odds::OddsArgs;
pub use price::PriceArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "prop-edge")]
#[command(about = "Player prop pricing, edge sizing and parlay building")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Price a slate snapshot
    Price(PriceArgs),
    /// Fetch bookmaker quotes into a slate snapshot
    FetchOdds(FetchOddsArgs),
    /// Convert an American price
    Odds(OddsArgs),
    /// Show configuration
    Config,
}

use clap::Parser;
use prop_edge::cli::{Cli, Commands};
use prop_edge::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration; only a missing file falls back to the example
    if !std::path::Path::new(&cli.config).exists() {
        eprintln!("Warning: {} not found, using default configuration", cli.config);
    }
    let config = Config::load_or_example(&cli.config)?;

    // Initialize telemetry
    let telemetry = prop_edge::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Price(args) => {
            tracing::info!(slate = ?args.slate, "Starting price run");
            let outcome = args.execute(&config).await?;
            if let Some(text) = telemetry.render_metrics() {
                let path = outcome.output_dir.join("metrics.prom");
                std::fs::write(&path, text)?;
                tracing::debug!(path = ?path, "Wrote metrics");
            }
        }
        Commands::FetchOdds(args) => {
            tracing::info!("Fetching odds");
            args.execute(&config).await?;
        }
        Commands::Odds(args) => {
            args.execute()?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

mod pulse;

use clap::{Parser, Subcommand};
use pulse_engine::InsightSource;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pulse-cli")]
#[command(about = "Food trend pulse command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score every tracked entity and print the insights
    Trends {
        /// Signal source: `mock` or `social`
        #[arg(long, default_value = "mock")]
        source: InsightSource,

        /// Seed for the mock source; defaults to `PULSE_MOCK_SEED`
        #[arg(long)]
        seed: Option<u64>,

        /// Print a one-line-per-entity table instead of JSON
        #[arg(long)]
        table: bool,
    },
    /// Print per-platform signal diagnostics
    Debug {
        /// Signal source: `mock` or `social`
        #[arg(long, default_value = "mock")]
        source: InsightSource,

        /// Seed for the mock source; defaults to `PULSE_MOCK_SEED`
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Validate environment and pulse file, then print a summary
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = pulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Trends {
            source,
            seed,
            table,
        } => pulse::run_trends(&config, source, seed, table).await,
        Commands::Debug { source, seed } => pulse::run_debug(&config, source, seed).await,
        Commands::CheckConfig => pulse::run_check_config(&config),
    }
}

#[cfg(test)]
mod tests;

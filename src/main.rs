mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use habitus::config::HabitusConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "habitus", version, about = "Personal habit tracker with a local LLM coach")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve,
    /// Save one batch of scores, e.g. `habitus save "Exercise daily=4" "Drink water=7"`
    Save {
        /// TASK=SCORE pairs
        #[arg(required = true)]
        scores: Vec<String>,
    },
    /// Print average progress per task over the last N days
    Summary {
        /// Window length in days (defaults to summary.default_days)
        #[arg(short, long)]
        days: Option<u32>,
        /// Read from the sample store or the history file
        #[arg(long, value_enum, default_value = "store")]
        source: cli::summary::Source,
    },
    /// Ask the assistant about your progress
    Chat {
        question: String,
    },
    /// Export all samples as JSON to stdout
    Export,
    /// Check database health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = HabitusConfig::load()?;

    // Log to stderr so stdout stays clean for export/summary output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => habitus::server::serve(config).await?,
        Command::Save { scores } => cli::save::save(&config, &scores)?,
        Command::Summary { days, source } => cli::summary::summary(&config, days, source)?,
        Command::Chat { question } => cli::chat::chat(&config, &question).await?,
        Command::Export => cli::export::export(&config)?,
        Command::Doctor => cli::doctor::doctor(&config)?,
    }

    Ok(())
}

pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::{StoreBackend, StoreConfig};

#[derive(Parser)]
#[command(name = "todoctl")]
#[command(about = "Todoctl - operator tooling for the Todo API document store")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Load records from a JSON array file into a collection")]
    Seed(commands::seed::SeedArgs),

    #[command(about = "Check document store connectivity")]
    Health,
}

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let store_config = &crate::config::config().store;
    if matches!(cli.command, Commands::Seed(_)) {
        require_persistent_store(store_config)?;
    }
    let store = crate::connect_store(store_config).await?;

    match cli.command {
        Commands::Seed(args) => commands::seed::handle(args, store, output_format).await,
        Commands::Health => commands::health::handle(store, output_format).await,
    }
}

/// Seeding an in-memory store would discard every record on exit.
fn require_persistent_store(config: &StoreConfig) -> anyhow::Result<()> {
    if config.backend == StoreBackend::Memory {
        anyhow::bail!("seed needs a persistent store; set DATABASE_URL or STORE_BACKEND=postgres");
    }
    Ok(())
}

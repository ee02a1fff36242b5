mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::{MigrateArgs, Settings};

#[derive(Parser)]
#[command(name = "hooks-store", version)]
#[command(about = "Index agent hook events into Meilisearch", long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP ingest server (default)
    Serve,
    /// Backfill derived fields on documents that are already indexed
    Migrate(MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve::run(&cli.settings).await?,
        Commands::Migrate(args) => commands::migrate::run(&cli.settings, &args).await?,
    }

    Ok(())
}

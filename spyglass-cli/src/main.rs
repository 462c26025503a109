//! Spyglass CLI - Command-line interface
//!
//! Provides command-line access to the Spyglass addon server and the
//! query-interpretation pipeline.

mod commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "spyglass")]
#[command(about = "An AI catalog companion for Stremio")]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::handle_command(cli.command).await?;

    Ok(())
}

mod commands;
mod render;
mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use weekgrid_core::config::{GridConfig, GridSettings};

#[derive(Parser)]
#[command(name = "weekgrid")]
#[command(about = "Combine personal calendars into a weekly availability grid")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the grid's slot ids for manual calendars
    Slots,
    /// Print the combined grid of every calendar in a session file as JSON
    Combined {
        /// Session file listing the calendars to combine
        session: PathBuf,
    },
    /// Print one person's grid as JSON
    Show {
        session: PathBuf,

        /// Display name used in the session file
        user: String,
    },
    /// Draw the combined grid as a heat map
    Grid {
        session: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = load_settings()?;

    match cli.command {
        Commands::Slots => commands::slots::run(&settings),
        Commands::Combined { session } => commands::combined::run(&session, &settings).await,
        Commands::Show { session, user } => commands::show::run(&session, &user, &settings).await,
        Commands::Grid { session } => commands::grid::run(&session, &settings).await,
    }
}

fn load_settings() -> Result<GridSettings> {
    let config = GridConfig::load().context("Failed to load weekgrid configuration")?;
    config
        .settings()
        .context("Invalid weekgrid configuration")
}

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use msgflow::{Config, Engine};

#[derive(Parser)]
#[command(name = "msgflow")]
#[command(about = "Extracts cross-service message flows as sequence diagram fragments")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Target file (defaults to msgflow.toml)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Extract the flow started by one message
    Extract {
        /// Analyzed types JSON produced by the front end
        #[arg(short, long)]
        input: PathBuf,

        /// Full name of the originating message
        #[arg(short, long)]
        message: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract one flow per command
    Commands {
        /// Analyzed types JSON produced by the front end
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Init { path } => {
                let path = path.unwrap_or_else(|| PathBuf::from("msgflow.toml"));
                Config::default()
                    .save(&path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Wrote default configuration to {}", path.display());
                Ok(())
            }
            Commands::Extract { input, message, output } => {
                let engine = Engine::from_files(self.config.as_deref(), &input).await?;
                let extraction = engine.extract(&message)?;
                write_json(&extraction, output.as_deref()).await
            }
            Commands::Commands { input, output } => {
                let engine = Engine::from_files(self.config.as_deref(), &input).await?;
                let diagrams = engine.extract_commands().await?;
                write_json(&diagrams, output.as_deref()).await
            }
        }
    }
}

async fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    match output {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use review_desk::config::DeskConfig;

mod cmd;

#[derive(Parser)]
#[command(name = "review-desk")]
#[command(
    version,
    about = "Upload source files and get a README, a bug report, or suggestions from Gemini"
)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to review-desk.toml. Defaults to the one in the current directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the upload page and the /upload endpoint
    Serve {
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to serve on
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable dev mode (permissive CORS)
        #[arg(long)]
        dev: bool,

        /// Open the page in a browser once the server is up
        #[arg(long)]
        open: bool,
    },
    /// Review local files once and print the JSON result
    Review {
        /// Gemini API key
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Task to run; repeat for several
        #[arg(short, long = "task", value_parser = ["readme", "debug", "suggest"])]
        tasks: Vec<String>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Files to review
        files: Vec<PathBuf>,
    },
    /// View or create configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a default review-desk.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let project_dir = std::env::current_dir().context("Failed to get current directory")?;

    let config = DeskConfig::resolve(cli.config.as_deref(), &project_dir)?;
    let _log_guard = review_desk::logging::init(&config.logging, cli.verbose)?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            dev,
            open,
        } => cmd::cmd_serve(config, host, port, dev, open).await?,
        Commands::Review {
            api_key,
            tasks,
            pretty,
            files,
        } => cmd::cmd_review(&config, api_key, &tasks, &files, pretty).await?,
        Commands::Config { command } => cmd::cmd_config(&project_dir, &config, command)?,
    }

    Ok(())
}

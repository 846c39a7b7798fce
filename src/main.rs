use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod clock;
mod config;
mod daemon;
mod engine;
mod error;
mod state;
mod store;
mod types;

use crate::config::{Config, StorageBackend};
use crate::daemon::ClickerDaemon;

#[derive(Debug, Parser)]
#[command(name = "dojo-clicker", version, about = "Idle clicker game server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP game server (default)
    Serve(ServeArgs),
    /// Write a config file populated with the defaults
    InitConfig {
        #[arg(long)]
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Default, Args)]
struct ServeArgs {
    /// Config file (default: ~/.dojo-clicker/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    port: Option<u16>,
    /// Keep players in memory only
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::Serve(args) => serve(args).await,
        Command::InitConfig { path, force } => init_config(path, force),
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.memory {
        config.storage.backend = StorageBackend::Memory;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║                 DOJO CLICKER v{:<8}                 ║", env!("CARGO_PKG_VERSION"));
    println!("╚════════════════════════════════════════════════════════╝\n");

    info!("📝 Configuration loaded");
    info!("  Listen: {}:{}", config.server.host, config.server.port);
    info!("  Storage: {:?} ({:?})", config.storage.backend, config.storage.data_dir);

    let daemon = ClickerDaemon::new(config).await?;
    daemon.run().await
}

fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path.unwrap_or_else(Config::config_path);
    if path.exists() && !force {
        bail!("Config already exists at {:?} (use --force to overwrite)", path);
    }

    Config::default().save(&path)?;
    println!("✅ Wrote default config to {:?}", path);
    Ok(())
}

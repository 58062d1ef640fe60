//! lostfound - interactive lost-and-found tracker.
//!
//! Users report and claim items; admins review, prune and export them.

mod app;
mod config;
mod handlers;
mod ui;

use anyhow::Result;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use app::App;

/// lostfound - track lost and found items from the terminal
#[derive(Parser, Debug)]
#[command(name = "lostfound")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Item snapshot file (overrides config)
    #[arg(short, long, value_name = "FILE")]
    items: Option<PathBuf>,

    /// Credential file (overrides config)
    #[arg(short, long, value_name = "FILE")]
    users: Option<PathBuf>,

    /// Export destination (overrides config)
    #[arg(short, long, value_name = "FILE")]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so they never interleave with the prompts
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lostfound=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = config::Config::load(args.config)?;

    if let Some(items) = args.items {
        tracing::info!("Overriding items path from CLI: {}", items.display());
        config.items_path = items;
    }
    if let Some(users) = args.users {
        config.users_path = users;
    }
    if let Some(export) = args.export {
        config.export_path = export;
    }

    tracing::info!(
        items = %config.items_path.display(),
        users = %config.users_path.display(),
        "Starting lostfound"
    );

    let stdin = io::stdin();
    let mut app = App::new(config, stdin.lock(), io::stdout());
    app.run()
}

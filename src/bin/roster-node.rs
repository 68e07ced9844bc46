#![forbid(unsafe_code)]
//! Long-running node binary: REST API plus the round-robin mining loop

use clap::Parser;
use rosterchain::config::{load_config, load_config_from};
use rosterchain::node::Node;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML config file (defaults to ./config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    let node = Node::init(config)?;
    node.start().await
}

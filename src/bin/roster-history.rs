#![forbid(unsafe_code)]
//! Show per-block balance changes for one account

use clap::Parser;
use serde_json::Value;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port of the node to talk to
    #[arg(long, default_value_t = 8001)]
    node: u16,
    /// Account to report on
    account: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let url = format!("http://127.0.0.1:{}/history/{}", cli.node, cli.account);
    let reply: Value = reqwest::get(&url).await?.json().await?;

    let entries: Vec<(u64, i64)> = serde_json::from_value(reply["history"].clone())?;
    if entries.is_empty() {
        println!("No history for {}", cli.account);
        return Ok(());
    }

    println!("History for {}:", cli.account);
    for (block, change) in entries {
        println!("  block {:>4}  {:+}", block, change);
    }

    Ok(())
}

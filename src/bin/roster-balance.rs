#![forbid(unsafe_code)]
//! Query account balances from a running node

use clap::Parser;
use std::collections::BTreeMap;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port of the node to talk to
    #[arg(long, default_value_t = 8001)]
    node: u16,
    /// Show only this account (all accounts when omitted)
    account: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let url = format!("http://127.0.0.1:{}/state", cli.node);
    let balances: BTreeMap<String, i64> = reqwest::get(&url).await?.json().await?;

    match &cli.account {
        Some(account) => {
            let balance = balances.get(account).copied().unwrap_or(0);
            println!("{}: {}", account, balance);
        }
        None => {
            if balances.is_empty() {
                println!("No balances yet (chain has no genesis block)");
            }
            for (account, balance) in &balances {
                println!("{}: {}", account, balance);
            }
        }
    }

    Ok(())
}

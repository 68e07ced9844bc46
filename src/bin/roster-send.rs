#![forbid(unsafe_code)]
//! Submit a transaction to a running node

use clap::Parser;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port of the node to talk to
    #[arg(long, default_value_t = 8001)]
    node: u16,
    /// Account the funds come from
    sender: String,
    /// Account the funds go to
    recipient: String,
    /// Amount to transfer
    amount: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let url = format!("http://127.0.0.1:{}/transactions/new", cli.node);
    let body = json!({
        "sender": cli.sender,
        "recipient": cli.recipient,
        "amount": cli.amount,
    });

    let client = reqwest::Client::new();
    let response = client.post(&url).json(&body).send().await?;
    let status = response.status();
    let reply: Value = response.json().await?;

    if status.is_success() {
        let message = reply["message"].as_str().unwrap_or("Transaction queued");
        println!("{}", message);
    } else {
        let error = reply["error"].as_str().unwrap_or("unknown error");
        eprintln!("Rejected ({}): {}", status.as_u16(), error);
        std::process::exit(1);
    }

    Ok(())
}

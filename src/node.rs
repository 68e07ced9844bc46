//! Node orchestration: wire the engine, the mining task and the API together

use crate::api::{run_api_server, ApiContext};
use crate::broadcast::{Broadcaster, HttpBroadcaster};
use crate::chain::Blockchain;
use crate::config::Config;
use crate::miner::Miner;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

pub struct Node {
    pub config: Config,
    pub chain: Arc<RwLock<Blockchain>>,
}

impl Node {
    /// Build the engine from a loaded config.
    pub fn init(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        tracing_subscriber::fmt::init();

        let chain = Blockchain::new(config.network.peers.clone(), config.node.id)?;
        info!(
            node_id = config.node.id,
            roster = ?config.network.peers,
            interval_secs = config.miner.block_interval_secs,
            "starting node"
        );

        Ok(Self {
            config,
            chain: Arc::new(RwLock::new(chain)),
        })
    }

    /// Spawn the mining loop and serve the API until the process is stopped.
    pub async fn start(self) -> Result<(), Box<dyn std::error::Error>> {
        let broadcaster: Arc<dyn Broadcaster> = Arc::new(HttpBroadcaster::new());
        let miner = Miner::new(
            self.chain.clone(),
            broadcaster,
            Duration::from_secs(self.config.miner.block_interval_secs),
        );
        miner.spawn();

        let ctx = Arc::new(ApiContext::new(self.chain.clone()));
        run_api_server(ctx, self.config.node.id).await
    }
}

//! The periodic block-production task

use crate::block::{Block, NodeId};
use crate::broadcast::Broadcaster;
use crate::chain::Blockchain;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Drives the sleep-then-produce cycle for one node.
///
/// Every interval tick the miner checks, under the chain lock, whether the
/// next block is this node's turn. When it is, the block is assembled and
/// applied right there; delivery to the rest of the roster happens after the
/// lock is released. Nodes that are off turn simply sleep through the tick,
/// and the interval doubles as the batching window for pending transactions.
pub struct Miner {
    chain: Arc<RwLock<Blockchain>>,
    broadcaster: Arc<dyn Broadcaster>,
    interval: Duration,
}

impl Miner {
    pub fn new(
        chain: Arc<RwLock<Blockchain>>,
        broadcaster: Arc<dyn Broadcaster>,
        interval: Duration,
    ) -> Self {
        Self {
            chain,
            broadcaster,
            interval,
        }
    }

    /// One production cycle: mine if it is our turn, then broadcast. Returns
    /// the block that was produced, if any.
    pub async fn mine_once(&self) -> Option<Block> {
        let (block, peers) = {
            let mut chain = self.chain.write().await;
            if !chain.is_my_turn() {
                return None;
            }
            let block = chain.mine_block();
            let peers: Vec<NodeId> = chain
                .nodes()
                .iter()
                .copied()
                .filter(|&node| node != chain.node_id())
                .collect();
            (block, peers)
        };

        self.broadcaster.broadcast_block(&block, &peers).await;
        Some(block)
    }

    /// Run the production loop forever: wait out the batching interval, then
    /// attempt one cycle.
    pub async fn run(self) {
        info!(interval_secs = self.interval.as_secs(), "miner loop started");
        loop {
            debug!("waiting for transactions before the next production attempt");
            tokio::time::sleep(self.interval).await;
            self.mine_once().await;
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

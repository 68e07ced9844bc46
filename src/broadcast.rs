//! Block delivery to peers

use crate::block::{Block, NodeId};
use crate::error::{ChainError, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

fn inform_url(peer: NodeId) -> String {
    format!("http://127.0.0.1:{}/inform/block", peer)
}

/// Delivery seam between the mining loop and the peer network. Implementations
/// log and swallow per-peer failures; the local chain has already moved on and
/// nothing is retried.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn broadcast_block(&self, block: &Block, peers: &[NodeId]);
}

/// POSTs finished blocks to each peer's inform endpoint.
pub struct HttpBroadcaster {
    client: reqwest::Client,
}

impl HttpBroadcaster {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn deliver(&self, block: &Block, peer: NodeId) -> Result<()> {
        let response = self
            .client
            .post(inform_url(peer))
            .json(block)
            .send()
            .await
            .map_err(|e| ChainError::Broadcast {
                node: peer,
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ChainError::Broadcast {
                node: peer,
                reason: format!("peer answered {}", response.status()),
            });
        }
        Ok(())
    }
}

impl Default for HttpBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Broadcaster for HttpBroadcaster {
    async fn broadcast_block(&self, block: &Block, peers: &[NodeId]) {
        for &peer in peers {
            match self.deliver(block, peer).await {
                Ok(()) => debug!(peer, number = block.number(), "delivered block"),
                Err(e) => warn!(peer, error = %e, "block delivery failed"),
            }
        }
    }
}

/// Discards every block. Backs tests and single-node setups.
pub struct NullBroadcaster;

#[async_trait]
impl Broadcaster for NullBroadcaster {
    async fn broadcast_block(&self, _block: &Block, _peers: &[NodeId]) {}
}

//! The consensus engine: canonical chain, mempool, and the round-robin
//! production schedule

use crate::block::{short_hash, Block, NodeId, GENESIS_PREVIOUS_HASH};
use crate::error::{ChainError, Result};
use crate::state::Ledger;
use crate::transaction::{Account, Transaction};
use tracing::{info, warn};

/// One node's view of the replicated ledger: the append-only chain, the
/// pending-transaction pool, the balance projection, and the fixed ordered
/// roster the production schedule walks.
///
/// The chain, ledger and mempool move together: a block is appended, applied
/// and pruned from the pool as one unit, and never partially. Callers that
/// share a `Blockchain` across tasks wrap it in a single lock for the same
/// reason.
pub struct Blockchain {
    chain: Vec<Block>,
    mempool: Vec<Transaction>,
    ledger: Ledger,
    nodes: Vec<NodeId>,
    node_id: NodeId,
}

impl Blockchain {
    /// Create an empty chain for `node_id` within the ordered `nodes` roster.
    pub fn new(nodes: Vec<NodeId>, node_id: NodeId) -> Result<Self> {
        if nodes.is_empty() {
            return Err(ChainError::InvalidRoster(
                "the node roster is empty".to_string(),
            ));
        }
        if !nodes.contains(&node_id) {
            return Err(ChainError::InvalidRoster(format!(
                "node {} is not in the roster",
                node_id
            )));
        }
        let mut deduped = nodes.clone();
        deduped.sort_unstable();
        deduped.dedup();
        if deduped.len() != nodes.len() {
            return Err(ChainError::InvalidRoster(
                "the roster contains duplicate nodes".to_string(),
            ));
        }

        Ok(Blockchain {
            chain: Vec::new(),
            mempool: Vec::new(),
            ledger: Ledger::new(),
            nodes,
            node_id,
        })
    }

    pub fn height(&self) -> u64 {
        self.chain.len() as u64
    }

    pub fn tip(&self) -> Option<&Block> {
        self.chain.last()
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Transactions waiting for a block, in submission order.
    pub fn pending(&self) -> &[Transaction] {
        &self.mempool
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Queue a transfer for a future block. Nothing is checked here; whether
    /// the sender can cover the amount is decided at mining time.
    pub fn new_transaction(&mut self, sender: Account, recipient: Account, amount: u64) {
        let tx = Transaction::new(sender, recipient, amount);
        info!(%tx, pending = self.mempool.len() + 1, "queued transaction");
        self.mempool.push(tx);
    }

    /// Number the next block will carry.
    pub fn next_number(&self) -> u64 {
        self.chain.len() as u64 + 1
    }

    /// The node whose turn it is to produce block `number` (1-indexed):
    /// block numbers walk the roster in order and wrap around.
    pub fn expected_miner(&self, number: u64) -> NodeId {
        self.nodes[((number - 1) % self.nodes.len() as u64) as usize]
    }

    pub fn is_my_turn(&self) -> bool {
        self.expected_miner(self.next_number()) == self.node_id
    }

    /// Run the full validity check for an inbound block against the current
    /// chain and ledger. Passing means the block can be appended as-is.
    ///
    /// Every rule must hold: the claimed digest matches the contents, the
    /// number continues the chain, the previous-hash links to our tip (or is
    /// the genesis sentinel for block 1), the transaction list survives the
    /// appliability filter unchanged, and the producer was on turn. The
    /// sequencing rule runs before the linkage rule so there is always a tip
    /// to link against when one is required.
    pub fn validate_block(&self, block: &Block) -> Result<()> {
        if !block.verify_digest() {
            return Err(ChainError::DigestMismatch);
        }

        let expected_number = self.next_number();
        if block.number() != expected_number {
            return Err(ChainError::WrongNumber {
                expected: expected_number,
                got: block.number(),
            });
        }

        let expected_previous = match self.tip() {
            Some(tip) => *tip.hash(),
            None => GENESIS_PREVIOUS_HASH,
        };
        if *block.previous_hash() != expected_previous {
            return Err(ChainError::BrokenLinkage {
                number: block.number(),
                expected: hex::encode(expected_previous),
                got: hex::encode(block.previous_hash()),
            });
        }

        if self.ledger.validate_txns(block.transactions()) != block.transactions() {
            return Err(ChainError::InvalidTransactions {
                number: block.number(),
            });
        }

        let expected_miner = self.expected_miner(block.number());
        if block.miner() != expected_miner {
            return Err(ChainError::WrongMiner {
                number: block.number(),
                expected: expected_miner,
                got: block.miner(),
            });
        }

        Ok(())
    }

    /// Validate an inbound block and, on success, append it, apply it to the
    /// ledger and prune the mempool, as one unit. A rejected block leaves
    /// every piece of state untouched.
    pub fn accept_block(&mut self, block: Block) -> Result<()> {
        if let Err(e) = self.validate_block(&block) {
            warn!(
                number = block.number(),
                hash = %short_hash(block.hash()),
                error = %e,
                "rejected block"
            );
            return Err(e);
        }
        info!(
            number = block.number(),
            hash = %short_hash(block.hash()),
            miner = block.miner(),
            txns = block.transactions().len(),
            "accepted block"
        );
        self.apply_accepted(block);
        Ok(())
    }

    /// Assemble, append and apply the next block. On an empty chain this
    /// produces the genesis block (no transactions, sentinel linkage);
    /// otherwise the mempool is sorted and filtered down to the transfers
    /// that apply cleanly, and the survivors form the block body. Returns
    /// the finished block so the caller can broadcast it.
    pub fn mine_block(&mut self) -> Block {
        let block = match self.tip() {
            None => Block::new(1, Vec::new(), GENESIS_PREVIOUS_HASH, self.node_id),
            Some(tip) => {
                let mut candidates = self.mempool.clone();
                candidates.sort();
                let accepted = self.ledger.validate_txns(&candidates);
                Block::new(self.next_number(), accepted, *tip.hash(), self.node_id)
            }
        };
        info!(
            number = block.number(),
            hash = %short_hash(block.hash()),
            txns = block.transactions().len(),
            "mined block"
        );
        self.apply_accepted(block.clone());
        block
    }

    /// Net balance change of `account` per block, oldest first.
    pub fn history(&self, account: &str) -> Vec<(u64, i64)> {
        Ledger::history(&self.chain, account)
    }

    // The shared append path for mined and inbound blocks. The block is
    // already known valid; genesis seeds the opening allocation instead of
    // applying its (empty) transaction list.
    fn apply_accepted(&mut self, block: Block) {
        if block.is_genesis() {
            self.ledger.credit_genesis();
        } else {
            self.ledger.apply_block(&block);
        }
        self.mempool.retain(|tx| !block.transactions().contains(tx));
        self.chain.push(block);
    }
}

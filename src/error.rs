//! Error types for RosterChain

use crate::block::NodeId;
use thiserror::Error;

/// Everything that can go wrong inside the consensus engine. The block
/// validity checks each map to their own variant so callers (and peers
/// reading a rejection response) can tell exactly which rule failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("Block digest does not match block contents")]
    DigestMismatch,
    #[error("Invalid block number: expected {expected}, but got {got}")]
    WrongNumber { expected: u64, got: u64 },
    #[error("Invalid linkage for block {number}: expected previous hash {expected}, but got {got}")]
    BrokenLinkage {
        number: u64,
        expected: String,
        got: String,
    },
    #[error("Block {number} carries transactions that do not apply cleanly")]
    InvalidTransactions { number: u64 },
    #[error("Block {number} mined out of turn: expected node {expected}, but got {got}")]
    WrongMiner {
        number: u64,
        expected: NodeId,
        got: NodeId,
    },
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),
    #[error("Broadcast to node {node} failed: {reason}")]
    Broadcast { node: NodeId, reason: String },
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;

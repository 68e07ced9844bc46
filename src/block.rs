//! Blocks: content-hashed containers of ordered transaction batches

use crate::transaction::Transaction;
use sha2::{Digest, Sha256};
use std::fmt;

pub type BlockHash = [u8; 32];

/// Node identifier. Nodes are addressed by the loopback port they serve on.
pub type NodeId = u16;

/// Previous-hash sentinel carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: BlockHash = [
    0xfe, 0xed, 0xca, 0xfe, 0xfe, 0xed, 0xca, 0xfe, 0xfe, 0xed, 0xca, 0xfe, 0xfe, 0xed, 0xca,
    0xfe, 0xfe, 0xed, 0xca, 0xfe, 0xfe, 0xed, 0xca, 0xfe, 0xfe, 0xed, 0xca, 0xfe, 0xfe, 0xed,
    0xca, 0xfe,
];

/// One link of the chain: a batch of transactions applied in order, plus the
/// linkage metadata that pins the batch to a position in the history.
///
/// The digest is computed once, at construction, over every other field.
/// Fields stay private so nothing can drift away from the stored digest after
/// the fact; blocks decoded from the wire carry the producer's digest as a
/// claim that [`Block::verify_digest`] checks.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Block {
    number: u64,
    transactions: Vec<Transaction>,
    previous_hash: BlockHash,
    miner: NodeId,
    hash: BlockHash,
}

impl Block {
    pub fn new(
        number: u64,
        transactions: Vec<Transaction>,
        previous_hash: BlockHash,
        miner: NodeId,
    ) -> Self {
        let hash = compute_block_hash(number, &transactions, &previous_hash, miner);
        Block {
            number,
            transactions,
            previous_hash,
            miner,
            hash,
        }
    }

    /// 1-indexed position in the chain.
    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn previous_hash(&self) -> &BlockHash {
        &self.previous_hash
    }

    pub fn miner(&self) -> NodeId {
        self.miner
    }

    pub fn hash(&self) -> &BlockHash {
        &self.hash
    }

    pub fn is_genesis(&self) -> bool {
        self.number == 1
    }

    /// Recompute the digest from the block's own fields and compare it with
    /// the stored one.
    pub fn verify_digest(&self) -> bool {
        compute_block_hash(self.number, &self.transactions, &self.previous_hash, self.miner)
            == self.hash
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "B(#{}, number {}, {} txns, miner {})",
            short_hash(&self.hash),
            self.number,
            self.transactions.len(),
            self.miner
        )
    }
}

/// First eight hex characters of a digest, for logs.
pub fn short_hash(hash: &BlockHash) -> String {
    hex::encode(&hash[..4])
}

/// SHA-256 over an injective encoding of the block fields: fixed-width
/// integers, a transaction count, and length-prefixed account strings, so
/// distinct field tuples can never produce the same byte stream.
fn compute_block_hash(
    number: u64,
    transactions: &[Transaction],
    previous_hash: &BlockHash,
    miner: NodeId,
) -> BlockHash {
    let mut hasher = Sha256::new();
    hasher.update(number.to_le_bytes());
    hasher.update((transactions.len() as u64).to_le_bytes());
    for tx in transactions {
        hasher.update((tx.sender.len() as u64).to_le_bytes());
        hasher.update(tx.sender.as_bytes());
        hasher.update((tx.recipient.len() as u64).to_le_bytes());
        hasher.update(tx.recipient.as_bytes());
        hasher.update(tx.amount.to_le_bytes());
    }
    hasher.update(previous_hash);
    hasher.update(miner.to_le_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_txns() -> Vec<Transaction> {
        vec![
            Transaction::new("A".to_string(), "B".to_string(), 100),
            Transaction::new("B".to_string(), "C".to_string(), 50),
        ]
    }

    #[test]
    fn test_digest_is_deterministic() {
        let a = Block::new(2, sample_txns(), [7u8; 32], 8002);
        let b = Block::new(2, sample_txns(), [7u8; 32], 8002);
        assert_eq!(a.hash(), b.hash());
        assert!(a.verify_digest());
    }

    #[test]
    fn test_digest_covers_every_field() {
        let base = Block::new(2, sample_txns(), [7u8; 32], 8002);

        let bumped_number = Block::new(3, sample_txns(), [7u8; 32], 8002);
        let other_miner = Block::new(2, sample_txns(), [7u8; 32], 8003);
        let other_parent = Block::new(2, sample_txns(), [8u8; 32], 8002);

        let mut reversed = sample_txns();
        reversed.reverse();
        let reordered = Block::new(2, reversed, [7u8; 32], 8002);

        let mut richer = sample_txns();
        richer[0].amount += 1;
        let amended = Block::new(2, richer, [7u8; 32], 8002);

        for other in [bumped_number, other_miner, other_parent, reordered, amended] {
            assert_ne!(base.hash(), other.hash());
        }
    }

    #[test]
    fn test_field_boundaries_do_not_collide() {
        // Shifting bytes across the sender/recipient boundary must change the digest.
        let left = Block::new(
            2,
            vec![Transaction::new("ab".to_string(), "c".to_string(), 1)],
            [0u8; 32],
            1,
        );
        let right = Block::new(
            2,
            vec![Transaction::new("a".to_string(), "bc".to_string(), 1)],
            [0u8; 32],
            1,
        );
        assert_ne!(left.hash(), right.hash());
    }

    #[test]
    fn test_serde_round_trip_preserves_digest_and_order() {
        let original = Block::new(2, sample_txns(), GENESIS_PREVIOUS_HASH, 8001);
        let encoded = serde_json::to_string(&original).expect("Failed to encode block");
        let decoded: Block = serde_json::from_str(&encoded).expect("Failed to decode block");
        assert_eq!(decoded, original);
        assert_eq!(decoded.transactions(), original.transactions());
        assert!(decoded.verify_digest());
    }

    #[test]
    fn test_tampered_fields_fail_digest_verification() {
        let mut block = Block::new(2, sample_txns(), [7u8; 32], 8002);
        block.number = 9;
        assert!(!block.verify_digest());

        let mut block = Block::new(2, sample_txns(), [7u8; 32], 8002);
        block.transactions[0].amount = 1;
        assert!(!block.verify_digest());
    }

    #[test]
    fn test_genesis_sentinel_is_fixed() {
        let genesis = Block::new(1, Vec::new(), GENESIS_PREVIOUS_HASH, 8001);
        assert!(genesis.is_genesis());
        assert_eq!(hex::encode(genesis.previous_hash()), "feedcafe".repeat(8));
    }
}

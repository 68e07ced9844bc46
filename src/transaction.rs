//! Value-transfer transactions

use std::fmt;

/// Account identifier. Plain opaque strings; authorship is not verified.
pub type Account = String;

/// A transfer of `amount` units from `sender` to `recipient`.
///
/// Equality is structural, and the derived ordering is lexicographic on
/// `(sender, recipient, amount)`, which is what gives the mempool a
/// deterministic batch order at mining time. Two submissions with identical
/// field values are indistinguishable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Transaction {
    pub sender: Account,
    pub recipient: Account,
    pub amount: u64,
}

impl Transaction {
    pub fn new(sender: Account, recipient: Account, amount: u64) -> Self {
        Transaction {
            sender,
            recipient,
            amount,
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "T({} -> {}: {})", self.sender, self.recipient, self.amount)
    }
}

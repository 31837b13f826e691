use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::transaction::Transaction;

/// A single block in the ledger holding the transactions drained from the pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: String, // creation time, informational only
    pub puzzle_solution: u64,
    pub previous_hash: String,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Build a block stamped with the current UTC time.
    pub fn new(
        index: u64,
        puzzle_solution: u64,
        previous_hash: String,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            index,
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            puzzle_solution,
            previous_hash,
            transactions,
        }
    }

    /// SHA-256 over the canonical JSON form of the block.
    ///
    /// The block is first lowered to a `serde_json::Value`, whose object maps
    /// keep their keys sorted, so the preimage does not depend on field
    /// declaration order and two nodes hashing the same content agree.
    pub fn digest(&self) -> String {
        let canonical = serde_json::to_value(self).expect("block serializes to JSON");
        let mut hasher = Sha256::new();
        hasher.update(canonical.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::Block;
    use crate::transaction::Transaction;
    use serde_json::json;
    use sha2::{Digest, Sha256};

    fn sample() -> Block {
        Block {
            index: 2,
            timestamp: "2024-01-01 00:00:00.000000".into(),
            puzzle_solution: 533,
            previous_hash: "abc".into(),
            transactions: vec![
                Transaction::new("node", "Maajee", json!(1)),
                Transaction::new("alice", "bob", json!(-1)),
            ],
        }
    }

    #[test]
    fn digest_is_stable_across_calls_and_clones() {
        let b = sample();
        let first = b.digest();
        assert_eq!(first, b.digest());
        assert_eq!(first, b.clone().digest());
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn digest_uses_sorted_keys() {
        // Hand-written preimage with keys in lexicographic order.
        let preimage = r#"{"index":2,"previous_hash":"abc","puzzle_solution":533,"timestamp":"2024-01-01 00:00:00.000000","transactions":[{"amount":1,"receiver":"Maajee","sender":"node"},{"amount":-1,"receiver":"bob","sender":"alice"}]}"#;
        let expected = hex::encode(Sha256::digest(preimage.as_bytes()));
        assert_eq!(sample().digest(), expected);
    }

    #[test]
    fn digest_ignores_input_key_order() {
        let a: Block = serde_json::from_value(json!({
            "index": 1, "timestamp": "t", "puzzle_solution": 1,
            "previous_hash": "0", "transactions": []
        }))
        .unwrap();
        let b: Block = serde_json::from_value(json!({
            "transactions": [], "previous_hash": "0", "puzzle_solution": 1,
            "timestamp": "t", "index": 1
        }))
        .unwrap();
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn digest_depends_on_transaction_order() {
        let b = sample();
        let mut swapped = b.clone();
        swapped.transactions.reverse();
        assert_ne!(b.digest(), swapped.digest());
    }

    #[test]
    fn new_block_gets_a_timestamp() {
        let b = Block::new(1, 1, "0".into(), Vec::new());
        assert!(!b.timestamp.is_empty());
        assert!(b.transactions.is_empty());
    }
}

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::GENESIS_PAYLOAD;
use crate::hasher;

/// A single block binding a payload to a chain position and a hash link to
/// its predecessor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix timestamp (UTC)
    pub payload: Value,
    pub previous_hash: String,
    pub nonce: u64,      // Proof-of-Work nonce
    pub difficulty: u32, // leading zeros this block was sealed at
    pub hash: String,    // Cached hash of the block
}

impl Block {
    /// Create the genesis block (first block in the chain).
    pub fn genesis() -> Self {
        Self::new(
            0,
            hasher::NO_PREDECESSOR.to_string(),
            Value::from(GENESIS_PAYLOAD),
            0,
        )
    }

    /// Create a new block (not mined yet). Mining happens through
    /// [`Miner`](crate::miner::Miner).
    pub fn new(index: u64, previous_hash: String, payload: Value, difficulty: u32) -> Self {
        Self::new_with_timestamp(
            index,
            previous_hash,
            payload,
            difficulty,
            Utc::now().timestamp(),
        )
    }

    /// Create a block with an explicit timestamp.
    pub fn new_with_timestamp(
        index: u64,
        previous_hash: String,
        payload: Value,
        difficulty: u32,
        timestamp: i64,
    ) -> Self {
        let mut block = Self {
            index,
            timestamp,
            payload,
            previous_hash,
            nonce: 0,
            difficulty,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Recompute the digest of this block's fields (excluding the cached
    /// `hash` itself). See [`hasher::digest`] for the preimage layout.
    pub fn compute_hash(&self) -> String {
        hasher::digest(
            self.index,
            self.timestamp,
            &self.payload,
            &self.previous_hash,
            self.nonce,
        )
    }

    /// Refresh the cached hash from the current fields, keeping the nonce.
    /// Used when a predecessor edit moved this block's `previous_hash`.
    pub fn reseal(&mut self) {
        self.hash = self.compute_hash();
    }

    /// Replace the payload and reseal, dropping any prior proof-of-work.
    /// Models a chain operator correcting data before remining.
    pub fn edit(&mut self, new_payload: Value) {
        self.payload = new_payload;
        self.nonce = 0;
        self.hash = self.compute_hash();
    }

    /// Replace the payload WITHOUT resealing. Models an attacker altering
    /// data post hoc: the stored hash no longer matches the content, which
    /// is exactly the signal validation detects.
    pub fn tamper(&mut self, new_payload: Value) {
        self.payload = new_payload;
    }

    /// True if the cached hash starts with at least `difficulty` zeros.
    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        self.hash
            .chars()
            .take(difficulty as usize)
            .all(|c| c == '0')
    }

    /// Validate that the cached `hash` matches the block's content and
    /// satisfies its sealed difficulty. (Does NOT validate chain linkage.)
    pub fn is_valid(&self) -> bool {
        self.hash == self.compute_hash() && self.meets_difficulty(self.difficulty)
    }
}

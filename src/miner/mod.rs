//! Brute-force Proof-of-Work nonce search.

use std::time::Instant;

use log::debug;
use serde::Serialize;

use crate::blockchain::Block;

/// Safety valve for demonstrations: a search never loops past this many
/// attempts unless configured otherwise. Expected work grows roughly 16^d
/// with difficulty `d`, so the default comfortably covers d <= 3 and will
/// usually trip for d >= 5.
pub const DEFAULT_ATTEMPT_CAP: u64 = 100_000;

/// Nonce searcher with a bounded attempt budget.
#[derive(Debug, Clone, Copy)]
pub struct Miner {
    pub attempt_cap: u64,
}

impl Default for Miner {
    fn default() -> Self {
        Self {
            attempt_cap: DEFAULT_ATTEMPT_CAP,
        }
    }
}

/// Outcome of a single mining run. Exhausting the attempt cap (or being
/// cancelled through the hook) is a reportable outcome with
/// `reached_target == false`, never an error.
#[derive(Debug, Clone, Serialize)]
pub struct MiningReport {
    pub attempts: u64,
    pub elapsed_ms: u128,
    pub hash: String,
    pub reached_target: bool,
}

impl Miner {
    pub fn new(attempt_cap: u64) -> Self {
        Self { attempt_cap }
    }

    /// Search for a nonce whose hash carries at least `difficulty` leading
    /// zeros, starting from the block's current nonce.
    ///
    /// The search only touches `nonce`, `hash` and the sealed `difficulty`;
    /// index, timestamp, payload and `previous_hash` are left alone. A block
    /// whose current hash already satisfies the target (e.g. remining at an
    /// equal or lower difficulty) finishes in zero attempts.
    pub fn mine(&self, block: &mut Block, difficulty: u32) -> MiningReport {
        self.mine_with_hook(block, difficulty, |_| true)
    }

    /// Same search with a per-iteration hook: return `false` from
    /// `keep_going` to stop early. This is the cooperative-cancellation seam
    /// for callers that offload mining to a worker task.
    pub fn mine_with_hook(
        &self,
        block: &mut Block,
        difficulty: u32,
        mut keep_going: impl FnMut(u64) -> bool,
    ) -> MiningReport {
        let target = "0".repeat(difficulty as usize);
        let started = Instant::now();
        let mut attempts: u64 = 0;

        // The stored difficulty always reflects the last requested target,
        // whether or not the search gets there.
        block.difficulty = difficulty;

        // A stale cached hash (e.g. after tampering) must not satisfy the
        // target by accident; search from the block's real digest.
        let current = block.compute_hash();
        if block.hash != current {
            block.hash = current;
        }

        while !block.hash.starts_with(&target) {
            if attempts >= self.attempt_cap || !keep_going(attempts) {
                break;
            }
            block.nonce = block.nonce.wrapping_add(1);
            block.hash = block.compute_hash();
            attempts += 1;
        }

        let reached_target = block.hash.starts_with(&target);
        if reached_target {
            debug!(
                "MINER - sealed block #{} at difficulty {} (nonce={}, attempts={})",
                block.index, difficulty, block.nonce, attempts
            );
        } else {
            debug!(
                "MINER - stopped on block #{} after {} attempts without reaching difficulty {}",
                block.index, attempts, difficulty
            );
        }

        MiningReport {
            attempts,
            elapsed_ms: started.elapsed().as_millis(),
            hash: block.hash.clone(),
            reached_target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_ATTEMPT_CAP, Miner};
    use crate::blockchain::Block;
    use serde_json::json;

    fn test_block(difficulty: u32) -> Block {
        Block::new_with_timestamp(
            1,
            "prev".into(),
            json!({"amount": 10}),
            difficulty,
            1_700_000_000,
        )
    }

    #[test]
    fn mining_produces_leading_zeros() {
        let miner = Miner::default();
        let mut b = test_block(2);
        let report = miner.mine(&mut b, 2);

        assert!(report.reached_target);
        assert!(b.hash.starts_with("00"));
        assert_eq!(report.hash, b.hash);
        assert_eq!(b.difficulty, 2);
        assert!(b.is_valid());
    }

    #[test]
    fn mining_leaves_other_fields_alone() {
        let miner = Miner::default();
        let mut b = test_block(2);
        let (index, timestamp, payload, prev) = (
            b.index,
            b.timestamp,
            b.payload.clone(),
            b.previous_hash.clone(),
        );

        miner.mine(&mut b, 2);
        assert_eq!(b.index, index);
        assert_eq!(b.timestamp, timestamp);
        assert_eq!(b.payload, payload);
        assert_eq!(b.previous_hash, prev);
    }

    #[test]
    fn remining_a_valid_block_takes_zero_attempts() {
        let miner = Miner::default();
        let mut b = test_block(2);
        miner.mine(&mut b, 2);
        let nonce = b.nonce;

        // Same target: nothing to do.
        let report = miner.mine(&mut b, 2);
        assert_eq!(report.attempts, 0);
        assert!(report.reached_target);
        assert_eq!(b.nonce, nonce);

        // Lowered target: the existing hash already qualifies.
        let report = miner.mine(&mut b, 1);
        assert_eq!(report.attempts, 0);
        assert!(report.reached_target);
        assert_eq!(b.difficulty, 1);
    }

    #[test]
    fn raising_difficulty_forces_a_new_search() {
        let miner = Miner::default();
        let mut b = test_block(1);
        miner.mine(&mut b, 1);

        let report = miner.mine(&mut b, 3);
        assert!(b.hash.starts_with("000") || !report.reached_target);
        assert_eq!(b.difficulty, 3);
    }

    #[test]
    fn tiny_cap_reports_capped_outcome() {
        let miner = Miner::new(1);
        let mut b = test_block(6);
        let report = miner.mine(&mut b, 6);

        assert!(!report.reached_target);
        assert_eq!(report.attempts, 1);
        // The best-effort hash is still the block's real digest.
        assert_eq!(b.hash, b.compute_hash());
    }

    #[test]
    fn hook_cancels_the_search() {
        let miner = Miner::new(DEFAULT_ATTEMPT_CAP);
        let mut b = test_block(6);
        let report = miner.mine_with_hook(&mut b, 6, |attempts| attempts < 3);

        assert!(!report.reached_target);
        assert!(report.attempts <= 3);
    }
}

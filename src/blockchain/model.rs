use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;

use super::{Block, DIFF_MAX};
use crate::hasher;
use crate::miner::{Miner, MiningReport};

/// How [`Blockchain::append_block`] seals a block after relinking it to the
/// current tip.
#[derive(Clone, Copy)]
pub enum AppendPolicy<'a> {
    /// Recompute the hash only; the block may land below its difficulty
    /// target and validation will say so.
    ResealOnly,
    /// Run the full nonce search so the appended block is valid.
    Mine(&'a Miner),
}

/// Structural chain errors. A failed call leaves the chain untouched.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("block index {index} is out of bounds for a chain of length {len}")]
    InvalidIndex { index: usize, len: usize },
}

/// Per-block verdicts from a full validation pass.
///
/// A block is valid when its stored hash matches the digest recomputed from
/// its fields, the hash meets the block's sealed difficulty, its
/// `previous_hash` points at the predecessor's recomputed digest, and the
/// predecessor itself is valid. Invalidity therefore propagates to every
/// descendant, which is the property the tamper demonstration relies on.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub per_block: Vec<bool>,
    pub first_invalid_index: Option<usize>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.first_invalid_index.is_none()
    }
}

/// Simple in-memory hash-linked chain with Proof-of-Work.
///
/// The chain owns its blocks exclusively: every mutation goes through a
/// method on this handle, and callers observe blocks through shared
/// references or serialized snapshots only.
#[derive(Debug)]
pub struct Blockchain {
    chain: Vec<Block>,
    difficulty: u32,
    seed_payloads: Vec<Value>,
}

impl Blockchain {
    /// Initialize a chain holding only the genesis block.
    pub fn new(difficulty: u32) -> Self {
        Self {
            chain: vec![Block::genesis()],
            difficulty,
            seed_payloads: Vec::new(),
        }
    }

    /// Initialize a chain with mined seed blocks after genesis. [`reset`]
    /// rebuilds the same shape.
    ///
    /// [`reset`]: Blockchain::reset
    pub fn with_seed_blocks(difficulty: u32, miner: &Miner, payloads: Vec<Value>) -> Self {
        let mut bc = Self::new(difficulty);
        bc.seed_payloads = payloads;
        for payload in bc.seed_payloads.clone() {
            bc.mine_block(payload, miner);
        }
        bc
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("chain always holds at least the genesis block")
    }

    /// Read-only view of all blocks, genesis first.
    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.chain.get(index)
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Update the difficulty used for future blocks, clamped to
    /// [`DIFF_MAX`]. Already-sealed blocks keep the difficulty they were
    /// mined at.
    pub fn set_difficulty(&mut self, difficulty: u32) {
        if difficulty > DIFF_MAX {
            warn!("CHAIN - difficulty {difficulty} clamped to {DIFF_MAX}");
        }
        self.difficulty = difficulty.min(DIFF_MAX);
    }

    /// Relink `block` to the current tip and append it.
    ///
    /// The block's index must equal the current chain length. Its
    /// `previous_hash` is overwritten with the tip's hash, then the block is
    /// resealed or mined per `policy`. Returns the mining report when the
    /// policy mined.
    pub fn append_block(
        &mut self,
        mut block: Block,
        policy: AppendPolicy,
    ) -> Result<Option<MiningReport>, ChainError> {
        if block.index as usize != self.chain.len() {
            return Err(ChainError::InvalidIndex {
                index: block.index as usize,
                len: self.chain.len(),
            });
        }

        block.previous_hash = self.last_block().hash.clone();
        let report = match policy {
            AppendPolicy::ResealOnly => {
                block.nonce = 0;
                block.reseal();
                None
            }
            AppendPolicy::Mine(miner) => {
                let difficulty = block.difficulty;
                Some(miner.mine(&mut block, difficulty))
            }
        };

        debug!(
            "CHAIN - appended block #{} (hash={}, mined={})",
            block.index,
            block.hash,
            report.is_some()
        );
        self.chain.push(block);
        Ok(report)
    }

    /// Mine and append a new block with the provided payload at the chain's
    /// current difficulty.
    pub fn mine_block(&mut self, payload: Value, miner: &Miner) -> MiningReport {
        let index = self.chain.len() as u64;
        let prev_hash = self.last_block().hash.clone();

        let mut block = Block::new(index, prev_hash, payload, self.difficulty);
        let report = miner.mine(&mut block, self.difficulty);

        info!(
            "CHAIN - sealed block #{} (hash={}, nonce={}, attempts={})",
            block.index, block.hash, block.nonce, report.attempts
        );
        self.chain.push(block);
        report
    }

    /// Replace block `index`'s payload and reseal it, then ripple the link
    /// repair through every descendant: each gets its `previous_hash`
    /// refreshed, its nonce reset and its hash recomputed un-mined.
    ///
    /// Afterwards the link checks pass but proof-of-work is generally
    /// broken from `index` onward until each block is remined in order.
    pub fn edit_block_payload(&mut self, index: usize, new_payload: Value) -> Result<(), ChainError> {
        self.check_index(index)?;
        self.chain[index].edit(new_payload);
        self.relink_from(index + 1);
        debug!("CHAIN - edited block #{index}, descendants relinked un-mined");
        Ok(())
    }

    /// Replace block `index`'s payload WITHOUT resealing, and without any
    /// cascade. Validation will flag block `index` (hash mismatch) and every
    /// descendant (stale linkage).
    pub fn tamper_block_payload(
        &mut self,
        index: usize,
        new_payload: Value,
    ) -> Result<(), ChainError> {
        self.check_index(index)?;
        self.chain[index].tamper(new_payload);
        warn!("CHAIN - block #{index} payload altered without reseal");
        Ok(())
    }

    /// Re-run the nonce search on block `index` at the chain's current
    /// difficulty, then repair descendant linkage (un-mined, as with
    /// [`edit_block_payload`](Blockchain::edit_block_payload)).
    pub fn remine_block(&mut self, index: usize, miner: &Miner) -> Result<MiningReport, ChainError> {
        self.check_index(index)?;
        let difficulty = self.difficulty;
        let report = miner.mine(&mut self.chain[index], difficulty);
        self.relink_from(index + 1);
        Ok(report)
    }

    /// Validate the entire chain: hash integrity, PoW target and linkage.
    /// Never mutates any block.
    pub fn validate(&self) -> ValidationReport {
        let mut per_block = Vec::with_capacity(self.chain.len());

        for (i, block) in self.chain.iter().enumerate() {
            let sealed = block.index == i as u64 && block.is_valid();
            let linked = if i == 0 {
                block.previous_hash == hasher::NO_PREDECESSOR
            } else {
                block.previous_hash == self.chain[i - 1].compute_hash()
            };
            let predecessor_ok = i == 0 || per_block[i - 1];
            per_block.push(sealed && linked && predecessor_ok);
        }

        let first_invalid_index = per_block.iter().position(|ok| !ok);
        ValidationReport {
            per_block,
            first_invalid_index,
        }
    }

    /// Discard all blocks and rebuild genesis plus the seed blocks this
    /// chain was constructed with.
    pub fn reset(&mut self, miner: &Miner) {
        info!("CHAIN - reset to genesis + {} seed blocks", self.seed_payloads.len());
        self.chain = vec![Block::genesis()];
        for payload in self.seed_payloads.clone() {
            self.mine_block(payload, miner);
        }
    }

    fn check_index(&self, index: usize) -> Result<(), ChainError> {
        if index >= self.chain.len() {
            return Err(ChainError::InvalidIndex {
                index,
                len: self.chain.len(),
            });
        }
        Ok(())
    }

    /// Repair `previous_hash` links from `start` to the tip, resetting each
    /// descendant's nonce and resealing it un-mined.
    fn relink_from(&mut self, start: usize) {
        for i in start.max(1)..self.chain.len() {
            let prev_hash = self.chain[i - 1].hash.clone();
            let block = &mut self.chain[i];
            block.previous_hash = prev_hash;
            block.nonce = 0;
            block.reseal();
        }
    }
}

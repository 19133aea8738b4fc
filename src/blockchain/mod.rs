pub mod block;
pub mod model;

pub use block::Block;
pub use model::{AppendPolicy, Blockchain, ChainError, ValidationReport};

/// Default Proof-of-Work difficulty (number of leading zeros).
pub const DEFAULT_DIFFICULTY: u32 = 2;

/// Difficulty bounds (keep low in demos to avoid long waits).
pub const DIFF_MIN: u32 = 0;
pub const DIFF_MAX: u32 = 6;

/// Payload of the genesis block.
pub const GENESIS_PAYLOAD: &str = "Genesis Block";

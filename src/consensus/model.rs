use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Leader-selection mechanisms supported by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mechanism {
    ProofOfWork,
    ProofOfStake,
    DelegatedProofOfStake,
}

impl Mechanism {
    /// What the single numeric metric means under this mechanism.
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::ProofOfWork => "computational power",
            Self::ProofOfStake => "stake",
            Self::DelegatedProofOfStake => "votes",
        }
    }

    /// Display prefix for generated candidate ids.
    pub fn participant_label(&self) -> &'static str {
        match self {
            Self::ProofOfWork => "Miner",
            Self::ProofOfStake => "Staker",
            Self::DelegatedProofOfStake => "Delegate",
        }
    }

    /// Default pool size for a simulation round.
    pub fn default_candidate_count(&self) -> usize {
        match self {
            Self::ProofOfWork | Self::ProofOfStake => 5,
            Self::DelegatedProofOfStake => 3,
        }
    }

    /// Default half-open metric range for a simulation round.
    pub fn default_metric_range(&self) -> Range<u64> {
        match self {
            Self::ProofOfWork => 100..1_100,
            Self::ProofOfStake => 500..5_500,
            Self::DelegatedProofOfStake => 1_000..11_000,
        }
    }
}

impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ProofOfWork => "Proof of Work (PoW)",
            Self::ProofOfStake => "Proof of Stake (PoS)",
            Self::DelegatedProofOfStake => "Delegated Proof of Stake (DPoS)",
        };
        f.write_str(name)
    }
}

impl FromStr for Mechanism {
    type Err = ConsensusError;

    /// Accepts the short tags a presentation layer sends: `pow`, `pos` or
    /// `dpos` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pow" => Ok(Self::ProofOfWork),
            "pos" => Ok(Self::ProofOfStake),
            "dpos" => Ok(Self::DelegatedProofOfStake),
            _ => Err(ConsensusError::UnknownMechanism(s.to_string())),
        }
    }
}

/// A validator candidate for one selection round. Candidates are ephemeral:
/// generated fresh per round and discarded with the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub metric: u64,
}

/// Result of one leader-selection round.
#[derive(Debug, Clone, Serialize)]
pub struct ConsensusReport {
    pub mechanism: Mechanism,
    pub candidates: Vec<Candidate>,
    pub winner: Candidate,
    pub reason: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConsensusError {
    #[error("unknown consensus mechanism {0:?} (expected \"pow\", \"pos\" or \"dpos\")")]
    UnknownMechanism(String),
    #[error("cannot select a winner from an empty candidate pool")]
    EmptyCandidatePool,
}

//! Leader-selection simulation for PoW, PoS and DPoS rounds.
//!
//! Each mechanism reduces to the same comparison: generate a pool of
//! candidates carrying one numeric metric (computational power, stake, or
//! votes) and pick the strict maximum. The mechanisms differ only in what
//! the metric means and what a plausible range for it looks like.

pub mod model;

pub use model::{Candidate, ConsensusError, ConsensusReport, Mechanism};

use std::ops::Range;

use log::info;
use rand::Rng;

/// Generate a fresh candidate pool with metrics drawn uniformly from
/// `range` (half-open: every metric lands strictly within `[start, end)`).
pub fn generate_candidates<R: Rng + ?Sized>(
    rng: &mut R,
    mechanism: Mechanism,
    count: usize,
    range: Range<u64>,
) -> Vec<Candidate> {
    (0..count)
        .map(|i| Candidate {
            id: format!("{} {}", mechanism.participant_label(), i + 1),
            metric: rng.gen_range(range.clone()),
        })
        .collect()
}

/// Pick the candidate with the strictly greatest metric.
///
/// Ties go to the FIRST candidate in input order: the left fold below only
/// replaces the current leader on a strictly greater metric, so the rule is
/// order-stable instead of depending on which side of the comparison a
/// naive reduce happens to keep.
pub fn select_winner(candidates: &[Candidate]) -> Result<&Candidate, ConsensusError> {
    let (first, rest) = candidates
        .split_first()
        .ok_or(ConsensusError::EmptyCandidatePool)?;

    let mut best = first;
    for candidate in rest {
        if candidate.metric > best.metric {
            best = candidate;
        }
    }
    Ok(best)
}

/// Run one full selection round: generate a pool, pick the winner and
/// describe the selection in a human-readable sentence.
pub fn run_round<R: Rng + ?Sized>(
    rng: &mut R,
    mechanism: Mechanism,
    count: usize,
    range: Range<u64>,
) -> Result<ConsensusReport, ConsensusError> {
    let candidates = generate_candidates(rng, mechanism, count, range);
    let winner = select_winner(&candidates)?.clone();

    info!(
        "CONSENSUS - {} round: {} wins with {} {}",
        mechanism,
        winner.id,
        winner.metric,
        mechanism.metric_label()
    );
    let reason = format!(
        "Selected {} based on highest {}: {}",
        winner.id,
        mechanism.metric_label(),
        winner.metric
    );

    Ok(ConsensusReport {
        mechanism,
        candidates,
        winner,
        reason,
    })
}

/// Run a round with the mechanism's default pool size and metric range.
pub fn run_default_round<R: Rng + ?Sized>(
    rng: &mut R,
    mechanism: Mechanism,
) -> Result<ConsensusReport, ConsensusError> {
    run_round(
        rng,
        mechanism,
        mechanism.default_candidate_count(),
        mechanism.default_metric_range(),
    )
}

#[cfg(test)]
mod tests {
    use super::{
        Candidate, ConsensusError, Mechanism, generate_candidates, run_default_round, run_round,
        select_winner,
    };
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn candidate(id: &str, metric: u64) -> Candidate {
        Candidate {
            id: id.to_string(),
            metric,
        }
    }

    #[test]
    fn first_of_tied_maximum_wins() {
        let pool = vec![candidate("A", 5), candidate("B", 9), candidate("C", 9)];
        let winner = select_winner(&pool).unwrap();
        assert_eq!(winner.id, "B");
    }

    #[test]
    fn empty_pool_is_an_error() {
        assert_eq!(
            select_winner(&[]).unwrap_err(),
            ConsensusError::EmptyCandidatePool
        );

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            run_round(&mut rng, Mechanism::ProofOfWork, 0, 1..10).unwrap_err(),
            ConsensusError::EmptyCandidatePool
        );
    }

    #[test]
    fn mechanism_tags_parse() {
        assert_eq!("pow".parse::<Mechanism>().unwrap(), Mechanism::ProofOfWork);
        assert_eq!("PoS".parse::<Mechanism>().unwrap(), Mechanism::ProofOfStake);
        assert_eq!(
            "dpos".parse::<Mechanism>().unwrap(),
            Mechanism::DelegatedProofOfStake
        );

        let err = "paxos".parse::<Mechanism>().unwrap_err();
        assert_eq!(err, ConsensusError::UnknownMechanism("paxos".to_string()));
    }

    #[test]
    fn generated_metrics_stay_within_the_half_open_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let pool = generate_candidates(&mut rng, Mechanism::ProofOfStake, 100, 10..20);

        assert_eq!(pool.len(), 100);
        assert_eq!(pool[0].id, "Staker 1");
        assert!(pool.iter().all(|c| (10..20).contains(&c.metric)));
    }

    #[test]
    fn round_report_names_the_strict_maximum() {
        let mut rng = StdRng::seed_from_u64(7);
        let report = run_default_round(&mut rng, Mechanism::DelegatedProofOfStake).unwrap();

        assert_eq!(report.mechanism, Mechanism::DelegatedProofOfStake);
        assert_eq!(report.candidates.len(), 3);

        let max = report.candidates.iter().map(|c| c.metric).max().unwrap();
        assert_eq!(report.winner.metric, max);
        // First among any tied maximum.
        let first_max = report.candidates.iter().find(|c| c.metric == max).unwrap();
        assert_eq!(report.winner.id, first_max.id);

        assert!(report.reason.contains("votes"));
        assert!(report.reason.contains(&report.winner.id));
    }
}

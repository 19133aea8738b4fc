use std::env;
use std::error::Error;

use dotenvy::dotenv;
use serde_json::json;

use blocksim::blockchain::{Blockchain, DEFAULT_DIFFICULTY};
use blocksim::consensus::{self, Mechanism};
use blocksim::miner::{DEFAULT_ATTEMPT_CAP, Miner};

/// Scripted stand-in for the presentation layer: seeds a chain, mines,
/// tampers, validates, then runs one round of each consensus mechanism.
fn main() -> Result<(), Box<dyn Error>> {
    let _ = dotenv();
    env_logger::init();

    let difficulty: u32 = env::var("DIFFICULTY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_DIFFICULTY);
    let attempt_cap: u64 = env::var("ATTEMPT_CAP")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_ATTEMPT_CAP);

    println!("⛓️ blocksim demo (difficulty={difficulty}, attempt_cap={attempt_cap})");

    let miner = Miner::new(attempt_cap);
    let mut bc = Blockchain::with_seed_blocks(
        difficulty,
        &miner,
        vec![
            json!("First Block - Transaction Data"),
            json!("Second Block - More Transactions"),
        ],
    );

    let report = bc.mine_block(json!({"from": "alice", "to": "bob", "amount": 10}), &miner);
    println!(
        "mined block #{} in {} attempts ({} ms): {}",
        bc.last_block().index,
        report.attempts,
        report.elapsed_ms,
        report.hash
    );
    println!("chain valid: {}", bc.validate().is_valid());

    bc.tamper_block_payload(1, json!("TAMPERED DATA - This block has been modified!"))?;
    let validation = bc.validate();
    println!(
        "after tampering block #1: valid={}, first invalid index={:?}, verdicts={:?}",
        validation.is_valid(),
        validation.first_invalid_index,
        validation.per_block
    );

    // Repair: correct the payload, then remine every block from the edit
    // point forward.
    bc.edit_block_payload(1, json!("First Block - Transaction Data"))?;
    for i in 1..bc.len() {
        let report = bc.remine_block(i, &miner)?;
        println!(
            "remined block #{i}: attempts={}, reached_target={}",
            report.attempts, report.reached_target
        );
    }
    println!("chain valid after repair: {}", bc.validate().is_valid());

    let mut rng = rand::thread_rng();
    for mechanism in [
        Mechanism::ProofOfWork,
        Mechanism::ProofOfStake,
        Mechanism::DelegatedProofOfStake,
    ] {
        let round = consensus::run_default_round(&mut rng, mechanism)?;
        println!("\n{}: {}", round.mechanism, round.reason);
        for candidate in &round.candidates {
            let marker = if candidate.id == round.winner.id {
                "  <- winner"
            } else {
                ""
            };
            println!(
                "  {} ({}: {}){}",
                candidate.id,
                mechanism.metric_label(),
                candidate.metric,
                marker
            );
        }
    }

    Ok(())
}

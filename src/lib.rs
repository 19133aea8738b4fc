//! Educational hash-linked blockchain engine.
//!
//! The crate models the moving parts of a block chain small enough to watch:
//! blocks sealed by a SHA-256 digest over their fields, a chain that links
//! them by hash and validates itself, a brute-force proof-of-work miner with
//! a bounded attempt budget, a tamper/edit model that demonstrates how hash
//! linkage detects mutation, and a leader-selection simulator for PoW, PoS
//! and DPoS rounds.
//!
//! Everything is pure in-memory computation: no network, no persistence, no
//! cryptographic security claims beyond a deterministic, effectively
//! non-invertible digest. A presentation layer (see `src/main.rs` for a
//! scripted stand-in) drives the engine and renders its reports.

pub mod blockchain;
pub mod consensus;
pub mod hasher;
pub mod miner;

//! # Workflows Module
//!
//! Top-level entry points for callers of protwin. Each workflow validates raw
//! inputs, resolves the bias inputs, runs the matching engine, and assembles the
//! result record.
//!
//! ## Architecture
//!
//! - **Scoring** ([`score`]) - `score_sequence`, the pseudo language-model scorer
//! - **Virtual Lab** ([`lab`]) - `simulate_lab`, enzymatic kinetics over a duration
//! - **Digital Twin** ([`bioreactor`]) - `simulate_bioreactor`, the 25-sample reactor run
//! - **Replicates** ([`batch`]) - Seeded replicate runs with an efficiency summary
//! - **Outcomes** ([`outcome`]) - Tagged failure results for boundary layers
//!
//! The `run` functions take typed inputs and return `Result`; the `simulate_*`
//! functions accept loosely typed JSON parameters and always return a
//! structured [`outcome::SimulationOutcome`].

pub mod batch;
pub mod bioreactor;
pub mod lab;
pub mod outcome;
pub mod score;

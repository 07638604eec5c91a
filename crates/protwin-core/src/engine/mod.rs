//! # Engine Module
//!
//! The numeric core behind every workflow: parameter records, the error
//! taxonomy, and the simulators themselves.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Parameter builders for lab and bioreactor runs
//! - **Error Handling** ([`error`]) - The `SimulationError` taxonomy shared by all workflows
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Bias** ([`bias`]) - Which upstream input (score, sequence, or nothing) drives parameters
//! - **Scoring** ([`scoring`]) - One attribute generator per model family
//! - **Kinetics** ([`kinetics`]) - Event-stepped and closed-form kinetic engines
//! - **Bioreactor** ([`bioreactor`]) - Adjustment, integration, and alerts for the twin
//!
//! All randomness is drawn from a caller-supplied `Rng`, so seeded callers get
//! reproducible output and concurrent calls share no state.

pub mod bias;
pub mod bioreactor;
pub mod config;
pub mod error;
pub mod kinetics;
pub mod noise;
pub mod progress;
pub mod scoring;

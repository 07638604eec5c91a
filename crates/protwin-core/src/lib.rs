//! # protwin Core Library
//!
//! A simulation engine for protein-analysis workflows: sequence scoring, enzymatic
//! kinetics in a virtual lab, and a bioreactor digital twin whose parameters are
//! biased by upstream scores.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture so that each layer can be tested
//! and reasoned about on its own.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ProteinSequence`,
//!   `SequenceScore`, `KineticRun`, `BioreactorRun`), residue-class lookup tables,
//!   and I/O utilities (FASTA parsing, report rendering).
//!
//! - **[`engine`]: The Logic Core.** Parameter records and their builders, the
//!   error taxonomy, per-model scoring strategies, the two kinetic execution
//!   strategies (event-stepped and closed-form), and the bioreactor integrator.
//!
//! - **[`workflows`]: The Public API.** Entry points that validate raw inputs,
//!   derive parameters, run an engine, and return either a typed `Result` or a
//!   tagged [`workflows::outcome::SimulationOutcome`] for boundary layers that
//!   must always receive a structured object.
//!
//! Every operation takes its random source explicitly, so a caller that seeds it
//! gets reproducible output.

pub mod core;
pub mod engine;
pub mod workflows;

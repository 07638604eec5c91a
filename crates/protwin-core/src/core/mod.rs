//! # Core Module
//!
//! This module provides the data models and stateless utilities shared by every
//! simulation in protwin.
//!
//! ## Overview
//!
//! Nothing in this module holds state between calls. It defines what a validated
//! protein sequence is, what each analysis produces, and how results are rendered
//! for the outside world.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Sequences, scores, kinetic runs and bioreactor runs
//! - **Residue Knowledge** ([`utils`]) - Static residue-class tables used by parameter derivation
//! - **File I/O** ([`io`]) - FASTA input and JSON/CSV/text report output
//!
//! ## Key Capabilities
//!
//! - **Validated sequences** over the 20 standard residues plus the stop symbol
//! - **Model-specific attribute bags** whose shape is fixed by the model identifier
//! - **Serializable run records** with the wire keys expected by downstream report consumers
//! - **Format-agnostic reporting** through the [`io::report::Reportable`] trait

pub mod io;
pub mod models;
pub mod utils;

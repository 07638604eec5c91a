//! Provides input/output functionality for protein sequences and simulation reports.
//!
//! Sequences arrive as FASTA text; results leave as JSON, CSV or plain-text reports
//! rendered by any type implementing [`report::Reportable`].

pub mod fasta;
pub mod report;

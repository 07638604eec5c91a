//! # Core Models Module
//!
//! This module contains the data structures exchanged between the simulators and
//! the boundary layer that stores and renders their results.
//!
//! ## Overview
//!
//! Every model here is plain, immutable data. Simulators produce them, callers
//! persist and format them. Field names serialize to the wire keys used by the
//! report consumers (`modelo_usado`, `datos_temporales`, `metricas_finales`, ...),
//! while the Rust API keeps descriptive English names.
//!
//! ## Key Components
//!
//! - [`sequence`] - Validated protein sequences, residues and composition fractions
//! - [`score`] - Model identifiers and the model-specific [`score::SequenceScore`]
//! - [`kinetics`] - Time series and metrics of a virtual-lab enzymatic run
//! - [`bioreactor`] - Time series, metrics and alerts of a digital-twin run
//! - [`status`] - Shared run status and percentage/temperature value types

pub mod bioreactor;
pub mod kinetics;
pub mod score;
pub mod sequence;
pub mod status;

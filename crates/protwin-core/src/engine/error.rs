use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::sequence::SequenceError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid sequence: {0}")]
    InvalidSequence(#[from] SequenceError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(#[from] ConfigError),

    #[error("Internal simulation error: {0}")]
    InternalSimulation(String),
}

impl SimulationError {
    /// Whether the failure stems from caller input rather than the simulation itself.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::InternalSimulation(_))
    }
}

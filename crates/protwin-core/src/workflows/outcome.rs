use crate::core::io::report::Reportable;
use crate::core::models::status::RunStatus;
use crate::engine::error::SimulationError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    #[serde(rename = "secuencia_invalida")]
    InvalidSequence,
    #[serde(rename = "parametro_invalido")]
    InvalidParameter,
    #[serde(rename = "error_interno")]
    Internal,
}

impl From<&SimulationError> for FailureKind {
    fn from(error: &SimulationError) -> Self {
        match error {
            SimulationError::InvalidSequence(_) => Self::InvalidSequence,
            SimulationError::InvalidParameter(_) => Self::InvalidParameter,
            SimulationError::InternalSimulation(_) => Self::Internal,
        }
    }
}

/// Serializes as `{"error": "...", "estado": "fallo", "tipo_error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureReport {
    pub error: String,
    #[serde(rename = "estado")]
    pub status: RunStatus,
    #[serde(rename = "tipo_error")]
    pub kind: FailureKind,
}

impl From<SimulationError> for FailureReport {
    fn from(error: SimulationError) -> Self {
        Self {
            kind: FailureKind::from(&error),
            error: error.to_string(),
            status: RunStatus::Failed,
        }
    }
}

impl Reportable for FailureReport {
    fn title(&self) -> String {
        "Simulación fallida".to_string()
    }
}

/// Either a completed run or a tagged failure; never a raw error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SimulationOutcome<T> {
    Completed(T),
    Failed(FailureReport),
}

impl<T> SimulationOutcome<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn completed(&self) -> Option<&T> {
        match self {
            Self::Completed(run) => Some(run),
            Self::Failed(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T, FailureReport> {
        match self {
            Self::Completed(run) => Ok(run),
            Self::Failed(report) => Err(report),
        }
    }
}

impl<T> From<Result<T, SimulationError>> for SimulationOutcome<T> {
    fn from(result: Result<T, SimulationError>) -> Self {
        match result {
            Ok(run) => Self::Completed(run),
            Err(error) => {
                tracing::warn!(%error, "Simulation failed; returning a tagged failure.");
                Self::Failed(error.into())
            }
        }
    }
}

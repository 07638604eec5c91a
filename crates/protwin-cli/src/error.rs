use crate::store::StoreError;
use protwin::core::io::fasta::FastaError;
use protwin::core::io::report::ReportError;
use protwin::engine::error::SimulationError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read sequence input: {0}")]
    Fasta(#[from] FastaError),

    #[error("Failed to render report: {0}")]
    Report(#[from] ReportError),

    #[error("Result store error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Simulation did not finish within {} ms", .0.as_millis())]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

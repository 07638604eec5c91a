use crate::core::io::report::{ReportError, Reportable};
use crate::core::models::bioreactor::BioreactorRun;
use crate::core::models::kinetics::KineticRun;
use crate::core::models::score::SequenceScore;
use crate::core::models::sequence::ProteinSequence;
use crate::engine::config::{BioreactorSetup, LabParams};
use crate::engine::error::SimulationError;
use crate::engine::noise::round_to;
use crate::engine::progress::ProgressReporter;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Spread of the efficiency metric across replicates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplicateSummary {
    #[serde(rename = "replicas")]
    pub count: usize,
    #[serde(rename = "media")]
    pub mean: f64,
    #[serde(rename = "desviacion_estandar")]
    pub std_dev: f64,
    #[serde(rename = "minimo")]
    pub min: f64,
    #[serde(rename = "maximo")]
    pub max: f64,
}

impl ReplicateSummary {
    /// Population statistics; `None` for an empty slice.
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Some(Self {
            count: values.len(),
            mean: round_to(mean, 3),
            std_dev: round_to(variance.sqrt(), 3),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicateBatch<T> {
    #[serde(rename = "corridas")]
    pub runs: Vec<T>,
    #[serde(rename = "resumen")]
    pub summary: ReplicateSummary,
}

impl<T: Serialize> Reportable for ReplicateBatch<T> {
    fn title(&self) -> String {
        format!("Réplicas ({})", self.summary.count)
    }

    /// Only the summary; individual runs stay in the JSON layout.
    fn fields(&self) -> Result<Value, ReportError> {
        Ok(serde_json::to_value(self.summary)?)
    }
}

/// Runs `replicate` for seeds `base_seed..base_seed + n`, in parallel when the
/// `parallel` feature is enabled. Output order follows the seed order.
fn replicate<T, F>(n: usize, base_seed: u64, f: F) -> Result<Vec<T>, SimulationError>
where
    T: Send,
    F: Fn(&mut StdRng) -> Result<T, SimulationError> + Sync + Send,
{
    #[cfg(not(feature = "parallel"))]
    let iterator = 0..n as u64;

    #[cfg(feature = "parallel")]
    let iterator = (0..n as u64).into_par_iter();

    iterator
        .map(|i| {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(i));
            f(&mut rng)
        })
        .collect()
}

fn zero_replicates() -> SimulationError {
    SimulationError::InvalidParameter(crate::engine::config::ConfigError::InvalidValue {
        name: "replicates",
        reason: "at least one replicate is required".into(),
    })
}

#[instrument(skip_all, name = "lab_replicates", fields(n = n, base_seed = base_seed))]
pub fn run_lab_replicates(
    n: usize,
    base_seed: u64,
    config: &LabParams,
    sequence: Option<&ProteinSequence>,
    score: Option<&SequenceScore>,
) -> Result<ReplicateBatch<KineticRun>, SimulationError> {
    let runs = replicate(n, base_seed, |rng| {
        super::lab::run(config, sequence, score, rng, &ProgressReporter::new())
    })?;
    let efficiencies: Vec<f64> = runs.iter().map(|r| r.final_metrics.efficiency).collect();
    let summary = ReplicateSummary::of(&efficiencies).ok_or_else(zero_replicates)?;
    info!(mean = summary.mean, std_dev = summary.std_dev, "Lab replicates complete.");
    Ok(ReplicateBatch { runs, summary })
}

#[instrument(skip_all, name = "bioreactor_replicates", fields(n = n, base_seed = base_seed))]
pub fn run_bioreactor_replicates(
    n: usize,
    base_seed: u64,
    setup: &BioreactorSetup,
    sequence: Option<&ProteinSequence>,
    score: Option<&SequenceScore>,
) -> Result<ReplicateBatch<BioreactorRun>, SimulationError> {
    let runs = replicate(n, base_seed, |rng| {
        super::bioreactor::run(setup, sequence, score, rng, &ProgressReporter::new())
    })?;
    let efficiencies: Vec<f64> = runs.iter().map(|r| r.final_metrics.efficiency).collect();
    let summary = ReplicateSummary::of(&efficiencies).ok_or_else(zero_replicates)?;
    info!(mean = summary.mean, std_dev = summary.std_dev, "Bioreactor replicates complete.");
    Ok(ReplicateBatch { runs, summary })
}

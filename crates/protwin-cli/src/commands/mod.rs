pub mod bioreactor;
pub mod history;
pub mod lab;
pub mod pipeline;
pub mod score;

use crate::cli::SequenceInput;
use crate::config::defaults::DefaultsConfig;
use crate::config::{FileConfig, RunSettings};
use crate::error::{CliError, Result};
use crate::store::ResultStore;
use protwin::core::io::fasta;
use protwin::core::io::report::{self, Reportable};
use protwin::core::models::score::SequenceScore;
use protwin::core::models::sequence::ProteinSequence;
use protwin::engine::error::SimulationError;
use protwin::workflows::outcome::FailureReport;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Duration;
use tracing::{info, warn};

/// Everything a subcommand needs besides its own arguments.
pub struct CommandContext {
    pub file: FileConfig,
    pub defaults: DefaultsConfig,
    pub show_progress: bool,
}

/// A sequence together with the identifier its results are stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceSource {
    pub id: String,
    pub sequence: ProteinSequence,
}

/// Reads every sequence named by `input`. An explicit `id` only applies when
/// exactly one sequence is given.
pub fn read_sequences(input: &SequenceInput, id: Option<&str>) -> Result<Vec<SequenceSource>> {
    let mut sources = match (&input.sequence, &input.fasta) {
        (Some(raw), _) => {
            let sequence = ProteinSequence::parse(raw).map_err(SimulationError::from)?;
            vec![SequenceSource {
                id: sequence.as_str().to_string(),
                sequence,
            }]
        }
        (None, Some(path)) => {
            info!("Reading sequences from {:?}", path);
            fasta::read_from_path(path)?
                .into_iter()
                .map(|record| SequenceSource {
                    id: record.id,
                    sequence: record.sequence,
                })
                .collect()
        }
        (None, None) => Vec::new(),
    };

    if let (Some(id), [only]) = (id, sources.as_mut_slice()) {
        only.id = id.to_string();
    }
    Ok(sources)
}

/// The first sequence of `input`, warning when more were given.
pub fn first_sequence(input: &SequenceInput, id: Option<&str>) -> Result<Option<SequenceSource>> {
    let mut sources = read_sequences(input, id)?;
    if sources.len() > 1 {
        warn!(
            "{} sequences given; only '{}' is simulated.",
            sources.len(),
            sources[0].id
        );
    }
    Ok((!sources.is_empty()).then(|| sources.swap_remove(0)))
}

/// The key results are stored under: the sequence id, else the explicit `--id`.
pub fn record_key(source: Option<&SequenceSource>, settings: &RunSettings) -> Option<String> {
    source
        .map(|s| s.id.clone())
        .or_else(|| settings.record_id.clone())
        .filter(|_| settings.persist)
}

/// The stored score to bias a run with, when `--use-latest-score` was given.
pub fn latest_score_for(
    store: &dyn ResultStore,
    source: Option<&SequenceSource>,
    use_latest: bool,
) -> Result<Option<SequenceScore>> {
    if !use_latest {
        return Ok(None);
    }
    let source = source.ok_or_else(|| {
        CliError::Argument("--use-latest-score needs --sequence or --fasta.".to_string())
    })?;
    let score = store.latest_score(&source.id).cloned();
    match &score {
        Some(score) => info!("Biasing with the latest {} score for '{}'.", score.model, source.id),
        None => warn!("No stored score for '{}'; running without score bias.", source.id),
    }
    Ok(score)
}

pub fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Runs CPU-bound simulation work off the async runtime, bounded by `timeout`.
pub async fn run_blocking<T, F>(timeout: Option<Duration>, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(f);
    let joined = match timeout {
        Some(limit) => tokio::time::timeout(limit, handle)
            .await
            .map_err(|_| CliError::Timeout(limit))?,
        None => handle.await,
    };
    joined.map_err(|e| CliError::Other(anyhow::anyhow!("Simulation task failed: {}", e)))?
}

/// Writes `report` to the configured output file, or to stdout.
pub fn emit<R: Reportable>(report: &R, settings: &RunSettings) -> Result<()> {
    match &settings.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            report::write_report(report, settings.format, &mut writer)?;
            writer.flush()?;
            info!("Report written to {:?}", path);
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            report::write_report(report, settings.format, &mut lock)?;
        }
    }
    Ok(())
}

/// Emits a tagged failure report for simulation errors before passing the
/// error on, so consumers of the output always receive a structured object.
pub fn emit_on_failure<T>(result: Result<T>, settings: &RunSettings) -> Result<T> {
    if let Err(CliError::Simulation(error)) = &result {
        let failure = FailureReport::from(error.clone());
        if let Err(e) = emit(&failure, settings) {
            warn!("Could not write the failure report: {}", e);
        }
    }
    result
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::cli::OutputArgs;
    use std::path::Path;

    pub fn context() -> CommandContext {
        let mut file = FileConfig::default();
        file.apply_set_values(&["store.backend=memory".to_string()])
            .unwrap();
        CommandContext {
            file,
            defaults: DefaultsConfig::default(),
            show_progress: false,
        }
    }

    pub fn json_context(store_path: &Path) -> CommandContext {
        let mut file = FileConfig::default();
        file.apply_set_values(&[format!("store.path={}", store_path.display())])
            .unwrap();
        CommandContext {
            file,
            defaults: DefaultsConfig::default(),
            show_progress: false,
        }
    }

    pub fn output_to(path: &Path) -> OutputArgs {
        OutputArgs {
            output: Some(path.to_path_buf()),
            seed: Some(42),
            ..OutputArgs::default()
        }
    }

    pub fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }
}

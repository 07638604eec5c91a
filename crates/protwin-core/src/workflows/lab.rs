use super::outcome::SimulationOutcome;
use crate::core::models::kinetics::{EngineKind, ExperimentalConditions, KineticRun};
use crate::core::models::score::SequenceScore;
use crate::core::models::sequence::ProteinSequence;
use crate::core::models::status::RunStatus;
use crate::engine::bias::Bias;
use crate::engine::config::{LabParams, LabParamsBuilder};
use crate::engine::error::SimulationError;
use crate::engine::kinetics::{self, params};
use crate::engine::progress::{Progress, ProgressReporter};
use rand::Rng;
use serde_json::Value;
use tracing::{info, instrument};

#[instrument(skip_all, name = "lab_workflow", fields(duration = config.duration))]
pub fn run(
    config: &LabParams,
    sequence: Option<&ProteinSequence>,
    score: Option<&SequenceScore>,
    rng: &mut impl Rng,
    reporter: &ProgressReporter,
) -> Result<KineticRun, SimulationError> {
    let engine = kinetics::select(config.engine)?;
    let bias = Bias::from_inputs(sequence, score);
    info!(engine = ?engine, bias = bias.label(), "Starting virtual lab run.");

    reporter.report(Progress::PhaseStart { name: "Kinetics" });
    let trace = kinetics::simulate(engine, bias, config.duration, rng, reporter)?;
    reporter.report(Progress::PhaseFinish);

    let derived_kinetics = match engine {
        EngineKind::EventStepped => params::derived_kinetics(bias, params::constants_for(bias)),
        EngineKind::ClosedForm => None,
    };
    let sequence_preview = sequence
        .or_else(|| score.map(|s| &s.sequence))
        .map(ProteinSequence::preview);

    info!(
        samples = trace.samples.len(),
        efficiency = trace.metrics.efficiency,
        "Virtual lab run complete."
    );
    Ok(KineticRun {
        status: RunStatus::Completed,
        duration: config.duration,
        engine,
        derived_kinetics,
        sequence_preview,
        time_series: trace.samples,
        events: trace.events,
        final_metrics: trace.metrics,
        conditions: conditions(engine, config),
    })
}

fn conditions(engine: EngineKind, config: &LabParams) -> ExperimentalConditions {
    let (substrate_concentration, initial_enzyme) = match event_engine_stock(engine) {
        Some((substrate, enzyme)) => (substrate, Some(enzyme)),
        None => (config.substrate, None),
    };
    ExperimentalConditions {
        temperature: config.temperature,
        ph: config.ph,
        substrate_concentration,
        initial_enzyme,
    }
}

/// Initial substrate and enzyme stock of the event-stepped engine.
#[cfg(feature = "event-engine")]
fn event_engine_stock(engine: EngineKind) -> Option<(f64, f64)> {
    use crate::engine::kinetics::event_stepped::{INITIAL_ENZYME, INITIAL_SUBSTRATE};
    (engine == EngineKind::EventStepped).then_some((INITIAL_SUBSTRATE, INITIAL_ENZYME))
}

#[cfg(not(feature = "event-engine"))]
fn event_engine_stock(_engine: EngineKind) -> Option<(f64, f64)> {
    None
}

/// Parses loosely typed inputs and runs the lab, converting any failure into a
/// tagged result.
pub fn simulate_lab(
    params: &Value,
    sequence: Option<&str>,
    score: Option<&SequenceScore>,
    rng: &mut impl Rng,
) -> SimulationOutcome<KineticRun> {
    try_simulate_lab(params, sequence, score, rng, &ProgressReporter::new()).into()
}

pub fn try_simulate_lab(
    params: &Value,
    sequence: Option<&str>,
    score: Option<&SequenceScore>,
    rng: &mut impl Rng,
    reporter: &ProgressReporter,
) -> Result<KineticRun, SimulationError> {
    let config = LabParamsBuilder::from_json(params)?.build()?;
    let sequence = sequence.map(ProteinSequence::parse).transpose()?;
    run(&config, sequence.as_ref(), score, rng, reporter)
}

use super::outcome::SimulationOutcome;
use crate::core::models::bioreactor::{
    BioreactorRun, HorizonPolicy, InitialConditions, ReactorModel,
};
use crate::core::models::score::SequenceScore;
use crate::core::models::sequence::ProteinSequence;
use crate::core::models::status::RunStatus;
use crate::engine::bias::Bias;
use crate::engine::bioreactor::{self, adjust};
use crate::engine::config::{BioreactorParamsBuilder, BioreactorSetup, BioreactorSetupBuilder};
use crate::engine::error::SimulationError;
use crate::engine::noise::round_to;
use crate::engine::progress::{Progress, ProgressReporter};
use rand::Rng;
use serde_json::Value;
use tracing::{info, instrument};

#[instrument(skip_all, name = "bioreactor_workflow", fields(y0 = setup.initial_biomass))]
pub fn run(
    setup: &BioreactorSetup,
    sequence: Option<&ProteinSequence>,
    score: Option<&SequenceScore>,
    rng: &mut impl Rng,
    reporter: &ProgressReporter,
) -> Result<BioreactorRun, SimulationError> {
    let bias = Bias::from_inputs(sequence, score);
    info!(bias = bias.label(), horizon = ?setup.horizon, "Starting bioreactor run.");

    reporter.report(Progress::PhaseStart { name: "Integration" });
    let trace = bioreactor::simulate(setup, bias, rng, reporter)?;
    reporter.report(Progress::PhaseFinish);

    let k = setup.params.rate_constant;
    let plm_integration = adjust::plm_integration(k, &trace.adjustment, bias);
    let interpretation = bias
        .score()
        .map(|s| adjust::interpretation(s.model).to_string());
    let sequence_preview = sequence
        .or_else(|| score.map(|s| &s.sequence))
        .map(ProteinSequence::preview);

    info!(
        max_biomass = trace.metrics.max_biomass,
        efficiency = trace.metrics.efficiency,
        "Bioreactor run complete."
    );
    Ok(BioreactorRun {
        model: ReactorModel::Dynamic,
        status: RunStatus::Completed,
        time_window: setup.window,
        horizon: setup.horizon,
        initial_conditions: InitialConditions {
            initial_biomass: setup.initial_biomass,
            temperature: setup.params.temperature,
            ph: setup.params.ph,
            initial_oxygen: setup.params.oxygen,
        },
        base_params: setup.params,
        adjusted_rate_constant: round_to(trace.adjustment.rate_constant, 4),
        sequence_preview,
        time_series: trace.samples,
        final_metrics: trace.metrics,
        alerts: trace.alerts,
        plm_integration,
        interpretation,
    })
}

/// Parses loosely typed inputs and runs the twin over the nominal horizon,
/// converting any failure into a tagged result.
pub fn simulate_bioreactor(
    initial_biomass: f64,
    time_window: &[f64],
    params: &Value,
    sequence: Option<&str>,
    score: Option<&SequenceScore>,
    rng: &mut impl Rng,
) -> SimulationOutcome<BioreactorRun> {
    try_simulate_bioreactor(
        initial_biomass,
        time_window,
        params,
        sequence,
        score,
        HorizonPolicy::Nominal,
        rng,
    )
    .into()
}

pub fn try_simulate_bioreactor(
    initial_biomass: f64,
    time_window: &[f64],
    params: &Value,
    sequence: Option<&str>,
    score: Option<&SequenceScore>,
    horizon: HorizonPolicy,
    rng: &mut impl Rng,
) -> Result<BioreactorRun, SimulationError> {
    let base = BioreactorParamsBuilder::from_json(params)?.build()?;
    let setup = BioreactorSetupBuilder::new()
        .initial_biomass(initial_biomass)
        .window(time_window)
        .horizon(horizon)
        .params(base)
        .build()?;
    let sequence = sequence.map(ProteinSequence::parse).transpose()?;
    run(&setup, sequence.as_ref(), score, rng, &ProgressReporter::new())
}

use crate::core::models::score::{ModelId, SequenceScore};
use crate::core::models::sequence::ProteinSequence;
use crate::engine::error::SimulationError;
use crate::engine::scoring;
use rand::Rng;
use tracing::{info, instrument};

#[instrument(skip_all, name = "score_workflow", fields(model = %model, length = sequence.len()))]
pub fn run(sequence: &ProteinSequence, model: ModelId, rng: &mut impl Rng) -> SequenceScore {
    let score = scoring::score(sequence, model, rng);
    info!(confidence = score.confidence, "Sequence scored.");
    score
}

/// Validates `sequence` and scores it with the model named by `model_selector`.
///
/// Unrecognized selectors fall back to ESM-2.
pub fn score_sequence(
    sequence: &str,
    model_selector: &str,
    rng: &mut impl Rng,
) -> Result<SequenceScore, SimulationError> {
    let sequence = ProteinSequence::parse(sequence)?;
    Ok(run(&sequence, ModelId::resolve(model_selector), rng))
}

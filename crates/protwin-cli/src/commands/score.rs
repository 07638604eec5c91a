use super::{CommandContext, SequenceSource, emit, emit_on_failure, read_sequences, rng_for, run_blocking};
use crate::cli::ScoreArgs;
use crate::config::builder;
use crate::error::{CliError, Result};
use crate::store;
use protwin::core::io::report::{ReportError, Reportable};
use protwin::core::models::score::SequenceScore;
use protwin::workflows;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Write;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ScoredSequence {
    pub id: String,
    #[serde(flatten)]
    pub score: SequenceScore,
}

/// Scores of several FASTA records, reported together.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ScoreBatch(pub Vec<ScoredSequence>);

impl Reportable for ScoreBatch {
    fn title(&self) -> String {
        format!("{} análisis", self.0.len())
    }

    fn fields(&self) -> std::result::Result<Value, ReportError> {
        let mut by_id = Map::new();
        for entry in &self.0 {
            by_id.insert(entry.id.clone(), serde_json::to_value(&entry.score)?);
        }
        Ok(Value::Object(by_id))
    }

    fn write_csv<W: Write>(&self, writer: &mut csv::Writer<W>) -> std::result::Result<(), ReportError> {
        writer.write_record(["id", "modelo_usado", "confianza", "longitud", "secuencia"])?;
        for entry in &self.0 {
            writer.write_record([
                entry.id.clone(),
                entry.score.model.to_string(),
                entry.score.confidence.to_string(),
                entry.score.length.to_string(),
                entry.score.sequence.as_str().to_string(),
            ])?;
        }
        Ok(())
    }
}

pub async fn run(args: ScoreArgs, ctx: &CommandContext) -> Result<()> {
    let settings = builder::run_settings(&ctx.file, &args.output, &ctx.defaults)?;
    let model = builder::model(&ctx.file, args.model.as_deref(), &ctx.defaults);

    let result = async {
        let sources = read_sequences(&args.input, settings.record_id.as_deref())?;
        if sources.is_empty() {
            return Err(CliError::Argument(
                "Provide a sequence with --sequence or --fasta.".to_string(),
            ));
        }
        info!("Scoring {} sequence(s) with {}.", sources.len(), model);

        let seed = settings.seed;
        run_blocking(settings.timeout, move || {
            let mut rng = rng_for(seed);
            Ok(sources
                .into_iter()
                .map(|SequenceSource { id, sequence }| ScoredSequence {
                    score: workflows::score::run(&sequence, model, &mut rng),
                    id,
                })
                .collect::<Vec<_>>())
        })
        .await
    }
    .await;
    let mut scored = emit_on_failure(result, &settings)?;

    if settings.persist {
        let mut store = store::open(&settings.store)?;
        for entry in &scored {
            store.put_score(&entry.id, &entry.score)?;
        }
    }

    if scored.len() == 1 {
        let only = scored.swap_remove(0);
        emit(&only.score, &settings)
    } else {
        emit(&ScoreBatch(scored), &settings)
    }
}

use super::{CommandContext, emit, emit_on_failure, first_sequence, rng_for, run_blocking};
use crate::cli::PipelineArgs;
use crate::config::builder;
use crate::error::{CliError, Result};
use crate::store;
use crate::utils::progress::CliProgressHandler;
use protwin::core::io::report::Reportable;
use protwin::core::models::bioreactor::BioreactorRun;
use protwin::core::models::kinetics::KineticRun;
use protwin::core::models::score::SequenceScore;
use protwin::engine::progress::ProgressReporter;
use protwin::workflows::{bioreactor, lab, score};
use serde::Serialize;
use tracing::info;

/// A score and the two simulations it biased.
#[derive(Debug, Serialize)]
pub struct PipelineReport {
    pub id: String,
    #[serde(rename = "analisis")]
    pub score: SequenceScore,
    #[serde(rename = "laboratorio")]
    pub lab: KineticRun,
    #[serde(rename = "biorreactor")]
    pub bioreactor: BioreactorRun,
}

impl Reportable for PipelineReport {
    fn title(&self) -> String {
        format!("Pipeline {} ({})", self.score.model, self.id)
    }
}

pub async fn run(args: PipelineArgs, ctx: &CommandContext) -> Result<()> {
    let settings = builder::run_settings(&ctx.file, &args.output, &ctx.defaults)?;
    let model = builder::model(&ctx.file, args.model.as_deref(), &ctx.defaults);
    let lab_params =
        emit_on_failure(builder::lab_settings(&ctx.file, &args.lab, None), &settings)?.params;
    let setup = emit_on_failure(
        builder::bioreactor_settings(&ctx.file, &args.bioreactor, None, &ctx.defaults),
        &settings,
    )?
    .setup;

    let result = async {
        let source = first_sequence(&args.input, settings.record_id.as_deref())?.ok_or_else(|| {
            CliError::Argument("The pipeline needs --sequence or --fasta.".to_string())
        })?;
        info!("Running pipeline for '{}' with {}.", source.id, model);

        let progress = CliProgressHandler::new(ctx.show_progress);
        let callback = progress.get_callback();
        let seed = settings.seed;
        let report = run_blocking(settings.timeout, move || {
            let reporter = ProgressReporter::with_callback(callback);
            let mut rng = rng_for(seed);
            let sequence = &source.sequence;

            let scored = reporter.phase("Scoring", || score::run(sequence, model, &mut rng));
            let kinetic_run = lab::run(&lab_params, Some(sequence), Some(&scored), &mut rng, &reporter)?;
            let reactor_run =
                bioreactor::run(&setup, Some(sequence), Some(&scored), &mut rng, &reporter)?;
            Ok(PipelineReport {
                id: source.id,
                score: scored,
                lab: kinetic_run,
                bioreactor: reactor_run,
            })
        })
        .await;
        progress.clear();
        report
    }
    .await;
    let report = emit_on_failure(result, &settings)?;

    if settings.persist {
        let mut store = store::open(&settings.store)?;
        store.put_score(&report.id, &report.score)?;
        store.put_lab(&report.id, &report.lab)?;
        store.put_bioreactor(&report.id, &report.bioreactor)?;
    }
    emit(&report, &settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{BioreactorOverrides, LabOverrides, SequenceInput};
    use crate::commands::test_support::{json_context, output_to, read_json};
    use crate::store::{JsonFileStore, ResultStore};
    use std::fs;
    use tempfile::tempdir;

    fn args(output: crate::cli::OutputArgs) -> PipelineArgs {
        PipelineArgs {
            input: SequenceInput {
                sequence: Some("MKTAYIAKQRQISFVKSHFSRQ".into()),
                fasta: None,
            },
            model: Some("protbert".into()),
            lab: LabOverrides {
                duration: Some(5.0),
                ..LabOverrides::default()
            },
            bioreactor: BioreactorOverrides {
                rate_constant: Some(0.1),
                ..BioreactorOverrides::default()
            },
            output,
        }
    }

    #[tokio::test]
    async fn pipeline_biases_both_simulations_and_stores_everything() {
        let dir = tempdir().unwrap();
        let store_path = dir.path().join("store.json");
        let out = dir.path().join("pipeline.json");
        let mut output = output_to(&out);
        output.id = Some("ubiquitin".into());
        run(args(output), &json_context(&store_path)).await.unwrap();

        let json = read_json(&out);
        assert_eq!(json["id"], "ubiquitin");
        assert_eq!(json["analisis"]["modelo_usado"], "ProtBERT");
        assert_eq!(json["laboratorio"]["estado"], "completado");
        assert_eq!(json["biorreactor"]["integracion_plm"]["modelo_usado"], "ProtBERT");

        let store = JsonFileStore::open(&store_path).unwrap();
        let kinds: Vec<_> = store
            .history(Some("ubiquitin"))
            .iter()
            .map(|r| r.payload.kind())
            .collect();
        assert_eq!(kinds, ["analisis", "laboratorio", "biorreactor"]);
    }

    #[tokio::test]
    async fn text_output_skips_nested_time_series() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("pipeline.txt");
        let mut output = output_to(&out);
        output.format = Some("text".into());
        output.no_store = true;
        run(args(output), &json_context(&dir.path().join("store.json")))
            .await
            .unwrap();

        let text = fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("Pipeline ProtBERT"));
        assert!(text.contains("laboratorio.estado: completado"));
        assert!(!text.contains("datos_temporales"));
        assert!(!dir.path().join("store.json").exists());
    }
}

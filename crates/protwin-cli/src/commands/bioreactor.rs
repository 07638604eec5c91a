use super::{
    CommandContext, emit, emit_on_failure, first_sequence, latest_score_for, record_key, rng_for,
    run_blocking,
};
use crate::cli::BioreactorArgs;
use crate::config::builder;
use crate::error::Result;
use crate::store;
use crate::utils::progress::CliProgressHandler;
use protwin::engine::progress::ProgressReporter;
use protwin::workflows::{batch, bioreactor};
use tracing::info;

pub async fn run(args: BioreactorArgs, ctx: &CommandContext) -> Result<()> {
    let settings = builder::run_settings(&ctx.file, &args.output, &ctx.defaults)?;
    let reactor = emit_on_failure(
        builder::bioreactor_settings(&ctx.file, &args.params, args.replicates, &ctx.defaults),
        &settings,
    )?;
    let source = emit_on_failure(
        first_sequence(&args.input, settings.record_id.as_deref()),
        &settings,
    )?;
    let mut store = store::open(&settings.store)?;
    let score = latest_score_for(store.as_ref(), source.as_ref(), args.use_latest_score)?;
    let sequence = source.as_ref().map(|s| s.sequence.clone());
    let setup = reactor.setup;

    if let Some(n) = reactor.replicates {
        let base_seed = settings.seed.unwrap_or(ctx.defaults.replicate_seed);
        info!("Running {} bioreactor replicates from seed {}.", n, base_seed);
        let result = run_blocking(settings.timeout, move || {
            Ok(batch::run_bioreactor_replicates(
                n,
                base_seed,
                &setup,
                sequence.as_ref(),
                score.as_ref(),
            )?)
        })
        .await;
        let replicates = emit_on_failure(result, &settings)?;
        if let Some(key) = record_key(source.as_ref(), &settings) {
            for replicate in &replicates.runs {
                store.put_bioreactor(&key, replicate)?;
            }
        }
        return emit(&replicates, &settings);
    }

    let progress = CliProgressHandler::new(ctx.show_progress);
    let callback = progress.get_callback();
    let seed = settings.seed;
    let result = run_blocking(settings.timeout, move || {
        let reporter = ProgressReporter::with_callback(callback);
        let mut rng = rng_for(seed);
        Ok(bioreactor::run(
            &setup,
            sequence.as_ref(),
            score.as_ref(),
            &mut rng,
            &reporter,
        )?)
    })
    .await;
    progress.clear();
    let reactor_run = emit_on_failure(result, &settings)?;

    if let Some(key) = record_key(source.as_ref(), &settings) {
        store.put_bioreactor(&key, &reactor_run)?;
    }
    emit(&reactor_run, &settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{BioreactorOverrides, OutputArgs, SequenceInput};
    use crate::commands::test_support::{context, json_context, output_to, read_json};
    use crate::error::CliError;
    use crate::store::{JsonFileStore, ResultStore};
    use protwin::engine::error::SimulationError;
    use std::fs;
    use tempfile::tempdir;

    fn args(output: OutputArgs) -> BioreactorArgs {
        BioreactorArgs {
            input: SequenceInput::default(),
            params: BioreactorOverrides {
                rate_constant: Some(0.1),
                ..BioreactorOverrides::default()
            },
            use_latest_score: false,
            replicates: None,
            output,
        }
    }

    #[tokio::test]
    async fn nominal_run_reports_25_samples() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("reactor.json");
        run(args(output_to(&out)), &context()).await.unwrap();

        let json = read_json(&out);
        assert_eq!(json["estado"], "completado");
        assert_eq!(json["datos_temporales"].as_array().unwrap().len(), 25);
        assert_eq!(json["ventana_temporal"], serde_json::json!([0.0, 48.0]));
    }

    #[tokio::test]
    async fn csv_output_has_one_row_per_sample() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("reactor.csv");
        let mut output = output_to(&out);
        output.format = Some("csv".into());
        run(args(output), &context()).await.unwrap();

        let csv = fs::read_to_string(&out).unwrap();
        assert_eq!(csv.lines().count(), 26);
    }

    #[tokio::test]
    async fn missing_rate_constant_is_an_invalid_parameter() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("reactor.json");
        let mut reactor_args = args(output_to(&out));
        reactor_args.params.rate_constant = None;
        assert!(matches!(
            run(reactor_args, &context()).await,
            Err(CliError::Simulation(SimulationError::InvalidParameter(_)))
        ));
        assert_eq!(read_json(&out)["tipo_error"], "parametro_invalido");
    }

    #[tokio::test]
    async fn use_latest_score_without_sequence_is_rejected() {
        let dir = tempdir().unwrap();
        let mut reactor_args = args(output_to(&dir.path().join("reactor.json")));
        reactor_args.use_latest_score = true;
        assert!(matches!(
            run(reactor_args, &context()).await,
            Err(CliError::Argument(_))
        ));
    }

    #[tokio::test]
    async fn invalid_sequence_writes_a_tagged_failure() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("reactor.json");
        let mut reactor_args = args(output_to(&out));
        reactor_args.input.sequence = Some("MK1".into());
        assert!(matches!(
            run(reactor_args, &context()).await,
            Err(CliError::Simulation(SimulationError::InvalidSequence(_)))
        ));
        assert_eq!(read_json(&out)["tipo_error"], "secuencia_invalida");
    }

    #[tokio::test]
    async fn replicates_are_stored_under_the_sequence_id() {
        let dir = tempdir().unwrap();
        let store_path = dir.path().join("store.json");
        let mut reactor_args = args(output_to(&dir.path().join("batch.json")));
        reactor_args.input.sequence = Some("MKTAYIAKQR".into());
        reactor_args.replicates = Some(2);
        run(reactor_args, &json_context(&store_path)).await.unwrap();

        let store = JsonFileStore::open(&store_path).unwrap();
        let kinds: Vec<_> = store
            .history(Some("MKTAYIAKQR"))
            .iter()
            .map(|r| r.payload.kind())
            .collect();
        assert_eq!(kinds, ["biorreactor"; 2]);
    }
}

use super::{
    CommandContext, emit, emit_on_failure, first_sequence, latest_score_for, record_key, rng_for,
    run_blocking,
};
use crate::cli::LabArgs;
use crate::config::builder;
use crate::error::Result;
use crate::store;
use crate::utils::progress::CliProgressHandler;
use protwin::engine::progress::ProgressReporter;
use protwin::workflows::{batch, lab};
use tracing::info;

pub async fn run(args: LabArgs, ctx: &CommandContext) -> Result<()> {
    let settings = builder::run_settings(&ctx.file, &args.output, &ctx.defaults)?;
    let lab_settings = emit_on_failure(
        builder::lab_settings(&ctx.file, &args.params, args.replicates),
        &settings,
    )?;
    let source = emit_on_failure(
        first_sequence(&args.input, settings.record_id.as_deref()),
        &settings,
    )?;
    let mut store = store::open(&settings.store)?;
    let score = latest_score_for(store.as_ref(), source.as_ref(), args.use_latest_score)?;
    let sequence = source.as_ref().map(|s| s.sequence.clone());
    let params = lab_settings.params;

    if let Some(n) = lab_settings.replicates {
        let base_seed = settings.seed.unwrap_or(ctx.defaults.replicate_seed);
        info!("Running {} lab replicates from seed {}.", n, base_seed);
        let result = run_blocking(settings.timeout, move || {
            Ok(batch::run_lab_replicates(
                n,
                base_seed,
                &params,
                sequence.as_ref(),
                score.as_ref(),
            )?)
        })
        .await;
        let replicates = emit_on_failure(result, &settings)?;
        if let Some(key) = record_key(source.as_ref(), &settings) {
            for replicate in &replicates.runs {
                store.put_lab(&key, replicate)?;
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
        Ok(lab::run(
            &params,
            sequence.as_ref(),
            score.as_ref(),
            &mut rng,
            &reporter,
        )?)
    })
    .await;
    progress.clear();
    let kinetic_run = emit_on_failure(result, &settings)?;

    if let Some(key) = record_key(source.as_ref(), &settings) {
        store.put_lab(&key, &kinetic_run)?;
    }
    emit(&kinetic_run, &settings)
}

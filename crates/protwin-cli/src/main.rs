mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod store;
mod utils;

use crate::cli::{Cli, Commands};
use crate::commands::CommandContext;
use crate::config::FileConfig;
use crate::config::defaults::DefaultsConfig;
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("🚀 protwin CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Some(num_threads) = cli.threads {
        info!("Setting Rayon global thread pool to {} threads.", num_threads);
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }

    let ctx = CommandContext {
        file: FileConfig::load(cli.config.as_deref(), &cli.set_values)?,
        defaults: DefaultsConfig::default(),
        show_progress: !cli.quiet,
    };

    let command_result = match cli.command {
        Commands::Score(args) => {
            info!("Dispatching to 'score' command.");
            commands::score::run(args, &ctx).await
        }
        Commands::Lab(args) => {
            info!("Dispatching to 'lab' command.");
            commands::lab::run(args, &ctx).await
        }
        Commands::Bioreactor(args) => {
            info!("Dispatching to 'bioreactor' command.");
            commands::bioreactor::run(args, &ctx).await
        }
        Commands::Pipeline(args) => {
            info!("Dispatching to 'pipeline' command.");
            commands::pipeline::run(args, &ctx).await
        }
        Commands::History(args) => {
            info!("Dispatching to 'history' command.");
            commands::history::run(args, &ctx).await
        }
    };

    match &command_result {
        Ok(()) => {
            info!("✅ Command completed successfully.");
            if !cli.quiet {
                eprintln!("✅ Command completed successfully.");
            }
        }
        Err(e) => {
            error!("❌ Command failed: {}", e);
        }
    }

    command_result
}

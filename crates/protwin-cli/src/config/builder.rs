use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use crate::cli::{BioreactorOverrides, LabOverrides, OutputArgs};
use crate::error::{CliError, Result};
use directories::ProjectDirs;
use protwin::core::io::report::ReportFormat;
use protwin::core::models::bioreactor::HorizonPolicy;
use protwin::core::models::score::ModelId;
use protwin::engine::config::{
    BioreactorParamsBuilder, BioreactorSetup, BioreactorSetupBuilder, ConfigError,
    EnginePreference, LabParams, LabParamsBuilder,
};
use protwin::engine::error::SimulationError;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    Memory,
    #[default]
    Json,
}

impl FromStr for StoreBackend {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "json" | "file" => Ok(Self::Json),
            other => Err(CliError::Config(format!(
                "Unknown store backend '{}'. Expected 'memory' or 'json'.",
                other
            ))),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Memory => "memory",
            Self::Json => "json",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub path: PathBuf,
}

/// Settings shared by every simulation subcommand.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
    pub seed: Option<u64>,
    pub timeout: Option<Duration>,
    pub record_id: Option<String>,
    pub persist: bool,
    pub store: StoreSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabSettings {
    pub params: LabParams,
    pub replicates: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BioreactorSettings {
    pub setup: BioreactorSetup,
    pub replicates: Option<usize>,
}

pub fn run_settings(
    file: &FileConfig,
    args: &OutputArgs,
    defaults: &DefaultsConfig,
) -> Result<RunSettings> {
    let output_file = file.output.clone().unwrap_or_default();

    let format = match args.format.as_deref().or(output_file.format.as_deref()) {
        Some(name) => ReportFormat::from_str(name).map_err(CliError::Config)?,
        None => defaults.format,
    };
    let timeout = args
        .timeout_ms
        .or(output_file.timeout_ms)
        .map(Duration::from_millis);

    Ok(RunSettings {
        format,
        output: args.output.clone(),
        seed: args.seed.or(file.seed),
        timeout,
        record_id: args.id.clone(),
        persist: !args.no_store,
        store: store_settings(file, defaults)?,
    })
}

pub fn store_settings(file: &FileConfig, defaults: &DefaultsConfig) -> Result<StoreSettings> {
    let store_file = file.store.clone().unwrap_or_default();
    let backend = match store_file.backend.as_deref() {
        Some(name) => name.parse()?,
        None => StoreBackend::default(),
    };
    let path = match (store_file.path, backend) {
        (Some(path), _) => path,
        (None, StoreBackend::Memory) => PathBuf::new(),
        (None, StoreBackend::Json) => default_store_path(defaults)?,
    };
    Ok(StoreSettings { backend, path })
}

fn default_store_path(defaults: &DefaultsConfig) -> Result<PathBuf> {
    ProjectDirs::from("org", "protwin", "protwin")
        .map(|dirs| dirs.data_dir().join(defaults.store_file_name))
        .ok_or_else(|| {
            CliError::Config(
                "Could not determine a data directory; set `store.path` explicitly.".to_string(),
            )
        })
}

/// Unrecognized names fall back to the default model with a warning.
pub fn model(file: &FileConfig, cli_model: Option<&str>, defaults: &DefaultsConfig) -> ModelId {
    let file_model = file.scoring.as_ref().and_then(|s| s.model.as_deref());
    cli_model
        .or(file_model)
        .map(ModelId::resolve)
        .unwrap_or(defaults.model)
}

/// Simulation parameters the core rejects are reported like any other
/// simulation failure.
fn invalid_parameter(error: ConfigError) -> CliError {
    CliError::Simulation(SimulationError::InvalidParameter(error))
}

pub fn lab_settings(
    file: &FileConfig,
    args: &LabOverrides,
    cli_replicates: Option<usize>,
) -> Result<LabSettings> {
    let lab_file = file.lab.clone().unwrap_or_default();
    let mut builder = LabParamsBuilder::new();

    if let Some(duration) = args.duration.or(lab_file.duration) {
        builder = builder.duration(duration);
    }
    if let Some(temperature) = args.temperature.or(lab_file.temperature) {
        builder = builder.temperature(temperature);
    }
    if let Some(ph) = args.ph.or(lab_file.ph) {
        builder = builder.ph(ph);
    }
    if let Some(substrate) = args.substrate.or(lab_file.substrate) {
        builder = builder.substrate(substrate);
    }
    if let Some(engine) = args.engine.as_deref().or(lab_file.engine.as_deref()) {
        let engine = engine.parse::<EnginePreference>().map_err(invalid_parameter)?;
        builder = builder.engine(engine);
    }

    Ok(LabSettings {
        params: builder.build().map_err(invalid_parameter)?,
        replicates: cli_replicates.or(lab_file.replicates),
    })
}

pub fn bioreactor_settings(
    file: &FileConfig,
    args: &BioreactorOverrides,
    cli_replicates: Option<usize>,
    defaults: &DefaultsConfig,
) -> Result<BioreactorSettings> {
    let bio_file = file.bioreactor.clone().unwrap_or_default();

    let mut params = BioreactorParamsBuilder::new();
    if let Some(k) = args.rate_constant.or(bio_file.rate_constant) {
        params = params.rate_constant(k);
    }
    if let Some(temperature) = args.temperature.or(bio_file.temperature) {
        params = params.temperature(temperature);
    }
    if let Some(ph) = args.ph.or(bio_file.ph) {
        params = params.ph(ph);
    }
    if let Some(oxygen) = args.oxygen.or(bio_file.oxygen) {
        params = params.oxygen(oxygen);
    }
    let params = params.build().map_err(invalid_parameter)?;

    let horizon = match args.horizon.as_deref().or(bio_file.horizon.as_deref()) {
        Some(name) => HorizonPolicy::from_str(name).map_err(CliError::Config)?,
        None => HorizonPolicy::default(),
    };
    let window = args
        .window
        .clone()
        .or(bio_file.window)
        .unwrap_or_else(|| defaults.window.to_vec());

    let setup = BioreactorSetupBuilder::new()
        .initial_biomass(
            args.initial_biomass
                .or(bio_file.initial_biomass)
                .unwrap_or(defaults.initial_biomass),
        )
        .window(&window)
        .horizon(horizon)
        .params(params)
        .build()
        .map_err(invalid_parameter)?;

    Ok(BioreactorSettings {
        setup,
        replicates: cli_replicates.or(bio_file.replicates),
    })
}

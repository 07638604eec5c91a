use protwin::core::io::report::ReportFormat;
use protwin::core::models::score::ModelId;

/// Values used when neither the config file nor the command line sets them.
///
/// Lab and reactor parameter defaults live in the core builders.
pub struct DefaultsConfig {
    pub model: ModelId,
    pub format: ReportFormat,
    pub initial_biomass: f64,
    pub window: [f64; 2],
    pub replicate_seed: u64,
    pub store_file_name: &'static str,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: ModelId::Esm2,
            format: ReportFormat::Json,
            initial_biomass: 1.0,
            window: [0.0, 48.0],
            replicate_seed: 0,
            store_file_name: "results.json",
        }
    }
}

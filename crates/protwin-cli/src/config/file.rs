use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileOutputConfig {
    pub format: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileStoreConfig {
    pub backend: Option<String>,
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileScoringConfig {
    pub model: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileLabConfig {
    pub duration: Option<f64>,
    pub temperature: Option<f64>,
    pub ph: Option<f64>,
    pub substrate: Option<f64>,
    pub engine: Option<String>,
    pub replicates: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileBioreactorConfig {
    pub initial_biomass: Option<f64>,
    pub window: Option<Vec<f64>>,
    pub rate_constant: Option<f64>,
    pub temperature: Option<f64>,
    pub ph: Option<f64>,
    pub oxygen: Option<f64>,
    pub horizon: Option<String>,
    pub replicates: Option<usize>,
}

/// The TOML configuration file. Every field is optional; unset values fall
/// through to command-line flags and then to defaults.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub seed: Option<u64>,
    pub output: Option<FileOutputConfig>,
    pub store: Option<FileStoreConfig>,
    pub scoring: Option<FileScoringConfig>,
    pub lab: Option<FileLabConfig>,
    pub bioreactor: Option<FileBioreactorConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the file when one is given, then applies `--set` overrides.
    pub fn load(path: Option<&Path>, set_values: &[String]) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_set_values(set_values)?;
        Ok(config)
    }

    pub fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;
            let (key, value) = (key.trim(), value.trim());
            debug!(key, value, "Applying --set override.");

            match key {
                "seed" => self.seed = Some(parse_value(key, value)?),
                "output.format" => self.output_mut().format = Some(value.to_string()),
                "output.timeout-ms" => self.output_mut().timeout_ms = Some(parse_value(key, value)?),
                "store.backend" => self.store_mut().backend = Some(value.to_string()),
                "store.path" => self.store_mut().path = Some(PathBuf::from(value)),
                "scoring.model" => self.scoring_mut().model = Some(value.to_string()),
                "lab.duration" => self.lab_mut().duration = Some(parse_value(key, value)?),
                "lab.temperature" => self.lab_mut().temperature = Some(parse_value(key, value)?),
                "lab.ph" => self.lab_mut().ph = Some(parse_value(key, value)?),
                "lab.substrate" => self.lab_mut().substrate = Some(parse_value(key, value)?),
                "lab.engine" => self.lab_mut().engine = Some(value.to_string()),
                "lab.replicates" => self.lab_mut().replicates = Some(parse_value(key, value)?),
                "bioreactor.initial-biomass" => {
                    self.bioreactor_mut().initial_biomass = Some(parse_value(key, value)?)
                }
                "bioreactor.window" => self.bioreactor_mut().window = Some(parse_list(key, value)?),
                "bioreactor.rate-constant" | "bioreactor.k" => {
                    self.bioreactor_mut().rate_constant = Some(parse_value(key, value)?)
                }
                "bioreactor.temperature" => {
                    self.bioreactor_mut().temperature = Some(parse_value(key, value)?)
                }
                "bioreactor.ph" => self.bioreactor_mut().ph = Some(parse_value(key, value)?),
                "bioreactor.oxygen" => self.bioreactor_mut().oxygen = Some(parse_value(key, value)?),
                "bioreactor.horizon" => self.bioreactor_mut().horizon = Some(value.to_string()),
                "bioreactor.replicates" => {
                    self.bioreactor_mut().replicates = Some(parse_value(key, value)?)
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }

    fn output_mut(&mut self) -> &mut FileOutputConfig {
        self.output.get_or_insert_with(Default::default)
    }

    fn store_mut(&mut self) -> &mut FileStoreConfig {
        self.store.get_or_insert_with(Default::default)
    }

    fn scoring_mut(&mut self) -> &mut FileScoringConfig {
        self.scoring.get_or_insert_with(Default::default)
    }

    fn lab_mut(&mut self) -> &mut FileLabConfig {
        self.lab.get_or_insert_with(Default::default)
    }

    fn bioreactor_mut(&mut self) -> &mut FileBioreactorConfig {
        self.bioreactor.get_or_insert_with(Default::default)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value)))
}

/// Parses `a,b` (optionally bracketed) into a list of numbers.
fn parse_list(key: &str, value: &str) -> Result<Vec<f64>> {
    value
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|item| parse_value(key, item.trim()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const FULL_CONFIG: &str = r#"
        seed = 42

        [output]
        format = "csv"
        timeout-ms = 5000

        [store]
        backend = "memory"

        [scoring]
        model = "prottrans"

        [lab]
        duration = 12.5
        engine = "closed-form"

        [bioreactor]
        initial-biomass = 2.0
        window = [0.0, 24.0]
        rate-constant = 0.1
        horizon = "requested-window"
    "#;

    #[test]
    fn parses_every_section() {
        let config: FileConfig = toml::from_str(FULL_CONFIG).unwrap();
        assert_eq!(config.seed, Some(42));
        let output = config.output.unwrap();
        assert_eq!(output.format.as_deref(), Some("csv"));
        assert_eq!(output.timeout_ms, Some(5000));
        assert_eq!(config.store.unwrap().backend.as_deref(), Some("memory"));
        assert_eq!(config.scoring.unwrap().model.as_deref(), Some("prottrans"));
        let lab = config.lab.unwrap();
        assert_eq!(lab.duration, Some(12.5));
        assert_eq!(lab.engine.as_deref(), Some("closed-form"));
        let bio = config.bioreactor.unwrap();
        assert_eq!(bio.window, Some(vec![0.0, 24.0]));
        assert_eq!(bio.rate_constant, Some(0.1));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: std::result::Result<FileConfig, _> = toml::from_str("[lab]\nspeed = 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn from_file_reports_the_path_on_parse_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[lab\nduration = 1").unwrap();
        let err = FileConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn set_values_override_file_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, FULL_CONFIG).unwrap();

        let config = FileConfig::load(
            Some(&path),
            &[
                "lab.duration=3".to_string(),
                "bioreactor.window=[5, 10]".to_string(),
                "bioreactor.k=0.2".to_string(),
            ],
        )
        .unwrap();

        let lab = config.lab.unwrap();
        assert_eq!(lab.duration, Some(3.0));
        assert_eq!(lab.engine.as_deref(), Some("closed-form"));
        let bio = config.bioreactor.unwrap();
        assert_eq!(bio.window, Some(vec![5.0, 10.0]));
        assert_eq!(bio.rate_constant, Some(0.2));
    }

    #[test]
    fn set_values_create_missing_sections() {
        let mut config = FileConfig::default();
        config
            .apply_set_values(&["store.path=/tmp/r.json".to_string(), "seed=9".to_string()])
            .unwrap();
        assert_eq!(
            config.store.unwrap().path,
            Some(PathBuf::from("/tmp/r.json"))
        );
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn malformed_set_values_are_config_errors() {
        let mut config = FileConfig::default();
        for bad in ["lab.duration", "lab.duration=fast", "lab.colour=red"] {
            let result = config.apply_set_values(&[bad.to_string()]);
            assert!(matches!(result, Err(CliError::Config(_))), "{bad}");
        }
    }
}

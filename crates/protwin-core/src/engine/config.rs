use crate::core::models::bioreactor::{HorizonPolicy, ReactorBaseParams, TimeWindow};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_LAB_DURATION: f64 = 10.0;
/// Longest accepted lab run, in simulation time units.
pub const MAX_LAB_DURATION: f64 = 1_000.0;
pub const DEFAULT_LAB_TEMPERATURE: f64 = 37.0;
pub const DEFAULT_LAB_PH: f64 = 7.4;
pub const DEFAULT_LAB_SUBSTRATE: f64 = 1.0;

pub const DEFAULT_REACTOR_TEMPERATURE: f64 = 37.0;
pub const DEFAULT_REACTOR_PH: f64 = 7.2;
pub const DEFAULT_REACTOR_OXYGEN: f64 = 40.0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error("Parameters must be a key/value record, got {0}")]
    NotARecord(&'static str),
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            name,
            reason: reason.into(),
        }
    }
}

/// Which kinetic engine a lab run should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnginePreference {
    /// The event-stepped engine when compiled in, otherwise the closed form.
    #[default]
    Auto,
    EventStepped,
    ClosedForm,
}

impl FromStr for EnginePreference {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "event-stepped" | "event" | "eventos" => Ok(Self::EventStepped),
            "closed-form" | "closed" | "forma-cerrada" => Ok(Self::ClosedForm),
            other => Err(ConfigError::invalid(
                "engine",
                format!("'{other}' is not one of auto, event-stepped, closed-form"),
            )),
        }
    }
}

impl fmt::Display for EnginePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::EventStepped => "event-stepped",
            Self::ClosedForm => "closed-form",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabParams {
    pub duration: f64,
    pub temperature: f64,
    pub ph: f64,
    pub substrate: f64,
    pub engine: EnginePreference,
}

#[derive(Debug, Default, Clone)]
pub struct LabParamsBuilder {
    duration: Option<f64>,
    temperature: Option<f64>,
    ph: Option<f64>,
    substrate: Option<f64>,
    engine: Option<EnginePreference>,
}

impl LabParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
    pub fn ph(mut self, ph: f64) -> Self {
        self.ph = Some(ph);
        self
    }
    pub fn substrate(mut self, substrate: f64) -> Self {
        self.substrate = Some(substrate);
        self
    }
    pub fn engine(mut self, engine: EnginePreference) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Fills the builder from a JSON record. Unknown keys are ignored.
    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        Self::from_map(as_record(value)?)
    }

    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ConfigError> {
        let mut builder = Self::new();
        builder.duration = number(map, &["duracion", "duration"], "duration")?;
        builder.temperature = number(map, &["temperatura", "temperature"], "temperature")?;
        builder.ph = number(map, &["ph"], "ph")?;
        builder.substrate = number(map, &["sustrato", "substrate"], "substrate")?;
        builder.engine = match lookup(map, &["motor", "engine"]) {
            Some(Value::String(s)) => Some(s.parse()?),
            Some(other) => return Err(ConfigError::invalid("engine", type_mismatch(other))),
            None => None,
        };
        Ok(builder)
    }

    pub fn build(self) -> Result<LabParams, ConfigError> {
        let duration = self.duration.unwrap_or(DEFAULT_LAB_DURATION);
        if !duration.is_finite() || duration <= 0.0 {
            return Err(ConfigError::invalid(
                "duration",
                format!("must be a positive number, got {duration}"),
            ));
        }
        if duration > MAX_LAB_DURATION {
            return Err(ConfigError::invalid(
                "duration",
                format!("must not exceed {MAX_LAB_DURATION}, got {duration}"),
            ));
        }

        Ok(LabParams {
            duration,
            temperature: finite(
                "temperature",
                self.temperature.unwrap_or(DEFAULT_LAB_TEMPERATURE),
            )?,
            ph: finite("ph", self.ph.unwrap_or(DEFAULT_LAB_PH))?,
            substrate: finite("substrate", self.substrate.unwrap_or(DEFAULT_LAB_SUBSTRATE))?,
            engine: self.engine.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct BioreactorParamsBuilder {
    rate_constant: Option<f64>,
    temperature: Option<f64>,
    ph: Option<f64>,
    oxygen: Option<f64>,
}

impl BioreactorParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rate_constant(mut self, k: f64) -> Self {
        self.rate_constant = Some(k);
        self
    }
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
    pub fn ph(mut self, ph: f64) -> Self {
        self.ph = Some(ph);
        self
    }
    pub fn oxygen(mut self, oxygen: f64) -> Self {
        self.oxygen = Some(oxygen);
        self
    }

    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        Self::from_map(as_record(value)?)
    }

    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ConfigError> {
        Ok(Self {
            rate_constant: number(map, &["k", "rate_constant"], "k")?,
            temperature: number(map, &["temperatura", "temperature"], "temperature")?,
            ph: number(map, &["ph"], "ph")?,
            oxygen: number(map, &["oxigeno", "oxygen"], "oxygen")?,
        })
    }

    pub fn build(self) -> Result<ReactorBaseParams, ConfigError> {
        let rate_constant = self
            .rate_constant
            .ok_or(ConfigError::MissingParameter("k"))?;
        if !rate_constant.is_finite() || rate_constant <= 0.0 {
            return Err(ConfigError::invalid(
                "k",
                format!("rate constant must be positive, got {rate_constant}"),
            ));
        }

        Ok(ReactorBaseParams {
            rate_constant,
            temperature: finite(
                "temperature",
                self.temperature.unwrap_or(DEFAULT_REACTOR_TEMPERATURE),
            )?,
            ph: finite("ph", self.ph.unwrap_or(DEFAULT_REACTOR_PH))?,
            oxygen: finite("oxygen", self.oxygen.unwrap_or(DEFAULT_REACTOR_OXYGEN))?,
        })
    }
}

/// Everything a bioreactor run needs besides the optional bias inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct BioreactorSetup {
    pub initial_biomass: f64,
    pub window: TimeWindow,
    pub horizon: HorizonPolicy,
    pub params: ReactorBaseParams,
}

#[derive(Debug, Default, Clone)]
pub struct BioreactorSetupBuilder {
    initial_biomass: Option<f64>,
    window: Option<Vec<f64>>,
    horizon: Option<HorizonPolicy>,
    params: Option<ReactorBaseParams>,
}

impl BioreactorSetupBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_biomass(mut self, biomass: f64) -> Self {
        self.initial_biomass = Some(biomass);
        self
    }
    pub fn window(mut self, bounds: &[f64]) -> Self {
        self.window = Some(bounds.to_vec());
        self
    }
    pub fn horizon(mut self, horizon: HorizonPolicy) -> Self {
        self.horizon = Some(horizon);
        self
    }
    pub fn params(mut self, params: ReactorBaseParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn build(self) -> Result<BioreactorSetup, ConfigError> {
        let initial_biomass = self
            .initial_biomass
            .ok_or(ConfigError::MissingParameter("initial_biomass"))?;
        if !initial_biomass.is_finite() || initial_biomass < 0.0 {
            return Err(ConfigError::invalid(
                "initial_biomass",
                format!("must be a non-negative number, got {initial_biomass}"),
            ));
        }

        let bounds = self
            .window
            .ok_or(ConfigError::MissingParameter("time_window"))?;
        let window = match bounds.as_slice() {
            &[start, end] => TimeWindow::new(start, end).ok_or_else(|| {
                ConfigError::invalid(
                    "time_window",
                    format!("[{start}, {end}] is not strictly increasing"),
                )
            })?,
            other => {
                return Err(ConfigError::invalid(
                    "time_window",
                    format!("expected [start, end], got {} values", other.len()),
                ));
            }
        };

        Ok(BioreactorSetup {
            initial_biomass,
            window,
            horizon: self.horizon.unwrap_or_default(),
            params: self.params.ok_or(ConfigError::MissingParameter("params"))?,
        })
    }
}

fn as_record(value: &Value) -> Result<&Map<String, Value>, ConfigError> {
    value
        .as_object()
        .ok_or_else(|| ConfigError::NotARecord(json_kind(value)))
}

fn lookup<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| map.get(*k))
}

fn number(
    map: &Map<String, Value>,
    keys: &[&str],
    name: &'static str,
) -> Result<Option<f64>, ConfigError> {
    match lookup(map, keys) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| ConfigError::invalid(name, "number out of range")),
        Some(other) => Err(ConfigError::invalid(name, type_mismatch(other))),
    }
}

fn finite(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::invalid(name, "must be finite"))
    }
}

fn type_mismatch(value: &Value) -> String {
    format!("unexpected {}", json_kind(value))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod lab_params {
        use super::*;

        #[test]
        fn defaults_apply_to_an_empty_record() {
            let params = LabParamsBuilder::from_json(&json!({})).unwrap().build().unwrap();
            assert_eq!(params.duration, DEFAULT_LAB_DURATION);
            assert_eq!(params.temperature, 37.0);
            assert_eq!(params.ph, 7.4);
            assert_eq!(params.engine, EnginePreference::Auto);
        }

        #[test]
        fn wire_and_english_keys_are_both_recognized() {
            let a = LabParamsBuilder::from_json(&json!({"duracion": 4, "temperatura": 30}))
                .unwrap()
                .build()
                .unwrap();
            let b = LabParamsBuilder::from_json(&json!({"duration": 4, "temperature": 30}))
                .unwrap()
                .build()
                .unwrap();
            assert_eq!(a, b);
            assert_eq!(a.duration, 4.0);
        }

        #[test]
        fn non_positive_duration_is_rejected() {
            for d in [0.0, -5.0] {
                let err = LabParamsBuilder::new().duration(d).build().unwrap_err();
                assert!(matches!(err, ConfigError::InvalidValue { name: "duration", .. }));
            }
        }

        #[test]
        fn duration_above_the_ceiling_is_rejected() {
            for d in [MAX_LAB_DURATION + 0.5, 1e300] {
                let err = LabParamsBuilder::new().duration(d).build().unwrap_err();
                assert!(matches!(err, ConfigError::InvalidValue { name: "duration", .. }));
            }
            assert!(LabParamsBuilder::new().duration(MAX_LAB_DURATION).build().is_ok());
        }

        #[test]
        fn non_numeric_duration_is_rejected() {
            let err = LabParamsBuilder::from_json(&json!({"duracion": "diez"})).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { name: "duration", .. }));
        }

        #[test]
        fn non_object_input_is_not_a_record() {
            assert_eq!(
                LabParamsBuilder::from_json(&json!([1, 2])).unwrap_err(),
                ConfigError::NotARecord("array")
            );
        }

        #[test]
        fn engine_key_parses_preference() {
            let params = LabParamsBuilder::from_json(&json!({"engine": "closed-form"}))
                .unwrap()
                .build()
                .unwrap();
            assert_eq!(params.engine, EnginePreference::ClosedForm);
            assert!(LabParamsBuilder::from_json(&json!({"engine": "quantum"})).is_err());
        }
    }

    mod bioreactor_params {
        use super::*;

        #[test]
        fn missing_rate_constant_is_reported() {
            let err = BioreactorParamsBuilder::from_json(&json!({"otra_clave": 0.5}))
                .unwrap()
                .build()
                .unwrap_err();
            assert_eq!(err, ConfigError::MissingParameter("k"));
        }

        #[test]
        fn defaults_fill_optional_fields() {
            let params = BioreactorParamsBuilder::new()
                .rate_constant(0.1)
                .build()
                .unwrap();
            assert_eq!(params.temperature, 37.0);
            assert_eq!(params.ph, 7.2);
            assert_eq!(params.oxygen, 40.0);
        }

        #[test]
        fn non_positive_rate_constant_is_rejected() {
            assert!(BioreactorParamsBuilder::new().rate_constant(0.0).build().is_err());
            assert!(
                BioreactorParamsBuilder::new()
                    .rate_constant(f64::NAN)
                    .build()
                    .is_err()
            );
        }
    }

    mod setup {
        use super::*;

        fn params() -> ReactorBaseParams {
            BioreactorParamsBuilder::new().rate_constant(0.1).build().unwrap()
        }

        #[test]
        fn valid_setup_builds_with_nominal_horizon() {
            let setup = BioreactorSetupBuilder::new()
                .initial_biomass(1.0)
                .window(&[0.0, 48.0])
                .params(params())
                .build()
                .unwrap();
            assert_eq!(setup.horizon, HorizonPolicy::Nominal);
            assert_eq!(setup.window.span(), 48.0);
        }

        #[test]
        fn malformed_windows_are_rejected() {
            let cases: [&[f64]; 4] = [&[0.0], &[0.0, 1.0, 2.0], &[5.0, 5.0], &[10.0, 0.0]];
            for bounds in cases {
                let err = BioreactorSetupBuilder::new()
                    .initial_biomass(1.0)
                    .window(bounds)
                    .params(params())
                    .build()
                    .unwrap_err();
                assert!(matches!(err, ConfigError::InvalidValue { name: "time_window", .. }));
            }
        }

        #[test]
        fn negative_initial_biomass_is_rejected() {
            let err = BioreactorSetupBuilder::new()
                .initial_biomass(-1.0)
                .window(&[0.0, 48.0])
                .params(params())
                .build()
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { name: "initial_biomass", .. }));
        }
    }
}

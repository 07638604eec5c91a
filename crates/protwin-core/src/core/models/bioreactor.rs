use super::score::ModelId;
use super::status::RunStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A simulated time window `[start, end]` with `start < end`, serialized as a pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", try_from = "[f64; 2]")]
pub struct TimeWindow {
    start: f64,
    end: f64,
}

impl TimeWindow {
    /// Returns `None` unless both bounds are finite and strictly increasing.
    pub fn new(start: f64, end: f64) -> Option<Self> {
        (start.is_finite() && end.is_finite() && start < end).then_some(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }
}

impl TryFrom<[f64; 2]> for TimeWindow {
    type Error = String;

    fn try_from([start, end]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(start, end)
            .ok_or_else(|| format!("time window [{start}, {end}] must be strictly increasing"))
    }
}

impl From<TimeWindow> for [f64; 2] {
    fn from(w: TimeWindow) -> Self {
        [w.start, w.end]
    }
}

/// How the 25-sample series relates to the caller's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HorizonPolicy {
    /// Samples span the nominal 48-hour horizon regardless of the requested window.
    #[default]
    Nominal,
    /// Samples span the requested window; curves are evaluated on the window
    /// mapped onto the nominal horizon.
    RequestedWindow,
}

impl FromStr for HorizonPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nominal" => Ok(Self::Nominal),
            "requested-window" | "window" | "ventana" => Ok(Self::RequestedWindow),
            other => Err(format!(
                "Unknown horizon policy '{other}'. Expected 'nominal' or 'requested-window'."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactorBaseParams {
    #[serde(rename = "k")]
    pub rate_constant: f64,
    #[serde(rename = "temperatura")]
    pub temperature: f64,
    pub ph: f64,
    #[serde(rename = "oxigeno")]
    pub oxygen: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactorSample {
    pub time: f64,
    #[serde(rename = "biomasa")]
    pub biomass: f64,
    #[serde(rename = "producto")]
    pub product: f64,
    #[serde(rename = "viabilidad")]
    pub viability: f64,
    #[serde(rename = "oxigeno")]
    pub oxygen: f64,
    pub ph: f64,
    #[serde(rename = "temperatura")]
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialConditions {
    #[serde(rename = "biomasa_inicial")]
    pub initial_biomass: f64,
    #[serde(rename = "temperatura")]
    pub temperature: f64,
    pub ph: f64,
    #[serde(rename = "oxigeno_inicial")]
    pub initial_oxygen: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactorMetrics {
    #[serde(rename = "biomasa_maxima")]
    pub max_biomass: f64,
    #[serde(rename = "produccion_total")]
    pub final_product: f64,
    #[serde(rename = "viabilidad_final")]
    pub final_viability: f64,
    #[serde(rename = "eficiencia_proceso")]
    pub efficiency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alert {
    Viability { optimal: bool },
    Production { high: bool },
    Ph { stable: bool },
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Viability { optimal } => {
                write!(f, "Viabilidad: {}", if optimal { "Óptima" } else { "Revisar" })
            }
            Self::Production { high } => {
                write!(f, "Producción: {}", if high { "Alta" } else { "Baja" })
            }
            Self::Ph { stable } => {
                write!(f, "pH: {}", if stable { "Estable" } else { "Desviado" })
            }
        }
    }
}

impl Serialize for Alert {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Alert {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let (category, level) = text
            .split_once(':')
            .map(|(c, l)| (c.trim(), l.trim()))
            .ok_or_else(|| serde::de::Error::custom(format!("malformed alert '{text}'")))?;
        match (category, level) {
            ("Viabilidad", "Óptima") => Ok(Self::Viability { optimal: true }),
            ("Viabilidad", "Revisar") => Ok(Self::Viability { optimal: false }),
            ("Producción", "Alta") => Ok(Self::Production { high: true }),
            ("Producción", "Baja") => Ok(Self::Production { high: false }),
            ("pH", "Estable") => Ok(Self::Ph { stable: true }),
            ("pH", "Desviado") => Ok(Self::Ph { stable: false }),
            _ => Err(serde::de::Error::custom(format!("unknown alert '{text}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedParameters {
    pub k_original: f64,
    pub k_ajustado: f64,
    #[serde(rename = "factor_mejora")]
    pub improvement_factor: f64,
}

/// Echo of the score that biased a bioreactor run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlmIntegration {
    #[serde(rename = "modelo_usado")]
    pub model: ModelId,
    #[serde(rename = "confianza")]
    pub confidence: f64,
    #[serde(rename = "eficiencia_derivada")]
    pub derived_efficiency: f64,
    #[serde(rename = "parametros_ajustados")]
    pub adjusted: AdjustedParameters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactorModel {
    #[serde(rename = "biorreactor_dinamico")]
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BioreactorRun {
    #[serde(rename = "modelo")]
    pub model: ReactorModel,
    #[serde(rename = "estado")]
    pub status: RunStatus,
    #[serde(rename = "ventana_temporal")]
    pub time_window: TimeWindow,
    #[serde(rename = "horizonte")]
    pub horizon: HorizonPolicy,
    #[serde(rename = "condiciones_iniciales")]
    pub initial_conditions: InitialConditions,
    #[serde(rename = "parametros")]
    pub base_params: ReactorBaseParams,
    #[serde(rename = "k_ajustado")]
    pub adjusted_rate_constant: f64,
    #[serde(rename = "secuencia_objetivo", default, skip_serializing_if = "Option::is_none")]
    pub sequence_preview: Option<String>,
    #[serde(rename = "datos_temporales")]
    pub time_series: Vec<ReactorSample>,
    #[serde(rename = "metricas_finales")]
    pub final_metrics: ReactorMetrics,
    #[serde(rename = "alertas")]
    pub alerts: Vec<Alert>,
    #[serde(rename = "integracion_plm", default, skip_serializing_if = "Option::is_none")]
    pub plm_integration: Option<PlmIntegration>,
    #[serde(rename = "interpretacion_plm", default, skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
}

impl BioreactorRun {
    pub fn final_sample(&self) -> Option<&ReactorSample> {
        self.time_series.last()
    }
}

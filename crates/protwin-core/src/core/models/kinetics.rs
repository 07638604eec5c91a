use super::score::ModelId;
use super::status::RunStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineKind {
    #[serde(rename = "eventos_discretos")]
    EventStepped,
    #[serde(rename = "forma_cerrada")]
    ClosedForm,
}

impl EngineKind {
    pub fn description(self) -> &'static str {
        match self {
            Self::EventStepped => "Michaelis-Menten kinetics, fixed 0.1 step with first-order enzyme decay",
            Self::ClosedForm => "Logistic activity/product and exponential stability curves",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KineticSample {
    #[serde(rename = "tiempo")]
    pub time: f64,
    #[serde(rename = "actividad")]
    pub activity: f64,
    #[serde(rename = "estabilidad")]
    pub stability: f64,
    #[serde(rename = "producto")]
    pub product: f64,
    #[serde(rename = "sustrato", default, skip_serializing_if = "Option::is_none")]
    pub substrate: Option<f64>,
    #[serde(rename = "enzima_activa", default, skip_serializing_if = "Option::is_none")]
    pub active_enzyme: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KineticMetrics {
    #[serde(rename = "actividad_maxima")]
    pub max_activity: f64,
    #[serde(rename = "estabilidad_final")]
    pub final_stability: f64,
    #[serde(rename = "rendimiento_producto")]
    pub final_product: f64,
    #[serde(rename = "eficiencia_catalitica")]
    pub efficiency: f64,
    #[serde(rename = "sustrato_consumido", default, skip_serializing_if = "Option::is_none")]
    pub substrate_consumed: Option<f64>,
}

/// Rate constants driving the event-stepped engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KineticConstants {
    #[serde(rename = "kcat_derivado")]
    pub kcat: f64,
    #[serde(rename = "km_derivado")]
    pub km: f64,
    #[serde(rename = "tasa_degradacion")]
    pub decay_rate: f64,
}

/// Which score informed a run and the constants derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedKinetics {
    #[serde(rename = "modelo_plm")]
    pub model: ModelId,
    #[serde(rename = "confianza_plm")]
    pub confidence: f64,
    #[serde(flatten)]
    pub constants: KineticConstants,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentalConditions {
    #[serde(rename = "temperatura")]
    pub temperature: f64,
    pub ph: f64,
    #[serde(rename = "concentracion_sustrato")]
    pub substrate_concentration: f64,
    #[serde(
        rename = "concentracion_enzima_inicial",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub initial_enzyme: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KineticRun {
    #[serde(rename = "estado")]
    pub status: RunStatus,
    #[serde(rename = "duracion_simulacion")]
    pub duration: f64,
    #[serde(rename = "motor_simulacion")]
    pub engine: EngineKind,
    #[serde(rename = "parametros_plm", default, skip_serializing_if = "Option::is_none")]
    pub derived_kinetics: Option<DerivedKinetics>,
    #[serde(rename = "secuencia_analizada", default, skip_serializing_if = "Option::is_none")]
    pub sequence_preview: Option<String>,
    #[serde(rename = "datos_temporales")]
    pub time_series: Vec<KineticSample>,
    #[serde(rename = "eventos_sistema", default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,
    #[serde(rename = "metricas_finales")]
    pub final_metrics: KineticMetrics,
    #[serde(rename = "condiciones_experimentales")]
    pub conditions: ExperimentalConditions,
}

impl KineticRun {
    pub fn final_sample(&self) -> Option<&KineticSample> {
        self.time_series.last()
    }
}

use crate::core::models::bioreactor::{AdjustedParameters, PlmIntegration};
use crate::core::models::score::{ModelId, ScoreAttributes, SequenceScore};
use crate::engine::bias::Bias;
use crate::engine::noise::round_to;

pub const DEFAULT_VIABILITY: f64 = 95.0;

/// Reference point for the pH-distance factor of biophysical scores.
const OPTIMAL_PH: f64 = 7.2;
const REFERENCE_MOLECULAR_WEIGHT: f64 = 40_000.0;
const MAX_WEIGHT_FACTOR: f64 = 1.8;
/// Functional-domain count at which a fold score leaves the rate unscaled.
const REFERENCE_DOMAINS: f64 = 2.0;
const DOMAIN_WEIGHT: f64 = 0.05;
const MAX_COUNTED_DOMAINS: u32 = 10;

/// Reactor parameters after applying the bias.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustment {
    pub rate_constant: f64,
    pub viability_base: f64,
    pub efficiency: f64,
}

impl Adjustment {
    fn unadjusted(k: f64) -> Self {
        Self {
            rate_constant: k,
            viability_base: DEFAULT_VIABILITY,
            efficiency: 1.0,
        }
    }
}

pub fn adjust(k: f64, bias: Bias<'_>) -> Adjustment {
    match bias {
        Bias::Score(score) => from_score(k, score),
        Bias::Sequence(sequence) => {
            let composition = sequence.composition();
            Adjustment {
                rate_constant: k * (1.0 + 0.3 * composition.aromatic),
                viability_base: 98.0 - 10.0 * composition.basic,
                efficiency: 1.0,
            }
        }
        Bias::None => Adjustment::unadjusted(k),
    }
}

fn from_score(k: f64, score: &SequenceScore) -> Adjustment {
    let c = score.confidence;
    match &score.attributes {
        ScoreAttributes::Structural(s) => {
            let ss = &s.secondary_structure;
            let f = 1.5 * (ss.alpha_helix.fraction() + ss.beta_sheet.fraction());
            Adjustment {
                rate_constant: k * (0.7 + f * c),
                viability_base: 90.0 + 8.0 * f * c,
                efficiency: 0.8 + 0.4 * f,
            }
        }
        ScoreAttributes::Similarity(s) => match s.functional_similarity.peak_similarity() {
            Some(peak) => Adjustment {
                rate_constant: k * (0.6 + 0.8 * peak * c),
                viability_base: 85.0 + 12.0 * peak * c,
                efficiency: 0.7 + 0.5 * peak,
            },
            None => Adjustment::unadjusted(k),
        },
        ScoreAttributes::Biophysical(b) => {
            let w = (b.properties.molecular_weight / REFERENCE_MOLECULAR_WEIGHT).min(MAX_WEIGHT_FACTOR);
            let p = 1.0 - 0.03 * (b.properties.isoelectric_point - OPTIMAL_PH).abs();
            Adjustment {
                rate_constant: k * w * p * c,
                viability_base: 88.0 + 10.0 * w * p * c,
                efficiency: 0.9 * w * p,
            }
        }
        ScoreAttributes::Fold3d(f) => {
            let q = f.structure.fold_confidence.fraction();
            let domains = f64::from(f.structure.functional_domains.min(MAX_COUNTED_DOMAINS));
            let domain_factor = 1.0 + DOMAIN_WEIGHT * (domains - REFERENCE_DOMAINS);
            Adjustment {
                rate_constant: k * (0.5 + 0.8 * q * c) * domain_factor,
                viability_base: 82.0 + 15.0 * q * c,
                efficiency: 0.6 + 0.6 * q,
            }
        }
    }
}

/// The `integracion_plm` block; sequence-only and unbiased runs have none.
pub fn plm_integration(k: f64, adjustment: &Adjustment, bias: Bias<'_>) -> Option<PlmIntegration> {
    let score = bias.score()?;
    Some(PlmIntegration {
        model: score.model,
        confidence: score.confidence,
        derived_efficiency: round_to(adjustment.efficiency, 3),
        adjusted: AdjustedParameters {
            k_original: round_to(k, 4),
            k_ajustado: round_to(adjustment.rate_constant, 4),
            improvement_factor: round_to(adjustment.rate_constant / k, 2),
        },
    })
}

pub fn interpretation(model: ModelId) -> &'static str {
    match model {
        ModelId::Esm2 => "Estructura secundaria optimizada para estabilidad en biorreactor",
        ModelId::ProtBert => "Similitud funcional asegura actividad biológica sostenida",
        ModelId::ProtTrans => "Propiedades biofísicas adaptadas a condiciones de cultivo",
        ModelId::AlphaFold => "Estructura 3D predice comportamiento en ambiente controlado",
    }
}

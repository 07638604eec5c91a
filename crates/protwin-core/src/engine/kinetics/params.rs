use crate::core::models::kinetics::{DerivedKinetics, KineticConstants};
use crate::core::models::score::{ModelId, ScoreAttributes, SequenceScore};
use crate::engine::bias::Bias;
use crate::engine::noise::round_to;

pub const DEFAULT_CONSTANTS: KineticConstants = KineticConstants {
    kcat: 50.0,
    km: 0.5,
    decay_rate: 0.01,
};

/// Molecular weight and net charge assumed when a biophysical score lacks them.
const FALLBACK_MOLECULAR_WEIGHT: f64 = 50_000.0;
const FALLBACK_NET_CHARGE: f64 = 0.0;

/// Scale factors for the closed-form curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveFactors {
    /// Multiplies the activity and product plateaus.
    pub activity: f64,
    /// Initial stability as a fraction of 100 %.
    pub stability_base: f64,
}

impl Default for CurveFactors {
    fn default() -> Self {
        Self {
            activity: 1.0,
            stability_base: 0.85,
        }
    }
}

pub fn constants_for(bias: Bias<'_>) -> KineticConstants {
    match bias {
        Bias::Score(score) => constants_from_score(score),
        Bias::Sequence(sequence) => {
            let hydrophobic = sequence.composition().hydrophobic;
            KineticConstants {
                kcat: DEFAULT_CONSTANTS.kcat * (0.8 + 0.4 * hydrophobic),
                ..DEFAULT_CONSTANTS
            }
        }
        Bias::None => DEFAULT_CONSTANTS,
    }
}

fn constants_from_score(score: &SequenceScore) -> KineticConstants {
    let c = score.confidence;
    match score.model {
        ModelId::Esm2 => KineticConstants {
            kcat: 100.0 * c,
            km: 0.5 / c,
            decay_rate: 0.01 * (2.0 - c),
        },
        ModelId::ProtTrans => {
            let (weight, charge) = match &score.attributes {
                ScoreAttributes::Biophysical(b) => {
                    (b.properties.molecular_weight, b.properties.net_charge)
                }
                _ => (FALLBACK_MOLECULAR_WEIGHT, FALLBACK_NET_CHARGE),
            };
            KineticConstants {
                kcat: 80.0 + weight / 1000.0,
                km: 0.1 * charge.abs() + 0.3,
                decay_rate: 0.005,
            }
        }
        ModelId::ProtBert | ModelId::AlphaFold => KineticConstants {
            kcat: 75.0 * c,
            km: 0.4,
            decay_rate: 0.008,
        },
    }
}

/// The `parametros_plm` block; only score-biased runs carry one.
pub fn derived_kinetics(bias: Bias<'_>, constants: KineticConstants) -> Option<DerivedKinetics> {
    bias.score().map(|score| DerivedKinetics {
        model: score.model,
        confidence: score.confidence,
        constants: KineticConstants {
            kcat: round_to(constants.kcat, 2),
            km: round_to(constants.km, 3),
            decay_rate: round_to(constants.decay_rate, 4),
        },
    })
}

pub fn curve_factors_for(bias: Bias<'_>) -> CurveFactors {
    let defaults = CurveFactors::default();
    match bias {
        Bias::Score(score) => {
            let activity = match &score.attributes {
                ScoreAttributes::Structural(s) => {
                    0.7 + 0.6 * s.secondary_structure.alpha_helix.fraction()
                }
                ScoreAttributes::Biophysical(b) => 0.8 + 0.1 * b.properties.hydrophobicity.max(0.0),
                ScoreAttributes::Fold3d(f) => 0.6 + 0.5 * f.structure.fold_confidence.fraction(),
                ScoreAttributes::Similarity(_) => defaults.activity,
            };
            CurveFactors {
                activity,
                ..defaults
            }
        }
        Bias::Sequence(sequence) => {
            let composition = sequence.composition();
            CurveFactors {
                activity: 0.8 + 0.4 * composition.hydrophobic,
                stability_base: 0.7 + 0.3 * composition.polar,
            }
        }
        Bias::None => defaults,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::sequence::ProteinSequence;
    use crate::engine::scoring;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scored(model: ModelId) -> SequenceScore {
        let mut rng = StdRng::seed_from_u64(21);
        scoring::score(&ProteinSequence::parse("MKTIIALSYIFCLVFADYKD").unwrap(), model, &mut rng)
    }

    #[test]
    fn no_bias_uses_defaults() {
        assert_eq!(constants_for(Bias::None), DEFAULT_CONSTANTS);
        assert_eq!(curve_factors_for(Bias::None), CurveFactors::default());
        assert!(derived_kinetics(Bias::None, DEFAULT_CONSTANTS).is_none());
    }

    #[test]
    fn esm2_scales_with_confidence() {
        let score = scored(ModelId::Esm2);
        let k = constants_for(Bias::Score(&score));
        let c = score.confidence;
        assert!((k.kcat - 100.0 * c).abs() < 1e-9);
        assert!((k.km - 0.5 / c).abs() < 1e-9);
        assert!((k.decay_rate - 0.01 * (2.0 - c)).abs() < 1e-9);
    }

    #[test]
    fn prottrans_uses_molecular_weight_and_charge() {
        let score = scored(ModelId::ProtTrans);
        let k = constants_for(Bias::Score(&score));
        let ScoreAttributes::Biophysical(b) = &score.attributes else {
            panic!("ProtTrans produces biophysical attributes");
        };
        assert!((k.kcat - (80.0 + b.properties.molecular_weight / 1000.0)).abs() < 1e-9);
        assert_eq!(k.decay_rate, 0.005);
    }

    #[test]
    fn hydrophobic_sequences_raise_the_rate() {
        let oily = ProteinSequence::parse("LLLLLLLL").unwrap();
        let polar = ProteinSequence::parse("SSSSSSSS").unwrap();
        assert!(constants_for(Bias::Sequence(&oily)).kcat > constants_for(Bias::Sequence(&polar)).kcat);
        let f = curve_factors_for(Bias::Sequence(&polar));
        assert!((f.stability_base - 1.0).abs() < 1e-9);
    }

    #[test]
    fn derived_kinetics_echoes_the_score() {
        let score = scored(ModelId::AlphaFold);
        let bias = Bias::Score(&score);
        let derived = derived_kinetics(bias, constants_for(bias)).unwrap();
        assert_eq!(derived.model, ModelId::AlphaFold);
        assert_eq!(derived.constants.km, 0.4);
    }
}

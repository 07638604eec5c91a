use super::noise::{jitter, pick, round_to};
use crate::core::models::score::{
    BiophysicalAttributes, BiophysicalProperties, Fold3d, FoldAttributes, FunctionalSimilarity,
    KnownProtein, ModelFamily, ModelId, ScoreAttributes, SecondaryStructure, SequenceScore,
    SequenceSimilarity, SimilarityAttributes, StructuralAttributes,
};
use crate::core::models::sequence::{AminoAcid, ProteinSequence};
use crate::core::models::status::{Celsius, Percent};
use rand::Rng;
use rand::seq::SliceRandom;

pub const CONFIDENCE_JITTER: f64 = 0.05;
pub const AVERAGE_RESIDUE_MASS: f64 = 110.5;

const DNA_BINDING_WINDOW: usize = 10;
const KINASE_MIN_LENGTH: usize = 200;

const REFERENCE_PROTEINS: &[&str] = &[
    "Lisozima C",
    "Proteína quinasa A",
    "Tripsina",
    "Citocromo c",
    "Mioglobina",
    "Anhidrasa carbónica II",
];

/// One attribute generator per model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringStrategy {
    Structural,
    Similarity,
    Biophysical,
    Fold,
}

impl ScoringStrategy {
    pub fn for_model(model: ModelId) -> Self {
        match model.family() {
            ModelFamily::Structural => Self::Structural,
            ModelFamily::Similarity => Self::Similarity,
            ModelFamily::Biophysical => Self::Biophysical,
            ModelFamily::Fold3d => Self::Fold,
        }
    }

    pub fn attributes(self, sequence: &ProteinSequence, rng: &mut impl Rng) -> ScoreAttributes {
        match self {
            Self::Structural => ScoreAttributes::Structural(structural(sequence, rng)),
            Self::Similarity => ScoreAttributes::Similarity(similarity(sequence, rng)),
            Self::Biophysical => ScoreAttributes::Biophysical(biophysical(sequence, rng)),
            Self::Fold => ScoreAttributes::Fold3d(fold(rng)),
        }
    }
}

pub fn score(sequence: &ProteinSequence, model: ModelId, rng: &mut impl Rng) -> SequenceScore {
    let profile = model.profile();
    let confidence = round_to(
        (profile.base_confidence + jitter(rng, CONFIDENCE_JITTER)).clamp(0.0, 1.0),
        3,
    );
    let attributes = ScoringStrategy::for_model(model).attributes(sequence, rng);

    SequenceScore {
        model,
        confidence,
        attributes,
        specialty: profile.specialty.to_string(),
        sequence: sequence.clone(),
        length: sequence.len(),
        estimated_time: profile.estimated_time.to_string(),
    }
}

fn structural(sequence: &ProteinSequence, rng: &mut impl Rng) -> StructuralAttributes {
    let predicted_function = if sequence.prefix_contains(AminoAcid::Lysine, DNA_BINDING_WINDOW) {
        "Proteína de unión a DNA"
    } else {
        "Enzima metabólica"
    };

    StructuralAttributes {
        secondary_structure: SecondaryStructure {
            alpha_helix: Percent(pick(rng, 20, 40)),
            beta_sheet: Percent(pick(rng, 15, 35)),
            loops: Percent(pick(rng, 25, 45)),
        },
        predicted_function: predicted_function.to_string(),
        detected_domains: pick(rng, 1, 3),
    }
}

fn similarity(sequence: &ProteinSequence, rng: &mut impl Rng) -> SimilarityAttributes {
    let family = if sequence.len() > KINASE_MIN_LENGTH {
        "Kinase family"
    } else {
        "Small protein family"
    };
    let homologs_found = pick(rng, 5, 50);
    let conservation = Percent(pick(rng, 60, 90));
    let functional_motifs = pick(rng, 2, 8);

    let count = pick(rng, 1, 3) as usize;
    let known_proteins = REFERENCE_PROTEINS
        .choose_multiple(rng, count)
        .copied()
        .collect::<Vec<_>>()
        .into_iter()
        .map(|name| KnownProtein {
            name: name.to_string(),
            similarity: round_to(rng.gen_range(0.60..=0.95), 2),
        })
        .collect();

    SimilarityAttributes {
        sequence_similarity: SequenceSimilarity {
            protein_family: family.to_string(),
            homologs_found,
            conservation,
        },
        functional_motifs,
        functional_similarity: FunctionalSimilarity { known_proteins },
    }
}

fn biophysical(sequence: &ProteinSequence, rng: &mut impl Rng) -> BiophysicalAttributes {
    BiophysicalAttributes {
        properties: BiophysicalProperties {
            hydrophobicity: round_to(rng.gen_range(-2.0..=2.0), 2),
            net_charge: round_to(rng.gen_range(-10.0..=10.0), 1),
            molecular_weight: round_to(sequence.len() as f64 * AVERAGE_RESIDUE_MASS, 1),
            isoelectric_point: round_to(rng.gen_range(4.0..=11.0), 2),
        },
        thermal_stability: Celsius(pick(rng, 45, 85)),
    }
}

fn fold(rng: &mut impl Rng) -> FoldAttributes {
    FoldAttributes {
        structure: Fold3d {
            fold_confidence: Percent(pick(rng, 70, 95)),
            disordered_regions: Percent(pick(rng, 5, 25)),
            predicted_contacts: pick(rng, 50, 200),
            functional_domains: pick(rng, 1, 4),
        },
        active_cavities: pick(rng, 0, 3),
        accessible_surface: Percent(pick(rng, 30, 70)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seq(raw: &str) -> ProteinSequence {
        ProteinSequence::parse(raw).unwrap()
    }

    #[test]
    fn confidence_stays_near_the_model_base() {
        let mut rng = StdRng::seed_from_u64(3);
        let s = seq("MKTIIALSYIFCLVFADYKD");
        for model in ModelId::ALL {
            for _ in 0..50 {
                let sc = score(&s, model, &mut rng);
                let base = model.profile().base_confidence;
                assert!((0.0..=1.0).contains(&sc.confidence));
                assert!((sc.confidence - base).abs() <= CONFIDENCE_JITTER + 1e-3);
            }
        }
    }

    #[test]
    fn attribute_family_follows_the_model() {
        let mut rng = StdRng::seed_from_u64(5);
        let s = seq("MKT");
        for model in ModelId::ALL {
            assert_eq!(score(&s, model, &mut rng).family(), model.family());
        }
    }

    #[test]
    fn lysine_near_the_start_predicts_dna_binding() {
        let mut rng = StdRng::seed_from_u64(1);
        let with_k = structural(&seq("MKTAAA"), &mut rng);
        let without_k = structural(&seq("MATAAAAAAAAK"), &mut rng);
        assert_eq!(with_k.predicted_function, "Proteína de unión a DNA");
        assert_eq!(without_k.predicted_function, "Enzima metabólica");
    }

    #[test]
    fn long_sequences_fall_in_the_kinase_family() {
        let mut rng = StdRng::seed_from_u64(2);
        let long = seq(&"A".repeat(201));
        let short = seq(&"A".repeat(200));
        assert_eq!(
            similarity(&long, &mut rng).sequence_similarity.protein_family,
            "Kinase family"
        );
        assert_eq!(
            similarity(&short, &mut rng).sequence_similarity.protein_family,
            "Small protein family"
        );
    }

    #[test]
    fn known_proteins_are_bounded() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..100 {
            let attrs = similarity(&seq("MKT"), &mut rng);
            let known = &attrs.functional_similarity.known_proteins;
            assert!((1..=3).contains(&known.len()));
            assert!(known.iter().all(|p| (0.60..=0.95).contains(&p.similarity)));
        }
    }

    #[test]
    fn molecular_weight_scales_with_length() {
        let mut rng = StdRng::seed_from_u64(4);
        let attrs = biophysical(&seq(&"G".repeat(100)), &mut rng);
        assert_eq!(attrs.properties.molecular_weight, 11_050.0);
    }

    #[test]
    fn fold_attributes_respect_their_ranges() {
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..100 {
            let f = fold(&mut rng);
            assert!((70..=95).contains(&f.structure.fold_confidence.0));
            assert!((50..=200).contains(&f.structure.predicted_contacts));
            assert!(f.active_cavities <= 3);
        }
    }
}

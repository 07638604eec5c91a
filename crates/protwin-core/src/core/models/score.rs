use super::sequence::ProteinSequence;
use super::status::{Celsius, Percent};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The protein language models a sequence can be scored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelId {
    #[default]
    #[serde(rename = "ESM-2")]
    Esm2,
    #[serde(rename = "ProtBERT")]
    ProtBert,
    #[serde(rename = "ProtTrans")]
    ProtTrans,
    #[serde(rename = "AlphaFold")]
    AlphaFold,
}

/// The attribute schema a model produces; one family per model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    Structural,
    Similarity,
    Biophysical,
    Fold3d,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelProfile {
    pub base_confidence: f64,
    pub specialty: &'static str,
    pub estimated_time: &'static str,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unknown scoring model '{0}'. Expected one of: esm2, protbert, prottrans, alphafold.")]
pub struct UnknownModel(pub String);

impl ModelId {
    pub const ALL: [ModelId; 4] = [
        ModelId::Esm2,
        ModelId::ProtBert,
        ModelId::ProtTrans,
        ModelId::AlphaFold,
    ];

    /// Parses a model selector, falling back to [`ModelId::Esm2`] when unrecognized.
    pub fn resolve(selector: &str) -> Self {
        selector.parse().unwrap_or_else(|e: UnknownModel| {
            tracing::warn!("{} Falling back to {}.", e, ModelId::default());
            ModelId::default()
        })
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Esm2 => "ESM-2",
            Self::ProtBert => "ProtBERT",
            Self::ProtTrans => "ProtTrans",
            Self::AlphaFold => "AlphaFold",
        }
    }

    pub fn family(self) -> ModelFamily {
        match self {
            Self::Esm2 => ModelFamily::Structural,
            Self::ProtBert => ModelFamily::Similarity,
            Self::ProtTrans => ModelFamily::Biophysical,
            Self::AlphaFold => ModelFamily::Fold3d,
        }
    }

    pub fn profile(self) -> ModelProfile {
        match self {
            Self::Esm2 => ModelProfile {
                base_confidence: 0.95,
                specialty: "estructura y función general",
                estimated_time: "2-3 min",
            },
            Self::ProtBert => ModelProfile {
                base_confidence: 0.92,
                specialty: "análisis de secuencia y similitud",
                estimated_time: "1-2 min",
            },
            Self::ProtTrans => ModelProfile {
                base_confidence: 0.90,
                specialty: "predicción de propiedades biofísicas",
                estimated_time: "3-4 min",
            },
            Self::AlphaFold => ModelProfile {
                base_confidence: 0.94,
                specialty: "plegamiento 3D y estructura",
                estimated_time: "5-8 min",
            },
        }
    }
}

impl FromStr for ModelId {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "esm2" | "esm-2" | "a" => Ok(Self::Esm2),
            "protbert" | "b" => Ok(Self::ProtBert),
            "prottrans" | "c" => Ok(Self::ProtTrans),
            "alphafold" | "d" => Ok(Self::AlphaFold),
            _ => Err(UnknownModel(s.to_string())),
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryStructure {
    #[serde(rename = "helices_alfa")]
    pub alpha_helix: Percent,
    #[serde(rename = "hojas_beta")]
    pub beta_sheet: Percent,
    #[serde(rename = "bucles")]
    pub loops: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralAttributes {
    #[serde(rename = "estructura_secundaria")]
    pub secondary_structure: SecondaryStructure,
    #[serde(rename = "funcion_predicha")]
    pub predicted_function: String,
    #[serde(rename = "dominios_detectados")]
    pub detected_domains: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceSimilarity {
    #[serde(rename = "familia_proteica")]
    pub protein_family: String,
    #[serde(rename = "homologos_encontrados")]
    pub homologs_found: u32,
    #[serde(rename = "conservacion")]
    pub conservation: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownProtein {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "similitud")]
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionalSimilarity {
    #[serde(rename = "proteinas_conocidas")]
    pub known_proteins: Vec<KnownProtein>,
}

impl FunctionalSimilarity {
    pub fn peak_similarity(&self) -> Option<f64> {
        self.known_proteins
            .iter()
            .map(|p| p.similarity)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityAttributes {
    #[serde(rename = "similitud_secuencias")]
    pub sequence_similarity: SequenceSimilarity,
    #[serde(rename = "motivos_funcionales")]
    pub functional_motifs: u32,
    #[serde(rename = "similitud_funcional")]
    pub functional_similarity: FunctionalSimilarity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiophysicalProperties {
    #[serde(rename = "hidrofobicidad")]
    pub hydrophobicity: f64,
    #[serde(rename = "carga_neta")]
    pub net_charge: f64,
    /// Daltons.
    #[serde(rename = "peso_molecular")]
    pub molecular_weight: f64,
    #[serde(rename = "punto_isoelectrico")]
    pub isoelectric_point: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiophysicalAttributes {
    #[serde(rename = "propiedades_biofisicas")]
    pub properties: BiophysicalProperties,
    #[serde(rename = "estabilidad_termica")]
    pub thermal_stability: Celsius,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fold3d {
    #[serde(rename = "confianza_plegamiento")]
    pub fold_confidence: Percent,
    #[serde(rename = "regiones_desordenadas")]
    pub disordered_regions: Percent,
    #[serde(rename = "contactos_predichos")]
    pub predicted_contacts: u32,
    #[serde(rename = "dominios_funcionales")]
    pub functional_domains: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldAttributes {
    #[serde(rename = "estructura_3d")]
    pub structure: Fold3d,
    #[serde(rename = "cavidades_activas")]
    pub active_cavities: u32,
    #[serde(rename = "superficie_accesible")]
    pub accessible_surface: Percent,
}

/// The model-specific part of a score. Variant and [`ModelId::family`] always agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreAttributes {
    Structural(StructuralAttributes),
    Similarity(SimilarityAttributes),
    Biophysical(BiophysicalAttributes),
    Fold3d(FoldAttributes),
}

impl ScoreAttributes {
    pub fn family(&self) -> ModelFamily {
        match self {
            Self::Structural(_) => ModelFamily::Structural,
            Self::Similarity(_) => ModelFamily::Similarity,
            Self::Biophysical(_) => ModelFamily::Biophysical,
            Self::Fold3d(_) => ModelFamily::Fold3d,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceScore {
    #[serde(rename = "modelo_usado")]
    pub model: ModelId,
    #[serde(rename = "confianza")]
    pub confidence: f64,
    #[serde(flatten)]
    pub attributes: ScoreAttributes,
    #[serde(rename = "especialidad")]
    pub specialty: String,
    #[serde(rename = "secuencia")]
    pub sequence: ProteinSequence,
    #[serde(rename = "longitud")]
    pub length: usize,
    #[serde(rename = "tiempo_estimado")]
    pub estimated_time: String,
}

impl SequenceScore {
    pub fn family(&self) -> ModelFamily {
        self.attributes.family()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structural_score() -> SequenceScore {
        SequenceScore {
            model: ModelId::Esm2,
            confidence: 0.951,
            attributes: ScoreAttributes::Structural(StructuralAttributes {
                secondary_structure: SecondaryStructure {
                    alpha_helix: Percent(30),
                    beta_sheet: Percent(25),
                    loops: Percent(40),
                },
                predicted_function: "Enzima metabólica".to_string(),
                detected_domains: 2,
            }),
            specialty: ModelId::Esm2.profile().specialty.to_string(),
            sequence: ProteinSequence::parse("MKT").unwrap(),
            length: 3,
            estimated_time: ModelId::Esm2.profile().estimated_time.to_string(),
        }
    }

    #[test]
    fn model_selectors_parse_case_insensitively() {
        assert_eq!("ESM2".parse::<ModelId>().unwrap(), ModelId::Esm2);
        assert_eq!("esm-2".parse::<ModelId>().unwrap(), ModelId::Esm2);
        assert_eq!("ProtBert".parse::<ModelId>().unwrap(), ModelId::ProtBert);
        assert_eq!("c".parse::<ModelId>().unwrap(), ModelId::ProtTrans);
        assert_eq!(" alphafold ".parse::<ModelId>().unwrap(), ModelId::AlphaFold);
        assert!("gpt".parse::<ModelId>().is_err());
    }

    #[test]
    fn resolve_falls_back_to_esm2() {
        assert_eq!(ModelId::resolve("unknown-model"), ModelId::Esm2);
        assert_eq!(ModelId::resolve("prottrans"), ModelId::ProtTrans);
    }

    #[test]
    fn every_model_maps_to_a_distinct_family() {
        let families: std::collections::HashSet<_> =
            ModelId::ALL.iter().map(|m| m.family()).collect();
        assert_eq!(families.len(), 4);
    }

    #[test]
    fn score_serializes_with_flattened_attributes() {
        let value = serde_json::to_value(structural_score()).unwrap();
        assert_eq!(value["modelo_usado"], "ESM-2");
        assert_eq!(value["estructura_secundaria"]["helices_alfa"], "30%");
        assert_eq!(value["secuencia"], "MKT");
        assert!(value.get("attributes").is_none());
    }

    #[test]
    fn score_deserializes_back_into_the_right_variant() {
        let score = structural_score();
        let json = serde_json::to_string(&score).unwrap();
        let back: SequenceScore = serde_json::from_str(&json).unwrap();
        assert_eq!(back.family(), ModelFamily::Structural);
        assert_eq!(back, score);
    }

    #[test]
    fn peak_similarity_picks_the_highest_entry() {
        let fs = FunctionalSimilarity {
            known_proteins: vec![
                KnownProtein {
                    name: "a".into(),
                    similarity: 0.61,
                },
                KnownProtein {
                    name: "b".into(),
                    similarity: 0.87,
                },
            ],
        };
        assert_eq!(fs.peak_similarity(), Some(0.87));
        assert_eq!(
            FunctionalSimilarity {
                known_proteins: vec![]
            }
            .peak_similarity(),
            None
        );
    }
}

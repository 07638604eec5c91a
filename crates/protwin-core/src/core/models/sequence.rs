use crate::core::utils::residue_classes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const PREVIEW_LENGTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcid {
    // --- Aliphatic, Nonpolar ---
    Alanine,
    Glycine,
    Isoleucine,
    Leucine,
    Proline,
    Valine,

    // --- Aromatic ---
    Phenylalanine,
    Tryptophan,
    Tyrosine,

    // --- Polar, Uncharged ---
    Asparagine,
    Cysteine,
    Glutamine,
    Serine,
    Threonine,
    Methionine,

    // --- Positively Charged (Basic) ---
    Arginine,
    Histidine,
    Lysine,

    // --- Negatively Charged (Acidic) ---
    AsparticAcid,
    GlutamicAcid,

    // --- Translation stop ---
    Stop,
}

impl AminoAcid {
    pub fn from_code(code: char) -> Option<Self> {
        let residue = match code {
            'A' => Self::Alanine,
            'G' => Self::Glycine,
            'I' => Self::Isoleucine,
            'L' => Self::Leucine,
            'P' => Self::Proline,
            'V' => Self::Valine,
            'F' => Self::Phenylalanine,
            'W' => Self::Tryptophan,
            'Y' => Self::Tyrosine,
            'N' => Self::Asparagine,
            'C' => Self::Cysteine,
            'Q' => Self::Glutamine,
            'S' => Self::Serine,
            'T' => Self::Threonine,
            'M' => Self::Methionine,
            'R' => Self::Arginine,
            'H' => Self::Histidine,
            'K' => Self::Lysine,
            'D' => Self::AsparticAcid,
            'E' => Self::GlutamicAcid,
            '*' => Self::Stop,
            _ => return None,
        };
        Some(residue)
    }

    pub fn code(self) -> char {
        match self {
            Self::Alanine => 'A',
            Self::Glycine => 'G',
            Self::Isoleucine => 'I',
            Self::Leucine => 'L',
            Self::Proline => 'P',
            Self::Valine => 'V',
            Self::Phenylalanine => 'F',
            Self::Tryptophan => 'W',
            Self::Tyrosine => 'Y',
            Self::Asparagine => 'N',
            Self::Cysteine => 'C',
            Self::Glutamine => 'Q',
            Self::Serine => 'S',
            Self::Threonine => 'T',
            Self::Methionine => 'M',
            Self::Arginine => 'R',
            Self::Histidine => 'H',
            Self::Lysine => 'K',
            Self::AsparticAcid => 'D',
            Self::GlutamicAcid => 'E',
            Self::Stop => '*',
        }
    }

    pub fn is_aromatic(self) -> bool {
        residue_classes::is_aromatic(self.code())
    }

    pub fn is_basic(self) -> bool {
        residue_classes::is_basic(self.code())
    }

    pub fn is_hydrophobic(self) -> bool {
        residue_classes::is_hydrophobic(self.code())
    }

    pub fn is_polar(self) -> bool {
        residue_classes::is_polar(self.code())
    }

    pub fn is_charged(self) -> bool {
        residue_classes::is_charged(self.code())
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SequenceError {
    #[error("Sequence is empty")]
    Empty,

    #[error("Invalid residue '{residue}' at position {position}")]
    InvalidResidue { residue: char, position: usize },
}

/// A non-empty protein sequence over the one-letter alphabet (20 residues plus `*`).
///
/// Parsing drops whitespace and upper-cases the input, so FASTA bodies split over
/// several lines can be passed through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ProteinSequence {
    residues: String,
}

impl ProteinSequence {
    pub fn parse(raw: &str) -> Result<Self, SequenceError> {
        let residues: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if residues.is_empty() {
            return Err(SequenceError::Empty);
        }
        if let Some((position, residue)) = residues
            .chars()
            .enumerate()
            .find(|&(_, c)| !residue_classes::is_valid_code(c))
        {
            return Err(SequenceError::InvalidResidue { residue, position });
        }

        Ok(Self { residues })
    }

    pub fn as_str(&self) -> &str {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn residues(&self) -> impl Iterator<Item = AminoAcid> + '_ {
        self.residues.chars().filter_map(AminoAcid::from_code)
    }

    /// Whether `residue` occurs among the first `window` positions.
    pub fn prefix_contains(&self, residue: AminoAcid, window: usize) -> bool {
        self.residues().take(window).any(|r| r == residue)
    }

    pub fn composition(&self) -> Composition {
        Composition::of(self)
    }

    /// The first 50 residues, followed by `...` when the sequence is longer.
    pub fn preview(&self) -> String {
        if self.len() > PREVIEW_LENGTH {
            format!("{}...", &self.residues[..PREVIEW_LENGTH])
        } else {
            self.residues.clone()
        }
    }
}

impl FromStr for ProteinSequence {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProteinSequence {
    type Error = SequenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProteinSequence> for String {
    fn from(sequence: ProteinSequence) -> Self {
        sequence.residues
    }
}

impl fmt::Display for ProteinSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.residues)
    }
}

/// Residue-class fractions over the whole sequence, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Composition {
    pub length: usize,
    pub aromatic: f64,
    pub basic: f64,
    pub hydrophobic: f64,
    pub polar: f64,
    pub charged: f64,
}

impl Composition {
    fn of(sequence: &ProteinSequence) -> Self {
        let length = sequence.len();
        let fraction = |predicate: fn(AminoAcid) -> bool| {
            sequence.residues().filter(|&r| predicate(r)).count() as f64 / length as f64
        };

        Self {
            length,
            aromatic: fraction(AminoAcid::is_aromatic),
            basic: fraction(AminoAcid::is_basic),
            hydrophobic: fraction(AminoAcid::is_hydrophobic),
            polar: fraction(AminoAcid::is_polar),
            charged: fraction(AminoAcid::is_charged),
        }
    }
}

use crate::core::models::score::SequenceScore;
use crate::core::models::sequence::ProteinSequence;

/// What informs a simulation's parameters, in priority order.
///
/// A score always wins over a raw sequence; the sequence of a score-biased
/// run is only echoed in the result.
#[derive(Debug, Clone, Copy)]
pub enum Bias<'a> {
    Score(&'a SequenceScore),
    Sequence(&'a ProteinSequence),
    None,
}

impl<'a> Bias<'a> {
    pub fn from_inputs(
        sequence: Option<&'a ProteinSequence>,
        score: Option<&'a SequenceScore>,
    ) -> Self {
        match (score, sequence) {
            (Some(score), _) => Self::Score(score),
            (None, Some(sequence)) => Self::Sequence(sequence),
            (None, None) => Self::None,
        }
    }

    pub fn score(&self) -> Option<&'a SequenceScore> {
        match *self {
            Self::Score(score) => Some(score),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Score(_) => "score",
            Self::Sequence(_) => "sequence",
            Self::None => "none",
        }
    }
}

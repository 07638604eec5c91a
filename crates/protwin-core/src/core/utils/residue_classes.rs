use phf::{Set, phf_set};

/// One-letter codes accepted in a protein sequence: the 20 standard residues plus `*`.
static ALPHABET: Set<char> = phf_set! {
    'A', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'V', 'W', 'Y',
    '*',
};

static AROMATIC: Set<char> = phf_set! { 'F', 'Y', 'W' };

static BASIC: Set<char> = phf_set! { 'K', 'R', 'H' };

static HYDROPHOBIC: Set<char> = phf_set! { 'A', 'I', 'L', 'M', 'F', 'W', 'Y', 'V' };

static POLAR: Set<char> = phf_set! { 'S', 'T', 'N', 'Q' };

static CHARGED: Set<char> = phf_set! { 'K', 'R', 'H', 'D', 'E' };

#[inline]
pub fn is_valid_code(code: char) -> bool {
    ALPHABET.contains(&code)
}

#[inline]
pub fn is_aromatic(code: char) -> bool {
    AROMATIC.contains(&code)
}

#[inline]
pub fn is_basic(code: char) -> bool {
    BASIC.contains(&code)
}

#[inline]
pub fn is_hydrophobic(code: char) -> bool {
    HYDROPHOBIC.contains(&code)
}

#[inline]
pub fn is_polar(code: char) -> bool {
    POLAR.contains(&code)
}

#[inline]
pub fn is_charged(code: char) -> bool {
    CHARGED.contains(&code)
}

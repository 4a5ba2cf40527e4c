use std::fmt;

use thiserror::Error;

/// Degree, level and modulus size of a ring element, reported on mismatches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
    pub degree: usize,
    pub level: usize,
    pub modulus_bits: u64,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(n={}, level={}, log2(q)={})",
            self.degree, self.level, self.modulus_bits
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingError {
    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: Shape, right: Shape },
    #[error("invalid level {level}: chain tops out at level {max}")]
    InvalidLevel { level: usize, max: usize },
    #[error("invalid modulus: {0}")]
    InvalidModulus(String),
    #[error("a modulus of {target_bits} bits does not divide a modulus of {source_bits} bits")]
    NotDivisible { source_bits: u64, target_bits: u64 },
    #[error("invalid galois element {gal_el}: must be odd and below {nth_root}")]
    InvalidGaloisElement { gal_el: usize, nth_root: usize },
    #[error("invalid ring degree {0}: must be a power of two >= 2")]
    InvalidDegree(usize),
}

use num_bigint::BigInt;
use sampling::source::Source;

use crate::automorphism::{GaloisPermutation, conjugation_element, galois_element};
use crate::error::{RingError, Shape};
use crate::modulus::{ModulusChain, WordOps};
use crate::poly::RingElement;
use crate::sampling::uniform_vec;

/// The polynomial ring `Z[X]/(X^N+1)` together with its modulus chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ring {
    n: usize,
    log_n: usize,
    chain: ModulusChain,
}

impl Ring {
    pub fn new(n: usize, chain: ModulusChain) -> Result<Self, RingError> {
        if n < 2 || !n.is_power_of_two() {
            return Err(RingError::InvalidDegree(n));
        }
        Ok(Self {
            n,
            log_n: n.log2(),
            chain,
        })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn log_n(&self) -> usize {
        self.log_n
    }

    pub fn nth_root(&self) -> usize {
        self.n << 1
    }

    pub fn chain(&self) -> &ModulusChain {
        &self.chain
    }

    pub fn max_level(&self) -> usize {
        self.chain.max_level()
    }

    pub fn zero(&self, level: usize) -> Result<RingElement, RingError> {
        Ok(RingElement::zero(
            self.n,
            self.chain.level_modulus(level)?,
            level,
        ))
    }

    /// Zero element modulo `P * Q_level`.
    pub fn zero_switching(&self, level: usize) -> Result<RingElement, RingError> {
        Ok(RingElement::zero(
            self.n,
            &self.chain.switching_modulus(level)?,
            level,
        ))
    }

    /// Embeds small signed coefficients modulo `Q_level`.
    pub fn from_i64(&self, coeffs: &[i64], level: usize) -> Result<RingElement, RingError> {
        let modulus: &BigInt = self.chain.level_modulus(level)?;
        self.check_degree(coeffs.len(), modulus, level)?;
        Ok(RingElement::from_i64(coeffs, modulus, level))
    }

    /// Embeds small signed coefficients modulo `P * Q_level`.
    pub fn from_i64_switching(
        &self,
        coeffs: &[i64],
        level: usize,
    ) -> Result<RingElement, RingError> {
        let modulus: BigInt = self.chain.switching_modulus(level)?;
        self.check_degree(coeffs.len(), &modulus, level)?;
        Ok(RingElement::from_i64(coeffs, &modulus, level))
    }

    /// Embeds arbitrary integers modulo `Q_level`.
    pub fn from_bigint(&self, coeffs: Vec<BigInt>, level: usize) -> Result<RingElement, RingError> {
        let modulus: &BigInt = self.chain.level_modulus(level)?;
        self.check_degree(coeffs.len(), modulus, level)?;
        Ok(RingElement::from_coeffs(coeffs, modulus, level))
    }

    pub fn uniform(&self, level: usize, source: &mut Source) -> Result<RingElement, RingError> {
        let modulus: &BigInt = self.chain.level_modulus(level)?;
        Ok(RingElement::from_coeffs(
            uniform_vec(self.n, modulus, source),
            modulus,
            level,
        ))
    }

    /// Uniform element modulo `P * Q_level`.
    pub fn uniform_switching(
        &self,
        level: usize,
        source: &mut Source,
    ) -> Result<RingElement, RingError> {
        let modulus: BigInt = self.chain.switching_modulus(level)?;
        Ok(RingElement::from_coeffs(
            uniform_vec(self.n, &modulus, source),
            &modulus,
            level,
        ))
    }

    pub fn galois_permutation(&self, gal_el: usize) -> Result<GaloisPermutation, RingError> {
        GaloisPermutation::new(self.n, gal_el)
    }

    /// Permutation rotating slots left by `step`.
    pub fn rotation_permutation(&self, step: usize) -> Result<GaloisPermutation, RingError> {
        GaloisPermutation::new(self.n, galois_element(step, self.n))
    }

    pub fn conjugation_permutation(&self) -> Result<GaloisPermutation, RingError> {
        GaloisPermutation::new(self.n, conjugation_element(self.n))
    }

    fn check_degree(&self, len: usize, modulus: &BigInt, level: usize) -> Result<(), RingError> {
        if len != self.n {
            let expected: Shape = Shape {
                degree: self.n,
                level,
                modulus_bits: modulus.bits(),
            };
            return Err(RingError::DimensionMismatch {
                left: expected,
                right: Shape {
                    degree: len,
                    ..expected
                },
            });
        }
        Ok(())
    }
}

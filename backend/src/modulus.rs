use num_bigint::BigInt;
use num_traits::One;

use crate::error::RingError;

pub trait WordOps<O> {
    fn log2(self) -> O;
    fn reverse_bits_msb(self, n: u32) -> O;
}

impl WordOps<usize> for usize {
    #[inline(always)]
    fn log2(self) -> usize {
        (usize::BITS - (self - 1).leading_zeros()) as _
    }
    #[inline(always)]
    fn reverse_bits_msb(self, n: u32) -> usize {
        self.reverse_bits() >> (usize::BITS - n)
    }
}

/// The ciphertext moduli q_0, ..., q_L and the special modulus P.
///
/// Level `l` works modulo `Q_l = q_0 * ... * q_l`. Key switching works modulo `P * Q_l`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModulusChain {
    moduli: Vec<BigInt>,
    products: Vec<BigInt>,
    big_modulus: BigInt,
}

impl ModulusChain {
    pub fn new(moduli: Vec<BigInt>, big_modulus: BigInt) -> Result<Self, RingError> {
        if moduli.is_empty() {
            return Err(RingError::InvalidModulus("empty modulus chain".into()));
        }
        if let Some((i, q)) = moduli.iter().enumerate().find(|(_, q)| **q <= BigInt::one()) {
            return Err(RingError::InvalidModulus(format!(
                "q[{i}]={q} must be greater than one"
            )));
        }
        if big_modulus <= BigInt::one() {
            return Err(RingError::InvalidModulus(format!(
                "big modulus {big_modulus} must be greater than one"
            )));
        }
        let mut products: Vec<BigInt> = Vec::with_capacity(moduli.len());
        let mut acc: BigInt = BigInt::one();
        moduli.iter().for_each(|q| {
            acc *= q;
            products.push(acc.clone());
        });
        Ok(Self {
            moduli,
            products,
            big_modulus,
        })
    }

    /// Number of moduli in the chain, i.e. `max_level() + 1`.
    pub fn len(&self) -> usize {
        self.moduli.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moduli.is_empty()
    }

    pub fn max_level(&self) -> usize {
        self.moduli.len() - 1
    }

    pub fn check_level(&self, level: usize) -> Result<(), RingError> {
        if level > self.max_level() {
            return Err(RingError::InvalidLevel {
                level,
                max: self.max_level(),
            });
        }
        Ok(())
    }

    /// Returns q_level, the factor dropped when rescaling from `level`.
    pub fn modulus(&self, level: usize) -> Result<&BigInt, RingError> {
        self.check_level(level)?;
        Ok(&self.moduli[level])
    }

    /// Returns Q_level.
    pub fn level_modulus(&self, level: usize) -> Result<&BigInt, RingError> {
        self.check_level(level)?;
        Ok(&self.products[level])
    }

    pub fn big_modulus(&self) -> &BigInt {
        &self.big_modulus
    }

    /// Returns P * Q_level.
    pub fn switching_modulus(&self, level: usize) -> Result<BigInt, RingError> {
        Ok(self.level_modulus(level)? * &self.big_modulus)
    }

    pub fn moduli(&self) -> &[BigInt] {
        &self.moduli
    }
}

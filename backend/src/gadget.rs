use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::RingError;
use crate::poly::RingElement;

/// Balanced base-`2^base_bits` decomposition used by key switching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gadget {
    base_bits: usize,
}

impl Gadget {
    pub fn new(base_bits: usize) -> Result<Self, RingError> {
        if base_bits < 2 {
            return Err(RingError::InvalidModulus(format!(
                "gadget base 2^{base_bits} must be at least 4"
            )));
        }
        Ok(Self { base_bits })
    }

    pub fn base_bits(&self) -> usize {
        self.base_bits
    }

    pub fn base(&self) -> BigInt {
        BigInt::one() << self.base_bits
    }

    /// Returns B^i.
    pub fn power(&self, i: usize) -> BigInt {
        BigInt::one() << (i * self.base_bits)
    }

    /// Number of balanced digits needed to represent any centered value modulo `modulus`.
    pub fn digits(&self, modulus: &BigInt) -> usize {
        (modulus.bits() as usize).div_ceil(self.base_bits) + 1
    }

    /// Splits the centered coefficients of `a` into `digits` polynomials with
    /// coefficients in `[-B/2, B/2)` such that `sum_i B^i * d_i = centered(a)`.
    /// Every digit is returned modulo `modulus`.
    pub fn decompose(&self, a: &RingElement, digits: usize, modulus: &BigInt) -> Vec<RingElement> {
        let base: BigInt = self.base();
        let half: BigInt = &base >> 1usize;
        let mut rests: Vec<BigInt> = a.centered();
        let decomposed: Vec<RingElement> = (0..digits)
            .map(|_| {
                let digit: Vec<BigInt> = rests
                    .iter_mut()
                    .map(|x| {
                        let mut d: BigInt = x.mod_floor(&base);
                        if d >= half {
                            d -= &base;
                        }
                        *x = (&*x - &d) >> self.base_bits;
                        d
                    })
                    .collect();
                RingElement::from_coeffs(digit, modulus, a.level())
            })
            .collect();
        debug_assert!(
            rests.iter().all(|x| x.is_zero()),
            "decomposition truncated: {digits} digits are not enough"
        );
        decomposed
    }

    /// Inverse of [Gadget::decompose] on centered digit coefficients.
    pub fn recompose(&self, digits: &[RingElement]) -> Vec<BigInt> {
        let n: usize = digits.first().map_or(0, |d| d.n());
        let mut acc: Vec<BigInt> = vec![BigInt::zero(); n];
        digits.iter().enumerate().for_each(|(i, d)| {
            let scale: BigInt = self.power(i);
            acc.iter_mut()
                .zip(d.centered())
                .for_each(|(a, c)| *a += c * &scale);
        });
        acc
    }
}

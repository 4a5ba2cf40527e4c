use itertools::izip;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::Zero;

use crate::automorphism::GaloisPermutation;
use crate::error::{RingError, Shape};
use crate::modulus::ModulusChain;
use crate::num_bigint::{RoundingDiv, to_f64};

/// An element of `Z_q[X]/(X^N+1)`, coefficients stored in `[0, q)`.
///
/// `level` records which chain entry `q` was derived from. Binary operations require
/// both operands to agree on degree, level and modulus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingElement {
    coeffs: Vec<BigInt>,
    modulus: BigInt,
    level: usize,
}

impl RingElement {
    pub fn zero(n: usize, modulus: &BigInt, level: usize) -> Self {
        Self {
            coeffs: vec![BigInt::zero(); n],
            modulus: modulus.clone(),
            level,
        }
    }

    /// Builds an element from arbitrary integers, reducing each into `[0, modulus)`.
    pub fn from_coeffs(coeffs: Vec<BigInt>, modulus: &BigInt, level: usize) -> Self {
        let coeffs: Vec<BigInt> = coeffs.into_iter().map(|c| c.mod_floor(modulus)).collect();
        Self {
            coeffs,
            modulus: modulus.clone(),
            level,
        }
    }

    pub fn from_i64(coeffs: &[i64], modulus: &BigInt, level: usize) -> Self {
        let coeffs: Vec<BigInt> = coeffs
            .iter()
            .map(|c| BigInt::from(*c).mod_floor(modulus))
            .collect();
        Self {
            coeffs,
            modulus: modulus.clone(),
            level,
        }
    }

    pub fn n(&self) -> usize {
        self.coeffs.len()
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    pub fn coeffs(&self) -> &[BigInt] {
        &self.coeffs
    }

    pub fn shape(&self) -> Shape {
        Shape {
            degree: self.n(),
            level: self.level,
            modulus_bits: self.modulus.bits(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_zero())
    }

    fn check_compatible(&self, other: &RingElement) -> Result<(), RingError> {
        if self.n() != other.n() || self.level != other.level || self.modulus != other.modulus {
            return Err(RingError::DimensionMismatch {
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(())
    }

    fn check_small(&self, small: &[i64]) -> Result<(), RingError> {
        if small.len() != self.n() {
            return Err(RingError::DimensionMismatch {
                left: self.shape(),
                right: Shape {
                    degree: small.len(),
                    ..self.shape()
                },
            });
        }
        Ok(())
    }

    fn with_coeffs(&self, coeffs: Vec<BigInt>) -> RingElement {
        RingElement {
            coeffs,
            modulus: self.modulus.clone(),
            level: self.level,
        }
    }

    pub fn add(&self, other: &RingElement) -> Result<RingElement, RingError> {
        self.check_compatible(other)?;
        let coeffs: Vec<BigInt> = izip!(self.coeffs.iter(), other.coeffs.iter())
            .map(|(a, b)| {
                let c: BigInt = a + b;
                if c >= self.modulus { c - &self.modulus } else { c }
            })
            .collect();
        Ok(self.with_coeffs(coeffs))
    }

    pub fn sub(&self, other: &RingElement) -> Result<RingElement, RingError> {
        self.check_compatible(other)?;
        let coeffs: Vec<BigInt> = izip!(self.coeffs.iter(), other.coeffs.iter())
            .map(|(a, b)| {
                if a >= b {
                    a - b
                } else {
                    a + &self.modulus - b
                }
            })
            .collect();
        Ok(self.with_coeffs(coeffs))
    }

    pub fn neg(&self) -> RingElement {
        let coeffs: Vec<BigInt> = self
            .coeffs
            .iter()
            .map(|a| {
                if a.is_zero() {
                    BigInt::zero()
                } else {
                    &self.modulus - a
                }
            })
            .collect();
        self.with_coeffs(coeffs)
    }

    /// Negacyclic product modulo `X^N+1` and `q`.
    pub fn multiply(&self, other: &RingElement) -> Result<RingElement, RingError> {
        self.check_compatible(other)?;
        let n: usize = self.n();
        let mut acc: Vec<BigInt> = vec![BigInt::zero(); n];
        self.coeffs.iter().enumerate().for_each(|(i, a)| {
            if a.is_zero() {
                return;
            }
            other.coeffs.iter().enumerate().for_each(|(j, b)| {
                let prod: BigInt = a * b;
                if i + j < n {
                    acc[i + j] += prod;
                } else {
                    acc[i + j - n] -= prod;
                }
            });
        });
        acc.iter_mut()
            .for_each(|c| *c = c.mod_floor(&self.modulus));
        Ok(self.with_coeffs(acc))
    }

    /// Negacyclic product with a polynomial of small signed coefficients.
    pub fn multiply_small(&self, small: &[i64]) -> Result<RingElement, RingError> {
        self.check_small(small)?;
        let n: usize = self.n();
        let mut acc: Vec<BigInt> = vec![BigInt::zero(); n];
        small.iter().enumerate().for_each(|(j, b)| {
            if *b == 0 {
                return;
            }
            let b: BigInt = BigInt::from(*b);
            self.coeffs.iter().enumerate().for_each(|(i, a)| {
                let prod: BigInt = a * &b;
                if i + j < n {
                    acc[i + j] += prod;
                } else {
                    acc[i + j - n] -= prod;
                }
            });
        });
        acc.iter_mut()
            .for_each(|c| *c = c.mod_floor(&self.modulus));
        Ok(self.with_coeffs(acc))
    }

    pub fn add_small(&self, small: &[i64]) -> Result<RingElement, RingError> {
        self.check_small(small)?;
        let coeffs: Vec<BigInt> = izip!(self.coeffs.iter(), small.iter())
            .map(|(a, b)| (a + BigInt::from(*b)).mod_floor(&self.modulus))
            .collect();
        Ok(self.with_coeffs(coeffs))
    }

    /// Adds `factor * small` coefficient-wise.
    pub fn add_scaled_small(
        &self,
        small: &[i64],
        factor: &BigInt,
    ) -> Result<RingElement, RingError> {
        self.check_small(small)?;
        let coeffs: Vec<BigInt> = izip!(self.coeffs.iter(), small.iter())
            .map(|(a, b)| (a + factor * *b).mod_floor(&self.modulus))
            .collect();
        Ok(self.with_coeffs(coeffs))
    }

    pub fn scalar_multiply(&self, scalar: &BigInt) -> RingElement {
        let coeffs: Vec<BigInt> = self
            .coeffs
            .iter()
            .map(|a| (a * scalar).mod_floor(&self.modulus))
            .collect();
        self.with_coeffs(coeffs)
    }

    /// Scales the element from `Q_self` down to `Q_level`, dividing the centered
    /// coefficients by `Q_self / Q_level` with rounding.
    pub fn mod_switch(&self, chain: &ModulusChain, level: usize) -> Result<RingElement, RingError> {
        let source: &BigInt = chain.level_modulus(self.level)?;
        if level > self.level {
            return Err(RingError::InvalidLevel {
                level,
                max: self.level,
            });
        }
        if *source != self.modulus {
            return Err(RingError::InvalidModulus(format!(
                "element modulus has {} bits, chain expects {} bits at level {}",
                self.modulus.bits(),
                source.bits(),
                self.level
            )));
        }
        let target: &BigInt = chain.level_modulus(level)?;
        let divisor: BigInt = source / target;
        Ok(self.divide_round(&divisor, target, level))
    }

    /// Reduces every coefficient modulo a divisor of the current modulus.
    pub fn mod_reduce(&self, modulus: &BigInt, level: usize) -> Result<RingElement, RingError> {
        if modulus.is_zero() || !self.modulus.is_multiple_of(modulus) {
            return Err(RingError::NotDivisible {
                source_bits: self.modulus.bits(),
                target_bits: modulus.bits(),
            });
        }
        let coeffs: Vec<BigInt> = self.coeffs.iter().map(|c| c.mod_floor(modulus)).collect();
        Ok(RingElement {
            coeffs,
            modulus: modulus.clone(),
            level,
        })
    }

    /// Re-embeds the centered coefficients into a (usually larger) modulus.
    pub fn lift(&self, modulus: &BigInt, level: usize) -> RingElement {
        let coeffs: Vec<BigInt> = self
            .coeffs
            .iter()
            .map(|c| c.center(&self.modulus).mod_floor(modulus))
            .collect();
        RingElement {
            coeffs,
            modulus: modulus.clone(),
            level,
        }
    }

    /// Returns round(centered(self) / divisor) reduced into `modulus`.
    pub fn divide_round(&self, divisor: &BigInt, modulus: &BigInt, level: usize) -> RingElement {
        let coeffs: Vec<BigInt> = self
            .coeffs
            .iter()
            .map(|c| {
                c.center(&self.modulus)
                    .div_round(divisor)
                    .mod_floor(modulus)
            })
            .collect();
        RingElement {
            coeffs,
            modulus: modulus.clone(),
            level,
        }
    }

    /// Maps `a(X)` to `a(X^k)` where `k` is the permutation's Galois element.
    pub fn automorphism(&self, perm: &GaloisPermutation) -> Result<RingElement, RingError> {
        if perm.n() != self.n() {
            return Err(RingError::DimensionMismatch {
                left: self.shape(),
                right: Shape {
                    degree: perm.n(),
                    ..self.shape()
                },
            });
        }
        let mut coeffs: Vec<BigInt> = vec![BigInt::zero(); self.n()];
        izip!(self.coeffs.iter(), perm.index().iter()).for_each(|(a, idx)| {
            let (i_out, negate) = GaloisPermutation::unpack(*idx);
            coeffs[i_out] = if negate && !a.is_zero() {
                &self.modulus - a
            } else {
                a.clone()
            };
        });
        Ok(self.with_coeffs(coeffs))
    }

    /// Coefficients in `(-q/2, q/2]`.
    pub fn centered(&self) -> Vec<BigInt> {
        self.coeffs
            .iter()
            .map(|c| c.center(&self.modulus))
            .collect()
    }

    /// Centered coefficients converted to `f64`.
    pub fn to_f64(&self) -> Vec<f64> {
        self.coeffs
            .iter()
            .map(|c| to_f64(&c.center(&self.modulus)))
            .collect()
    }
}

/// Negacyclic product of two polynomials with small signed coefficients.
///
/// Callers guarantee `n * max|a| * max|b| < 2^63`, so that every partial sum fits
/// in an `i64`.
pub fn negacyclic_mul_i64(a: &[i64], b: &[i64]) -> Vec<i64> {
    debug_assert_eq!(a.len(), b.len());
    let n: usize = a.len();
    let mut acc: Vec<i64> = vec![0; n];
    a.iter().enumerate().for_each(|(i, x)| {
        if *x == 0 {
            return;
        }
        b.iter().enumerate().for_each(|(j, y)| {
            if i + j < n {
                acc[i + j] += x * y;
            } else {
                acc[i + j - n] -= x * y;
            }
        });
    });
    acc
}

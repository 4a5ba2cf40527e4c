use std::f64::consts::PI;

use num::complex::Complex64;

use crate::dft::DFT;
use crate::error::RingError;
use crate::modulus::WordOps;

/// Special FFT evaluating `Z[X]/(X^N+1)` at the primitive `2N`-th roots `zeta^(5^j)`,
/// `j < N/2`.
///
/// The transform acts on `N/2` complex values `u_i = m_i + i * m_(i+N/2)`, which folds
/// the real coefficients of `m` using `zeta^(5^j * N/2) = i`.
/// [DFT::forward_inplace] maps folded coefficients to slots and
/// [DFT::backward_inplace] maps slots back.
#[derive(Clone, Debug)]
pub struct EmbeddingTable {
    m: usize,
    slots: usize,
    roots: Vec<Complex64>,
    rot_group: Vec<usize>,
}

impl EmbeddingTable {
    pub fn new(n: usize) -> Result<Self, RingError> {
        if n < 2 || !n.is_power_of_two() {
            return Err(RingError::InvalidDegree(n));
        }
        let m: usize = n << 1;
        let slots: usize = n >> 1;
        let roots: Vec<Complex64> = (0..=m)
            .map(|k| Complex64::from_polar(1.0, 2.0 * PI * (k as f64) / (m as f64)))
            .collect();
        let mut rot_group: Vec<usize> = Vec::with_capacity(slots);
        let mut five_pow: usize = 1;
        (0..slots).for_each(|_| {
            rot_group.push(five_pow);
            five_pow = (five_pow * 5) % m;
        });
        Ok(Self {
            m,
            slots,
            roots,
            rot_group,
        })
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Returns `5^j mod 2N`, the exponent of the root evaluated by slot `j`.
    pub fn rot_group(&self) -> &[usize] {
        &self.rot_group
    }

    /// Returns `exp(2 * pi * i * k / 2N)`.
    pub fn root(&self, k: usize) -> Complex64 {
        self.roots[k % self.m]
    }
}

fn bit_reverse_inplace(a: &mut [Complex64]) {
    let size: usize = a.len();
    if size <= 2 {
        return;
    }
    let log_size: u32 = size.log2() as u32;
    (0..size).for_each(|i| {
        let j: usize = i.reverse_bits_msb(log_size);
        if i < j {
            a.swap(i, j);
        }
    });
}

impl DFT<Complex64> for EmbeddingTable {
    fn forward_inplace(&self, a: &mut [Complex64]) {
        let size: usize = a.len();
        debug_assert!(
            size.is_power_of_two() && size <= self.slots,
            "invalid argument: a.len()={} is not a power of two <= {}",
            size,
            self.slots
        );
        bit_reverse_inplace(a);
        let mut len: usize = 2;
        while len <= size {
            let lenh: usize = len >> 1;
            let lenq: usize = len << 2;
            let gap: usize = self.m / lenq;
            (0..size).step_by(len).for_each(|i| {
                (0..lenh).for_each(|j| {
                    let idx: usize = (self.rot_group[j] % lenq) * gap;
                    let u: Complex64 = a[i + j];
                    let v: Complex64 = a[i + j + lenh] * self.roots[idx];
                    a[i + j] = u + v;
                    a[i + j + lenh] = u - v;
                })
            });
            len <<= 1;
        }
    }

    fn backward_inplace(&self, a: &mut [Complex64]) {
        let size: usize = a.len();
        debug_assert!(
            size.is_power_of_two() && size <= self.slots,
            "invalid argument: a.len()={} is not a power of two <= {}",
            size,
            self.slots
        );
        let mut len: usize = size;
        while len >= 2 {
            let lenh: usize = len >> 1;
            let lenq: usize = len << 2;
            let gap: usize = self.m / lenq;
            (0..size).step_by(len).for_each(|i| {
                (0..lenh).for_each(|j| {
                    let idx: usize = (lenq - (self.rot_group[j] % lenq)) * gap;
                    let u: Complex64 = a[i + j] + a[i + j + lenh];
                    let v: Complex64 = (a[i + j] - a[i + j + lenh]) * self.roots[idx];
                    a[i + j] = u;
                    a[i + j + lenh] = v;
                })
            });
            len >>= 1;
        }
        bit_reverse_inplace(a);
        let inv: f64 = 1.0 / (size as f64);
        a.iter_mut().for_each(|x| *x *= inv);
    }
}

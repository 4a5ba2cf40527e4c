use crate::error::RingError;
use crate::modulus::WordOps;

/// Marks an output index whose coefficient must be negated.
const SIGN_BIT: usize = 1 << (usize::BITS - 1);

/// Galois element `5^step mod 2N`, rotating slots to the left by `step`.
pub fn galois_element(step: usize, n: usize) -> usize {
    let nth_root: u128 = (n << 1) as u128;
    let mut base: u128 = 5 % nth_root;
    let mut exp: usize = step;
    let mut gal_el: u128 = 1;
    while exp > 0 {
        if exp & 1 == 1 {
            gal_el = (gal_el * base) % nth_root;
        }
        base = (base * base) % nth_root;
        exp >>= 1;
    }
    gal_el as usize
}

/// Galois element `2N - 1`, conjugating every slot.
pub fn conjugation_element(n: usize) -> usize {
    (n << 1) - 1
}

/// Precomputed index map of the automorphism `X -> X^gal_el` on `Z[X]/(X^N+1)`.
///
/// Each entry stores the output position of input coefficient `i`, with the
/// sign of the image packed in the MSB.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GaloisPermutation {
    gal_el: usize,
    index: Vec<usize>,
}

impl GaloisPermutation {
    pub fn new(n: usize, gal_el: usize) -> Result<Self, RingError> {
        if n < 2 || !n.is_power_of_two() {
            return Err(RingError::InvalidDegree(n));
        }
        let nth_root: usize = n << 1;
        if gal_el & 1 == 0 || gal_el >= nth_root {
            return Err(RingError::InvalidGaloisElement { gal_el, nth_root });
        }
        let log_n: usize = n.log2();
        let mask: usize = n - 1;
        let index: Vec<usize> = (0..n)
            .map(|i| {
                let i_rot: usize = i.wrapping_mul(gal_el) & (nth_root - 1);
                let sign: usize = (i_rot >> log_n) & 1;
                (i_rot & mask) | (sign << (usize::BITS - 1))
            })
            .collect();
        Ok(Self { gal_el, index })
    }

    pub fn gal_el(&self) -> usize {
        self.gal_el
    }

    pub fn n(&self) -> usize {
        self.index.len()
    }

    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Splits a packed entry into (output position, negate).
    #[inline(always)]
    pub fn unpack(idx: usize) -> (usize, bool) {
        (idx & !SIGN_BIT, idx & SIGN_BIT != 0)
    }

    /// Applies the automorphism to a polynomial with small signed coefficients.
    pub fn apply_small(&self, a: &[i64]) -> Vec<i64> {
        debug_assert_eq!(a.len(), self.n());
        let mut out: Vec<i64> = vec![0; a.len()];
        a.iter().zip(self.index.iter()).for_each(|(x, idx)| {
            let (i_out, negate) = Self::unpack(*idx);
            out[i_out] = if negate { -x } else { *x };
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn galois_elements() {
        assert_eq!(galois_element(0, 8), 1);
        assert_eq!(galois_element(1, 8), 5);
        assert_eq!(galois_element(2, 8), 9);
        assert_eq!(galois_element(3, 8), 13);
        // 5 has order N/2 modulo 2N.
        assert_eq!(galois_element(4, 8), 1);
        assert_eq!(conjugation_element(8), 15);
    }

    #[test]
    fn x_maps_to_x_pow_gal_el() {
        let perm: GaloisPermutation = GaloisPermutation::new(4, 3).unwrap();
        // X -> X^3, X^2 -> X^6 = -X^2, X^3 -> X^9 = X
        assert_eq!(perm.apply_small(&[0, 1, 0, 0]), vec![0, 0, 0, 1]);
        assert_eq!(perm.apply_small(&[0, 0, 1, 0]), vec![0, 0, -1, 0]);
        assert_eq!(perm.apply_small(&[0, 0, 0, 1]), vec![0, 1, 0, 0]);
        assert_eq!(perm.apply_small(&[7, 0, 0, 0]), vec![7, 0, 0, 0]);
    }

    #[test]
    fn rejects_bad_elements() {
        assert_eq!(
            GaloisPermutation::new(8, 4),
            Err(RingError::InvalidGaloisElement {
                gal_el: 4,
                nth_root: 16
            })
        );
        assert!(GaloisPermutation::new(8, 17).is_err());
        assert_eq!(
            GaloisPermutation::new(6, 5),
            Err(RingError::InvalidDegree(6))
        );
    }

    #[test]
    fn composition_is_product_of_elements() {
        let n: usize = 16;
        let a: Vec<i64> = (0..n as i64).map(|i| i - 5).collect();
        let p5: GaloisPermutation = GaloisPermutation::new(n, 5).unwrap();
        let p25: GaloisPermutation = GaloisPermutation::new(n, 25).unwrap();
        assert_eq!(p5.apply_small(&p5.apply_small(&a)), p25.apply_small(&a));
    }
}

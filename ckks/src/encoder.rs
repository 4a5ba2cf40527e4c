use std::sync::Arc;

use backend::dft::DFT;
use backend::dft::embedding::EmbeddingTable;
use backend::error::Shape;
use backend::poly::RingElement;
use num::complex::Complex64;
use num_bigint::BigInt;
use num_traits::{FromPrimitive, Signed, Zero};

use crate::error::{CkksError, Result};
use crate::parameters::Parameters;
use crate::plaintext::Plaintext;
use crate::slots::SlotVector;

/// Maps slot vectors to ring elements and back through the canonical embedding.
///
/// This is the only place where floating-point values are rounded into ring
/// coefficients: [Encoder::encode] scales the inverse embedding by `scale` and rounds
/// each coefficient to the nearest integer.
pub struct Encoder {
    params: Arc<Parameters>,
    table: EmbeddingTable,
}

impl Encoder {
    pub fn new(params: Arc<Parameters>) -> Result<Self> {
        let table: EmbeddingTable = EmbeddingTable::new(params.ring_degree())?;
        Ok(Self { params, table })
    }

    /// Encodes at the top level.
    pub fn encode(&self, values: &[Complex64], scale: f64) -> Result<Plaintext> {
        self.encode_at_level(values, scale, self.params.max_level())
    }

    pub fn encode_real(&self, values: &[f64], scale: f64) -> Result<Plaintext> {
        let slots: SlotVector = SlotVector::from_real(values, self.params.slots())?;
        self.encode_slots(&slots, scale, self.params.max_level())
    }

    pub fn encode_at_level(
        &self,
        values: &[Complex64],
        scale: f64,
        level: usize,
    ) -> Result<Plaintext> {
        let slots: SlotVector = SlotVector::from_values(values, self.params.slots())?;
        self.encode_slots(&slots, scale, level)
    }

    pub fn encode_slots(&self, slots: &SlotVector, scale: f64, level: usize) -> Result<Plaintext> {
        let n_half: usize = self.params.slots();
        if slots.len() > n_half {
            return Err(CkksError::SlotOverflow {
                len: slots.len(),
                slots: n_half,
            });
        }
        if let Some(i) = slots.first_non_finite() {
            return Err(CkksError::NonFiniteValue(i));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(CkksError::InvalidParameters(format!(
                "scale {scale} must be finite and positive"
            )));
        }
        let modulus: &BigInt = self.params.modulus_chain().level_modulus(level)?;
        let overflow = || CkksError::PlaintextOverflow {
            level,
            modulus_bits: modulus.bits(),
        };

        let mut u: Vec<Complex64> = vec![Complex64::zero(); n_half];
        u[..slots.len()].copy_from_slice(slots.as_slice());
        self.table.backward_inplace(&mut u);

        let mut coeffs: Vec<BigInt> = vec![BigInt::zero(); n_half << 1];
        for (i, ui) in u.iter().enumerate() {
            coeffs[i] = BigInt::from_f64((ui.re * scale).round()).ok_or_else(overflow)?;
            coeffs[i + n_half] = BigInt::from_f64((ui.im * scale).round()).ok_or_else(overflow)?;
        }
        if coeffs.iter().any(|c| (c.abs() << 1usize) >= *modulus) {
            return Err(overflow());
        }

        Ok(Plaintext::new(
            RingElement::from_coeffs(coeffs, modulus, level),
            scale,
        ))
    }

    /// Returns all `N/2` slots of `pt`, divided by its scale.
    pub fn decode(&self, pt: &Plaintext) -> Result<SlotVector> {
        let n: usize = self.params.ring_degree();
        if pt.ring_degree() != n {
            let shape: Shape = pt.element().shape();
            return Err(CkksError::DimensionMismatch {
                left: Shape { degree: n, ..shape },
                right: shape,
            });
        }
        let n_half: usize = n >> 1;
        let inv_scale: f64 = 1.0 / pt.scale();
        let c: Vec<f64> = pt.element().to_f64();
        let mut u: Vec<Complex64> = (0..n_half)
            .map(|i| Complex64::new(c[i] * inv_scale, c[i + n_half] * inv_scale))
            .collect();
        self.table.forward_inplace(&mut u);
        Ok(SlotVector::full(u))
    }

    pub fn decode_real(&self, pt: &Plaintext) -> Result<Vec<f64>> {
        Ok(self.decode(pt)?.real_parts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::automorphism::galois_element;

    const DELTA: f64 = (1u64 << 30) as f64;

    fn encoder() -> Encoder {
        let params: Parameters =
            Parameters::with_uniform_chain(16, 60, 30, 4, 300, DELTA).unwrap();
        Encoder::new(Arc::new(params)).unwrap()
    }

    fn values() -> Vec<Complex64> {
        (0..8)
            .map(|i| Complex64::new(0.1 * i as f64 - 0.3, 0.05 * i as f64))
            .collect()
    }

    fn assert_close(a: &[Complex64], b: &[Complex64], tol: f64) {
        assert_eq!(a.len(), b.len());
        a.iter()
            .zip(b.iter())
            .enumerate()
            .for_each(|(i, (x, y))| assert!((x - y).norm() < tol, "slot {i}: {x} != {y}"));
    }

    #[test]
    fn encode_decode_round_trip() {
        let encoder: Encoder = encoder();
        let v: Vec<Complex64> = values();
        let pt: Plaintext = encoder.encode(&v, DELTA).unwrap();
        assert_eq!(pt.level(), 4);
        assert_eq!(pt.scale(), DELTA);
        assert_close(encoder.decode(&pt).unwrap().as_slice(), &v, 1e-7);
    }

    #[test]
    fn short_vectors_are_zero_padded() {
        let encoder: Encoder = encoder();
        let pt: Plaintext = encoder.encode_real(&[1.5, -2.0], DELTA).unwrap();
        let decoded: Vec<f64> = encoder.decode_real(&pt).unwrap();
        assert_eq!(decoded.len(), 8);
        let expected: [f64; 8] = [1.5, -2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        decoded
            .iter()
            .zip(expected.iter())
            .for_each(|(x, y)| assert!((x - y).abs() < 1e-7));
    }

    #[test]
    fn ring_product_is_slotwise_product() {
        let encoder: Encoder = encoder();
        let v: Vec<Complex64> = values();
        let w: Vec<Complex64> = v.iter().rev().copied().collect();
        let pv: Plaintext = encoder.encode(&v, DELTA).unwrap();
        let pw: Plaintext = encoder.encode(&w, DELTA).unwrap();
        let prod: Plaintext = Plaintext::new(
            pv.element().multiply(pw.element()).unwrap(),
            DELTA * DELTA,
        );
        let expected: Vec<Complex64> = v.iter().zip(w.iter()).map(|(x, y)| x * y).collect();
        assert_close(encoder.decode(&prod).unwrap().as_slice(), &expected, 1e-6);
    }

    #[test]
    fn galois_element_rotates_left() {
        let encoder: Encoder = encoder();
        let v: Vec<Complex64> = values();
        let pt: Plaintext = encoder.encode(&v, DELTA).unwrap();
        let ring = encoder.params.ring();
        let perm = ring.galois_permutation(galois_element(3, 16)).unwrap();
        let rotated: Plaintext = Plaintext::new(pt.element().automorphism(&perm).unwrap(), DELTA);
        let expected: Vec<Complex64> = (0..8).map(|i| v[(i + 3) % 8]).collect();
        assert_close(encoder.decode(&rotated).unwrap().as_slice(), &expected, 1e-7);
    }

    #[test]
    fn invalid_inputs() {
        let encoder: Encoder = encoder();
        assert_eq!(
            encoder.encode_real(&[0.0; 9], DELTA),
            Err(CkksError::SlotOverflow { len: 9, slots: 8 })
        );
        assert_eq!(
            encoder.encode_real(&[0.0, f64::NAN], DELTA),
            Err(CkksError::NonFiniteValue(1))
        );
        assert!(matches!(
            encoder.encode_at_level(&[Complex64::new(1e12, 0.0)], DELTA, 0),
            Err(CkksError::PlaintextOverflow { level: 0, .. })
        ));
        assert!(matches!(
            encoder.encode_at_level(&[Complex64::new(1.0, 0.0)], DELTA, 9),
            Err(CkksError::InvalidParameters(_))
        ));
    }
}

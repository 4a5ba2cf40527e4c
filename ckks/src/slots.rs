use num::complex::Complex64;

use crate::error::{CkksError, Result};

/// Fixed-capacity vector of slot values.
///
/// Storage always spans the full capacity; positions at and beyond `len` hold zero.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotVector {
    values: Vec<Complex64>,
    len: usize,
}

impl SlotVector {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: vec![Complex64::new(0.0, 0.0); capacity],
            len: 0,
        }
    }

    pub fn from_values(values: &[Complex64], capacity: usize) -> Result<Self> {
        if values.len() > capacity {
            return Err(CkksError::SlotOverflow {
                len: values.len(),
                slots: capacity,
            });
        }
        let mut slots: SlotVector = Self::new(capacity);
        slots.values[..values.len()].copy_from_slice(values);
        slots.len = values.len();
        Ok(slots)
    }

    pub fn from_real(values: &[f64], capacity: usize) -> Result<Self> {
        let values: Vec<Complex64> = values.iter().map(|x| Complex64::new(*x, 0.0)).collect();
        Self::from_values(&values, capacity)
    }

    /// Wraps a vector whose length is the capacity.
    pub(crate) fn full(values: Vec<Complex64>) -> Self {
        let len: usize = values.len();
        Self { values, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// The first `len` values.
    pub fn as_slice(&self) -> &[Complex64] {
        &self.values[..self.len]
    }

    /// All `capacity` values, zero padded.
    pub fn padded(&self) -> &[Complex64] {
        &self.values
    }

    pub fn real_parts(&self) -> Vec<f64> {
        self.as_slice().iter().map(|x| x.re).collect()
    }

    /// Shortens the logical length, zeroing the dropped values.
    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.values[len..self.len]
                .iter_mut()
                .for_each(|x| *x = Complex64::new(0.0, 0.0));
            self.len = len;
        }
    }

    /// Index of the first value with a non-finite component.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.as_slice()
            .iter()
            .position(|x| !(x.re.is_finite() && x.im.is_finite()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_and_tracks_length() {
        let v: SlotVector = SlotVector::from_real(&[1.0, 2.0], 4).unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v.capacity(), 4);
        assert_eq!(v.real_parts(), vec![1.0, 2.0]);
        assert_eq!(v.padded()[3], Complex64::new(0.0, 0.0));
    }

    #[test]
    fn overflow_is_rejected() {
        assert_eq!(
            SlotVector::from_real(&[0.0; 5], 4),
            Err(CkksError::SlotOverflow { len: 5, slots: 4 })
        );
    }

    #[test]
    fn truncate_zeroes_tail() {
        let mut v: SlotVector = SlotVector::from_real(&[1.0, 2.0, 3.0], 4).unwrap();
        v.truncate(1);
        assert_eq!(v.len(), 1);
        assert_eq!(v.padded()[1], Complex64::new(0.0, 0.0));
        assert_eq!(v.first_non_finite(), None);
        let w: SlotVector = SlotVector::from_real(&[1.0, f64::INFINITY], 4).unwrap();
        assert_eq!(w.first_non_finite(), Some(1));
    }
}

use rand::seq::SliceRandom;
use rand_core::RngCore;
use rand_distr::{Distribution as _, Normal, weighted::WeightedIndex};
use thiserror::Error;

use crate::source::Source;

/// Errors raised when a distribution cannot be sampled as configured.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    #[error("invalid probability {0}: expected a value in [0, 1]")]
    InvalidProbability(f64),
    #[error("invalid standard deviation {0}: expected a finite positive value")]
    InvalidSigma(f64),
    #[error("hamming weight {hw} exceeds the vector length {n}")]
    HammingWeightTooLarge { hw: usize, n: usize },
}

/// Distributions of small signed coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Distribution {
    /// Ternary with exactly `hw` non-zero coefficients.
    TernaryFixed(usize),
    /// Ternary, each coefficient non-zero with probability `p` (split evenly between -1 and 1).
    TernaryProb(f64),
    /// Rounded normal with standard deviation `sigma`, rejected outside `[-bound, bound]`.
    Gaussian { sigma: f64, bound: f64 },
    /// All zero, for debugging.
    ZERO,
}

pub const SIX_SIGMA: f64 = 6.0;

impl Distribution {
    /// Rounded Gaussian truncated at six standard deviations.
    pub fn gaussian(sigma: f64) -> Self {
        Distribution::Gaussian {
            sigma,
            bound: SIX_SIGMA * sigma,
        }
    }

    /// Checks that vectors of length `n` can be drawn from `self`.
    pub fn validate(&self, n: usize) -> Result<(), SamplingError> {
        match *self {
            Distribution::TernaryFixed(hw) if hw > n => {
                Err(SamplingError::HammingWeightTooLarge { hw, n })
            }
            Distribution::TernaryProb(p) if !(0.0..=1.0).contains(&p) => {
                Err(SamplingError::InvalidProbability(p))
            }
            Distribution::Gaussian { sigma, bound }
                if !(sigma.is_finite() && sigma > 0.0 && bound >= sigma) =>
            {
                Err(SamplingError::InvalidSigma(sigma))
            }
            _ => Ok(()),
        }
    }

    /// Largest absolute value a sample can take.
    pub fn max_abs(&self) -> f64 {
        match *self {
            Distribution::TernaryFixed(0) | Distribution::ZERO => 0.0,
            Distribution::TernaryFixed(_) | Distribution::TernaryProb(_) => 1.0,
            Distribution::Gaussian { bound, .. } => bound.round(),
        }
    }

    /// Returns `n` coefficients drawn from `self`.
    pub fn sample_vec(&self, n: usize, source: &mut Source) -> Result<Vec<i64>, SamplingError> {
        let mut data: Vec<i64> = vec![0i64; n];
        self.fill(&mut data, source)?;
        Ok(data)
    }

    /// Overwrites `data` with coefficients drawn from `self`.
    pub fn fill(&self, data: &mut [i64], source: &mut Source) -> Result<(), SamplingError> {
        self.validate(data.len())?;
        match *self {
            Distribution::TernaryFixed(hw) => {
                data.fill(0);
                data[..hw]
                    .iter_mut()
                    .for_each(|x: &mut i64| *x = (((source.next_u64() & 1) as i64) << 1) - 1);
                data.shuffle(source);
            }
            Distribution::TernaryProb(prob) => {
                let choices: [i64; 3] = [-1, 0, 1];
                let weights: [f64; 3] = [prob / 2.0, 1.0 - prob, prob / 2.0];
                let dist: WeightedIndex<f64> = WeightedIndex::new(weights)
                    .map_err(|_| SamplingError::InvalidProbability(prob))?;
                data.iter_mut()
                    .for_each(|x: &mut i64| *x = choices[dist.sample(source)]);
            }
            Distribution::Gaussian { sigma, bound } => {
                let normal: Normal<f64> =
                    Normal::new(0.0, sigma).map_err(|_| SamplingError::InvalidSigma(sigma))?;
                data.iter_mut().for_each(|x: &mut i64| {
                    let mut v: f64 = normal.sample(source);
                    while v.abs() > bound {
                        v = normal.sample(source);
                    }
                    *x = v.round() as i64
                });
            }
            Distribution::ZERO => data.fill(0),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ternary_fixed_has_exact_weight() {
        let mut source: Source = Source::new([0u8; 32]);
        let v: Vec<i64> = Distribution::TernaryFixed(5).sample_vec(16, &mut source).unwrap();
        assert_eq!(v.iter().filter(|x| **x != 0).count(), 5);
        assert!(v.iter().all(|x| (-1..=1).contains(x)));
    }

    #[test]
    fn ternary_fixed_rejects_overweight() {
        let mut source: Source = Source::new([0u8; 32]);
        assert_eq!(
            Distribution::TernaryFixed(9).sample_vec(8, &mut source),
            Err(SamplingError::HammingWeightTooLarge { hw: 9, n: 8 })
        );
    }

    #[test]
    fn ternary_prob_is_ternary() {
        let mut source: Source = Source::new([3u8; 32]);
        let v: Vec<i64> = Distribution::TernaryProb(0.5)
            .sample_vec(256, &mut source)
            .unwrap();
        assert!(v.iter().all(|x| (-1..=1).contains(x)));
        assert!(v.iter().any(|x| *x != 0));
    }

    #[test]
    fn ternary_prob_rejects_bad_probability() {
        let mut source: Source = Source::new([0u8; 32]);
        assert_eq!(
            Distribution::TernaryProb(1.5).sample_vec(4, &mut source),
            Err(SamplingError::InvalidProbability(1.5))
        );
    }

    #[test]
    fn gaussian_respects_bound() {
        let mut source: Source = Source::new([4u8; 32]);
        let sigma: f64 = 3.2;
        let v: Vec<i64> = Distribution::gaussian(sigma)
            .sample_vec(4096, &mut source)
            .unwrap();
        let bound: i64 = (SIX_SIGMA * sigma).round() as i64;
        assert!(v.iter().all(|x| x.abs() <= bound));
        let var: f64 = v.iter().map(|x| (*x * *x) as f64).sum::<f64>() / v.len() as f64;
        assert!((var.sqrt() - sigma).abs() < 0.5, "std={}", var.sqrt());
    }

    #[test]
    fn gaussian_rejects_bad_sigma() {
        assert_eq!(
            Distribution::gaussian(-1.0).validate(8),
            Err(SamplingError::InvalidSigma(-1.0))
        );
    }

    #[test]
    fn max_abs_bounds_samples() {
        assert_eq!(Distribution::ZERO.max_abs(), 0.0);
        assert_eq!(Distribution::TernaryFixed(0).max_abs(), 0.0);
        assert_eq!(Distribution::TernaryFixed(3).max_abs(), 1.0);
        assert_eq!(Distribution::TernaryProb(0.5).max_abs(), 1.0);
        let dist: Distribution = Distribution::gaussian(3.2);
        assert_eq!(dist.max_abs(), 19.0);
        let mut source: Source = Source::new([5u8; 32]);
        let v: Vec<i64> = dist.sample_vec(1024, &mut source).unwrap();
        assert!(v.iter().all(|x| x.abs() as f64 <= dist.max_abs()));
    }
}

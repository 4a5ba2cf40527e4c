use backend::gadget::Gadget;
use backend::modulus::ModulusChain;
use backend::num_bigint::to_f64;
use backend::ring::Ring;
use num_bigint::BigInt;
use num_traits::One;
use sampling::distributions::Distribution;

use crate::error::{CkksError, Result};

pub const DEFAULT_SIGMA: f64 = 3.2;
pub const DEFAULT_GADGET_BASE_BITS: usize = 60;
/// Minimum number of bits by which `P` must exceed `Q_L`.
pub const BIG_MODULUS_MARGIN_BITS: u64 = 16;
/// Bound on `N * max|s|^2`, so that `s^2` is computed exactly in `i64`.
const SECRET_SQUARE_BOUND: f64 = (1u64 << 62) as f64;

/// Immutable scheme configuration.
///
/// Defaults applied by [Parameters::new]:
/// * errors: rounded Gaussian, sigma = [DEFAULT_SIGMA], truncated at six sigma,
/// * secret: ternary with Hamming weight `max(1, N/4)`,
/// * encryption randomness: ternary, non-zero with probability 1/2,
/// * gadget base: `2^min(DEFAULT_GADGET_BASE_BITS, bits(Q_L))`.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameters {
    ring: Ring,
    scaling_factor: f64,
    sigma: f64,
    secret_distribution: Distribution,
    ephemeral_distribution: Distribution,
    gadget: Gadget,
}

impl Parameters {
    pub fn new(
        ring_degree: usize,
        modulus_chain: Vec<BigInt>,
        big_modulus: BigInt,
        scaling_factor: f64,
    ) -> Result<Self> {
        if ring_degree < 2 || !ring_degree.is_power_of_two() {
            return Err(CkksError::InvalidParameters(format!(
                "ring degree {ring_degree} is not a power of two >= 2"
            )));
        }
        let chain: ModulusChain = ModulusChain::new(modulus_chain, big_modulus)?;
        let ring: Ring = Ring::new(ring_degree, chain)?;
        let top_bits: usize = ring.chain().level_modulus(ring.max_level())?.bits() as usize;
        let params: Parameters = Self {
            ring,
            scaling_factor,
            sigma: DEFAULT_SIGMA,
            secret_distribution: Distribution::TernaryFixed((ring_degree / 4).max(1)),
            ephemeral_distribution: Distribution::TernaryProb(0.5),
            gadget: Gadget::new(DEFAULT_GADGET_BASE_BITS.min(top_bits).max(2))?,
        };
        params.validate()?;
        Ok(params)
    }

    /// Builds the chain `[2^base_bits, 2^level_bits, ..., 2^level_bits]` with `levels`
    /// copies of `2^level_bits` and `P = 2^big_modulus_bits`.
    pub fn with_uniform_chain(
        ring_degree: usize,
        base_bits: usize,
        level_bits: usize,
        levels: usize,
        big_modulus_bits: usize,
        scaling_factor: f64,
    ) -> Result<Self> {
        let chain: Vec<BigInt> = std::iter::once(BigInt::one() << base_bits)
            .chain((0..levels).map(|_| BigInt::one() << level_bits))
            .collect();
        Self::new(
            ring_degree,
            chain,
            BigInt::one() << big_modulus_bits,
            scaling_factor,
        )
    }

    pub fn with_sigma(mut self, sigma: f64) -> Result<Self> {
        self.sigma = sigma;
        self.validate()?;
        Ok(self)
    }

    pub fn with_secret_distribution(mut self, dist: Distribution) -> Result<Self> {
        self.secret_distribution = dist;
        self.validate()?;
        Ok(self)
    }

    pub fn with_ephemeral_distribution(mut self, dist: Distribution) -> Result<Self> {
        self.ephemeral_distribution = dist;
        self.validate()?;
        Ok(self)
    }

    pub fn with_gadget_base_bits(mut self, base_bits: usize) -> Result<Self> {
        self.gadget = Gadget::new(base_bits)?;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        let n: usize = self.ring.n();
        let top_bits: u64 = self.ring.chain().level_modulus(self.max_level())?.bits();
        let big_bits: u64 = self.big_modulus().bits();
        if big_bits < top_bits + BIG_MODULUS_MARGIN_BITS {
            return Err(CkksError::InvalidParameters(format!(
                "big modulus has {big_bits} bits, needs at least {}",
                top_bits + BIG_MODULUS_MARGIN_BITS
            )));
        }
        if !(self.scaling_factor.is_finite() && self.scaling_factor > 1.0) {
            return Err(CkksError::InvalidParameters(format!(
                "scaling factor {} must be finite and greater than one",
                self.scaling_factor
            )));
        }
        if self.gadget.base_bits() as u64 > top_bits {
            return Err(CkksError::InvalidParameters(format!(
                "gadget base 2^{} exceeds the top modulus of {top_bits} bits",
                self.gadget.base_bits()
            )));
        }
        [
            self.error_distribution(),
            self.secret_distribution,
            self.ephemeral_distribution,
        ]
        .iter()
        .try_for_each(|dist| dist.validate(n))
        .map_err(|e| CkksError::InvalidParameters(e.to_string()))?;
        let s_max: f64 = self.secret_distribution.max_abs();
        if n as f64 * s_max * s_max >= SECRET_SQUARE_BOUND {
            return Err(CkksError::InvalidParameters(format!(
                "secret coefficients up to {s_max} are too large for degree {n}"
            )));
        }
        Ok(())
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn ring_degree(&self) -> usize {
        self.ring.n()
    }

    /// Number of complex slots, `N/2`.
    pub fn slots(&self) -> usize {
        self.ring.n() >> 1
    }

    /// Number of moduli in the chain.
    pub fn levels(&self) -> usize {
        self.ring.chain().len()
    }

    pub fn max_level(&self) -> usize {
        self.ring.max_level()
    }

    pub fn modulus_chain(&self) -> &ModulusChain {
        self.ring.chain()
    }

    pub fn big_modulus(&self) -> &BigInt {
        self.ring.chain().big_modulus()
    }

    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn error_distribution(&self) -> Distribution {
        Distribution::gaussian(self.sigma)
    }

    pub fn secret_distribution(&self) -> Distribution {
        self.secret_distribution
    }

    pub fn ephemeral_distribution(&self) -> Distribution {
        self.ephemeral_distribution
    }

    pub fn gadget(&self) -> Gadget {
        self.gadget
    }

    /// Returns q_level as a float, the factor a rescale divides the scale by.
    pub fn rescale_factor(&self, level: usize) -> Result<f64> {
        Ok(to_f64(self.ring.chain().modulus(level)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pow2(k: usize) -> BigInt {
        BigInt::one() << k
    }

    #[test]
    fn derived_constants() {
        let params: Parameters =
            Parameters::with_uniform_chain(8, 60, 30, 18, 1200, (1u64 << 30) as f64).unwrap();
        assert_eq!(params.slots(), 4);
        assert_eq!(params.levels(), 19);
        assert_eq!(params.max_level(), 18);
        assert_eq!(params.modulus_chain().level_modulus(18).unwrap(), &pow2(600));
        assert_eq!(params.gadget().base_bits(), 60);
        assert_eq!(params.secret_distribution(), Distribution::TernaryFixed(2));
        assert_eq!(params.rescale_factor(3).unwrap(), (1u64 << 30) as f64);
    }

    #[test]
    fn gadget_base_capped_by_top_modulus() {
        let params: Parameters =
            Parameters::new(8, vec![pow2(20), pow2(10)], pow2(60), 1024.0).unwrap();
        // log2(Q_L) = 30, so Q_L has 31 bits.
        assert_eq!(params.gadget().base_bits(), 31);
        assert!(params.clone().with_gadget_base_bits(32).is_err());
        assert!(params.clone().with_gadget_base_bits(1).is_err());
        assert_eq!(
            params.with_gadget_base_bits(8).unwrap().gadget().base_bits(),
            8
        );
    }

    #[test]
    fn rejects_invalid() {
        let err = |r: Result<Parameters>| matches!(r, Err(CkksError::InvalidParameters(_)));
        assert!(err(Parameters::new(6, vec![pow2(20)], pow2(40), 1024.0)));
        assert!(err(Parameters::new(1, vec![pow2(20)], pow2(40), 1024.0)));
        assert!(err(Parameters::new(8, vec![], pow2(40), 1024.0)));
        assert!(err(Parameters::new(8, vec![pow2(20), BigInt::one()], pow2(40), 1024.0)));
        // P must exceed Q_L by the safety margin.
        assert!(err(Parameters::new(8, vec![pow2(20)], pow2(35), 1024.0)));
        assert!(err(Parameters::new(8, vec![pow2(20)], pow2(40), f64::NAN)));
        let params: Parameters = Parameters::new(8, vec![pow2(20)], pow2(40), 1024.0).unwrap();
        assert!(err(params.clone().with_sigma(-1.0)));
        assert!(err(params.clone().with_secret_distribution(Distribution::TernaryFixed(9))));
        assert!(err(params.with_ephemeral_distribution(Distribution::TernaryProb(1.5))));
    }

    #[test]
    fn secret_must_square_without_overflow() {
        let params: Parameters = Parameters::new(8, vec![pow2(20)], pow2(40), 1024.0).unwrap();
        let wide = params
            .clone()
            .with_secret_distribution(Distribution::gaussian(1e9));
        assert!(matches!(wide, Err(CkksError::InvalidParameters(_))));
        let gaussian: Parameters = params
            .with_secret_distribution(Distribution::gaussian(3.2))
            .unwrap();
        assert_eq!(gaussian.secret_distribution(), Distribution::gaussian(3.2));
    }
}

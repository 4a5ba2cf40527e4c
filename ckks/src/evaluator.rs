use std::sync::Arc;

use backend::automorphism::{GaloisPermutation, conjugation_element};
use backend::poly::RingElement;
use itertools::izip;
use num_bigint::BigInt;
use num_traits::FromPrimitive;
use tracing::{debug, instrument};

use crate::ciphertext::Ciphertext;
use crate::error::{CkksError, Result};
use crate::keys::{
    ConjugationKey, KeySource, KeySwitchingKey, RelinearizationKey, RotationKey, RotationKeys,
};
use crate::parameters::Parameters;
use crate::plaintext::Plaintext;

/// Relative distance under which two scales are treated as equal, and a scale
/// ratio as an integer.
const SCALE_TOLERANCE: f64 = 1e-9;

/// Homomorphic operations. Holds public parameters only.
///
/// Every operation returns a new ciphertext. The `(level, scale)` state moves as follows:
/// * `add`/`sub` keep the level and the larger scale,
/// * `multiply` keeps the level and multiplies scales,
/// * `rescale` drops one level and divides the scale by the dropped modulus,
/// * `rotate`/`conjugate` keep both.
#[derive(Clone, Debug)]
pub struct Evaluator {
    params: Arc<Parameters>,
}

impl Evaluator {
    pub fn new(params: Arc<Parameters>) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Arc<Parameters> {
        &self.params
    }

    #[instrument(skip_all, fields(level = a.level()))]
    pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        check_pair(a, b)?;
        let (fa, fb, scale) = align_scales(a.scale(), b.scale())?;
        let c0: RingElement = scaled(a.c0(), &fa).add(&scaled(b.c0(), &fb))?;
        let c1: RingElement = scaled(a.c1(), &fa).add(&scaled(b.c1(), &fb))?;
        Ok(Ciphertext::new(c0, c1, scale, a.key_id()))
    }

    #[instrument(skip_all, fields(level = a.level()))]
    pub fn sub(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        check_pair(a, b)?;
        let (fa, fb, scale) = align_scales(a.scale(), b.scale())?;
        let c0: RingElement = scaled(a.c0(), &fa).sub(&scaled(b.c0(), &fb))?;
        let c1: RingElement = scaled(a.c1(), &fa).sub(&scaled(b.c1(), &fb))?;
        Ok(Ciphertext::new(c0, c1, scale, a.key_id()))
    }

    #[instrument(skip_all, fields(level = a.level()))]
    pub fn negate(&self, a: &Ciphertext) -> Ciphertext {
        Ciphertext::new(a.c0().neg(), a.c1().neg(), a.scale(), a.key_id())
    }

    #[instrument(skip_all, fields(level = a.level()))]
    pub fn add_plain(&self, a: &Ciphertext, pt: &Plaintext) -> Result<Ciphertext> {
        check_plain(a, pt)?;
        let (fa, fp, scale) = align_scales(a.scale(), pt.scale())?;
        let c0: RingElement = scaled(a.c0(), &fa).add(&scaled(pt.element(), &fp))?;
        let c1: RingElement = scaled(a.c1(), &fa);
        Ok(Ciphertext::new(c0, c1, scale, a.key_id()))
    }

    #[instrument(skip_all, fields(level = a.level()))]
    pub fn sub_plain(&self, a: &Ciphertext, pt: &Plaintext) -> Result<Ciphertext> {
        check_plain(a, pt)?;
        let (fa, fp, scale) = align_scales(a.scale(), pt.scale())?;
        let c0: RingElement = scaled(a.c0(), &fa).sub(&scaled(pt.element(), &fp))?;
        let c1: RingElement = scaled(a.c1(), &fa);
        Ok(Ciphertext::new(c0, c1, scale, a.key_id()))
    }

    #[instrument(skip_all, fields(level = a.level()))]
    pub fn multiply_plain(&self, a: &Ciphertext, pt: &Plaintext) -> Result<Ciphertext> {
        check_plain(a, pt)?;
        let c0: RingElement = a.c0().multiply(pt.element())?;
        let c1: RingElement = a.c1().multiply(pt.element())?;
        Ok(Ciphertext::new(c0, c1, a.scale() * pt.scale(), a.key_id()))
    }

    /// Tensor product followed by relinearization of the `s^2` component.
    /// The result stays at the input level with scale `a.scale() * b.scale()`.
    #[instrument(skip_all, fields(level = a.level()))]
    pub fn multiply(
        &self,
        a: &Ciphertext,
        b: &Ciphertext,
        relin_key: &RelinearizationKey,
    ) -> Result<Ciphertext> {
        check_pair(a, b)?;
        check_key(a, relin_key.key())?;
        if relin_key.key().source() != KeySource::SecretSquare {
            return Err(CkksError::KeyMismatch(format!(
                "expected a relinearization key, got a key from {:?}",
                relin_key.key().source()
            )));
        }

        let d0: RingElement = a.c0().multiply(b.c0())?;
        let d1: RingElement = a.c0().multiply(b.c1())?.add(&a.c1().multiply(b.c0())?)?;
        let d2: RingElement = a.c1().multiply(b.c1())?;

        let (r0, r1) = self.key_switch(&d2, relin_key.key())?;
        let scale: f64 = a.scale() * b.scale();
        debug!(level = a.level(), scale_bits = scale.log2(), "multiplied");
        Ok(Ciphertext::new(d0.add(&r0)?, d1.add(&r1)?, scale, a.key_id()))
    }

    /// Divides by `q_level` and drops to `level - 1`.
    #[instrument(skip_all, fields(level = a.level()))]
    pub fn rescale(&self, a: &Ciphertext) -> Result<Ciphertext> {
        let level: usize = a.level();
        if level == 0 {
            return Err(CkksError::LevelExhausted);
        }
        let chain = self.params.modulus_chain();
        let c0: RingElement = a.c0().mod_switch(chain, level - 1)?;
        let c1: RingElement = a.c1().mod_switch(chain, level - 1)?;
        let scale: f64 = a.scale() / self.params.rescale_factor(level)?;
        debug!(from = level, to = level - 1, scale_bits = scale.log2(), "rescaled");
        Ok(Ciphertext::new(c0, c1, scale, a.key_id()))
    }

    /// Drops to `level` without touching the scale.
    #[instrument(skip_all, fields(level = a.level()))]
    pub fn lower_level(&self, a: &Ciphertext, level: usize) -> Result<Ciphertext> {
        if level > a.level() {
            return Err(CkksError::LevelMismatch {
                left: a.level(),
                right: level,
            });
        }
        let q: &BigInt = self.params.modulus_chain().level_modulus(level)?;
        let c0: RingElement = a.c0().mod_reduce(q, level)?;
        let c1: RingElement = a.c1().mod_reduce(q, level)?;
        Ok(Ciphertext::new(c0, c1, a.scale(), a.key_id()))
    }

    /// Rotates slots left by `step`, taken modulo the number of slots.
    #[instrument(skip_all, fields(level = a.level(), step = step))]
    pub fn rotate(
        &self,
        a: &Ciphertext,
        step: i64,
        rotation_key: &RotationKey,
    ) -> Result<Ciphertext> {
        let step: usize = step.rem_euclid(self.params.slots() as i64) as usize;
        if step == 0 {
            return Ok(a.clone());
        }
        if rotation_key.step() != step {
            return Err(CkksError::KeyMismatch(format!(
                "rotation key for step {} used for step {}",
                rotation_key.step(),
                step
            )));
        }
        self.apply_automorphism(a, rotation_key.gal_el(), rotation_key.key())
    }

    #[instrument(skip_all, fields(level = a.level()))]
    pub fn conjugate(
        &self,
        a: &Ciphertext,
        conjugation_key: &ConjugationKey,
    ) -> Result<Ciphertext> {
        let gal_el: usize = conjugation_element(self.params.ring_degree());
        self.apply_automorphism(a, gal_el, conjugation_key.key())
    }

    /// Returns `a + rot(a, 1) + ... + rot(a, count - 1)`.
    ///
    /// With `count` a power of two and `a` holding slotwise products in its first
    /// `count` slots, each of those slots ends up holding their sum.
    #[instrument(skip_all, fields(level = a.level(), count = count))]
    pub fn sum_rotations(
        &self,
        a: &Ciphertext,
        count: usize,
        keys: &RotationKeys,
    ) -> Result<Ciphertext> {
        let slots: usize = self.params.slots();
        let mut acc: Ciphertext = a.clone();
        for i in 1..count {
            let step: usize = i % slots;
            let rotated: Ciphertext = if step == 0 {
                a.clone()
            } else {
                let key: &RotationKey = keys
                    .get(step)
                    .ok_or(CkksError::MissingRotationKey(step))?;
                self.rotate(a, step as i64, key)?
            };
            acc = self.add(&acc, &rotated)?;
        }
        Ok(acc)
    }

    fn apply_automorphism(
        &self,
        a: &Ciphertext,
        gal_el: usize,
        key: &KeySwitchingKey,
    ) -> Result<Ciphertext> {
        check_key(a, key)?;
        if key.source() != (KeySource::Automorphism { gal_el }) {
            return Err(CkksError::KeyMismatch(format!(
                "automorphism {gal_el} needs a matching key, got a key from {:?}",
                key.source()
            )));
        }
        let perm: GaloisPermutation = self.params.ring().galois_permutation(gal_el)?;
        let c0: RingElement = a.c0().automorphism(&perm)?;
        let c1: RingElement = a.c1().automorphism(&perm)?;
        let (r0, r1) = self.key_switch(&c1, key)?;
        Ok(Ciphertext::new(c0.add(&r0)?, r1, a.scale(), a.key_id()))
    }

    /// Returns `(r0, r1)` modulo `Q_level` with `r0 + r1*s ~ d*s'`, where `s'` is the
    /// key's source secret.
    ///
    /// `d` is decomposed into balanced gadget digits lifted to `P*Q_level`, multiplied
    /// against the key rows, and the sums are divided by `P` with rounding.
    fn key_switch(
        &self,
        d: &RingElement,
        key: &KeySwitchingKey,
    ) -> Result<(RingElement, RingElement)> {
        let level: usize = d.level();
        let chain = self.params.modulus_chain();
        let q: &BigInt = chain.level_modulus(level)?;
        let switching: BigInt = chain.switching_modulus(level)?;
        let gadget = self.params.gadget();
        let digits: usize = gadget.digits(q);
        if digits > key.digits() {
            return Err(CkksError::KeyMismatch(format!(
                "key has {} digits, level {level} needs {digits}",
                key.digits()
            )));
        }

        let decomposed: Vec<RingElement> = gadget.decompose(d, digits, &switching);
        let mut acc0: RingElement = RingElement::zero(d.n(), &switching, level);
        let mut acc1: RingElement = RingElement::zero(d.n(), &switching, level);
        for (di, (b, a)) in izip!(decomposed.iter(), key.rows().iter()) {
            acc0 = acc0.add(&di.multiply(&b.mod_reduce(&switching, level)?)?)?;
            acc1 = acc1.add(&di.multiply(&a.mod_reduce(&switching, level)?)?)?;
        }

        let big: &BigInt = chain.big_modulus();
        Ok((
            acc0.divide_round(big, q, level),
            acc1.divide_round(big, q, level),
        ))
    }
}

fn check_pair(a: &Ciphertext, b: &Ciphertext) -> Result<()> {
    if a.key_id() != b.key_id() {
        return Err(CkksError::KeyMismatch(format!(
            "ciphertexts under keys {} and {}",
            a.key_id(),
            b.key_id()
        )));
    }
    if a.level() != b.level() {
        return Err(CkksError::LevelMismatch {
            left: a.level(),
            right: b.level(),
        });
    }
    Ok(())
}

fn check_plain(a: &Ciphertext, pt: &Plaintext) -> Result<()> {
    if a.level() != pt.level() {
        return Err(CkksError::LevelMismatch {
            left: a.level(),
            right: pt.level(),
        });
    }
    Ok(())
}

fn check_key(a: &Ciphertext, key: &KeySwitchingKey) -> Result<()> {
    if a.key_id() != key.id() {
        return Err(CkksError::KeyMismatch(format!(
            "ciphertext under key {}, switching key from {}",
            a.key_id(),
            key.id()
        )));
    }
    Ok(())
}

/// Integer factors bringing both scales to the larger one, and that scale.
fn align_scales(left: f64, right: f64) -> Result<(Option<BigInt>, Option<BigInt>, f64)> {
    if (left - right).abs() <= SCALE_TOLERANCE * left.max(right) {
        return Ok((None, None, left));
    }
    let ratio = |high: f64, low: f64| -> Result<BigInt> {
        let r: f64 = high / low;
        let k: f64 = r.round();
        if (r - k).abs() > SCALE_TOLERANCE * r {
            return Err(CkksError::ScaleMismatch { left, right });
        }
        BigInt::from_f64(k).ok_or(CkksError::ScaleMismatch { left, right })
    };
    if left > right {
        Ok((None, Some(ratio(left, right)?), left))
    } else {
        Ok((Some(ratio(right, left)?), None, right))
    }
}

fn scaled(x: &RingElement, factor: &Option<BigInt>) -> RingElement {
    match factor {
        Some(k) => x.scalar_multiply(k),
        None => x.clone(),
    }
}

use std::sync::Arc;

use backend::automorphism::{conjugation_element, galois_element};
use backend::poly::{RingElement, negacyclic_mul_i64};
use backend::ring::Ring;
use num_bigint::BigInt;
use rand_core::RngCore;
use sampling::source::{Source, new_seed};
use tracing::{debug, instrument};
use zeroize::Zeroizing;

use crate::error::Result;
use crate::keys::{
    ConjugationKey, KeyId, KeySource, KeySwitchingKey, PublicKey, RelinearizationKey,
    RotationKey, RotationKeys, SecretKey,
};
use crate::parameters::Parameters;

/// Owns the secret key and derives every public and evaluation key from it.
///
/// Randomness is split per role: `xs` for the secret, `xa` for uniform masks,
/// `xe` for errors.
pub struct KeyGenerator {
    params: Arc<Parameters>,
    secret_key: SecretKey,
    public_key: PublicKey,
    source_xa: Source,
    source_xe: Source,
}

impl KeyGenerator {
    /// Samples a fresh key pair from an OS-seeded source.
    pub fn new(params: Arc<Parameters>) -> Result<Self> {
        Self::from_seed(params, new_seed())
    }

    /// Samples a key pair deterministically from `seed`.
    #[instrument(skip_all)]
    pub fn from_seed(params: Arc<Parameters>, seed: [u8; 32]) -> Result<Self> {
        let mut source: Source = Source::new(seed);
        let (_, mut source_xs) = source.branch();
        let (_, mut source_xa) = source.branch();
        let (_, mut source_xe) = source.branch();
        let id: KeyId = KeyId(source.next_u64());

        let coeffs: Vec<i64> = params
            .secret_distribution()
            .sample_vec(params.ring_degree(), &mut source_xs)?;
        let secret_key: SecretKey = SecretKey::new(coeffs, id);
        let public_key: PublicKey =
            generate_public_key(&params, &secret_key, &mut source_xa, &mut source_xe)?;
        debug!(key_id = %id, n = params.ring_degree(), "generated key pair");

        Ok(Self {
            params,
            secret_key,
            public_key,
            source_xa,
            source_xe,
        })
    }

    pub fn params(&self) -> &Arc<Parameters> {
        &self.params
    }

    pub fn id(&self) -> KeyId {
        self.secret_key.id()
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Key switching from `s^2` to `s`.
    #[instrument(skip_all)]
    pub fn generate_relin_key(&mut self) -> Result<RelinearizationKey> {
        let s2: Zeroizing<Vec<i64>> = Zeroizing::new(negacyclic_mul_i64(
            self.secret_key.coeffs(),
            self.secret_key.coeffs(),
        ));
        let key: KeySwitchingKey = self.generate_switching_key(&s2, KeySource::SecretSquare)?;
        debug!(digits = key.digits(), "generated relinearization key");
        Ok(RelinearizationKey { key })
    }

    /// Key for rotating slots left by `step`, taken modulo the number of slots.
    #[instrument(skip_all, fields(step = step))]
    pub fn generate_rotation_key(&mut self, step: i64) -> Result<RotationKey> {
        let step: usize = step.rem_euclid(self.params.slots() as i64) as usize;
        let gal_el: usize = galois_element(step, self.params.ring_degree());
        let key: KeySwitchingKey = self.generate_automorphism_key(gal_el)?;
        debug!(step, gal_el, "generated rotation key");
        Ok(RotationKey { key, step })
    }

    pub fn generate_rotation_keys(&mut self, steps: &[i64]) -> Result<RotationKeys> {
        let mut keys: RotationKeys = RotationKeys::new();
        for step in steps {
            keys.insert(self.generate_rotation_key(*step)?);
        }
        Ok(keys)
    }

    #[instrument(skip_all)]
    pub fn generate_conjugation_key(&mut self) -> Result<ConjugationKey> {
        let gal_el: usize = conjugation_element(self.params.ring_degree());
        let key: KeySwitchingKey = self.generate_automorphism_key(gal_el)?;
        debug!(gal_el, "generated conjugation key");
        Ok(ConjugationKey { key })
    }

    fn generate_automorphism_key(&mut self, gal_el: usize) -> Result<KeySwitchingKey> {
        let perm = self.params.ring().galois_permutation(gal_el)?;
        let s_rot: Zeroizing<Vec<i64>> =
            Zeroizing::new(perm.apply_small(self.secret_key.coeffs()));
        self.generate_switching_key(&s_rot, KeySource::Automorphism { gal_el })
    }

    /// Builds one row per gadget digit of `Q_L`, modulo `P * Q_L`.
    fn generate_switching_key(
        &mut self,
        source_secret: &[i64],
        source: KeySource,
    ) -> Result<KeySwitchingKey> {
        let ring: &Ring = self.params.ring();
        let level: usize = ring.max_level();
        let gadget = self.params.gadget();
        let digits: usize = gadget.digits(ring.chain().level_modulus(level)?);
        let error = self.params.error_distribution();
        let s: &[i64] = self.secret_key.coeffs();
        let source_xa: &mut Source = &mut self.source_xa;
        let source_xe: &mut Source = &mut self.source_xe;

        let rows: Vec<(RingElement, RingElement)> = (0..digits)
            .map(|i| -> Result<(RingElement, RingElement)> {
                let a: RingElement = ring.uniform_switching(level, source_xa)?;
                let e: Vec<i64> = error.sample_vec(ring.n(), source_xe)?;
                let factor: BigInt = ring.chain().big_modulus() * gadget.power(i);
                let b: RingElement = a
                    .multiply_small(s)?
                    .neg()
                    .add_small(&e)?
                    .add_scaled_small(source_secret, &factor)?;
                Ok((b, a))
            })
            .collect::<Result<Vec<(RingElement, RingElement)>>>()?;

        Ok(KeySwitchingKey::new(rows, source, self.secret_key.id()))
    }
}

fn generate_public_key(
    params: &Parameters,
    secret_key: &SecretKey,
    source_xa: &mut Source,
    source_xe: &mut Source,
) -> Result<PublicKey> {
    let ring: &Ring = params.ring();
    let level: usize = ring.max_level();
    let a: RingElement = ring.uniform(level, source_xa)?;
    let e: Vec<i64> = params
        .error_distribution()
        .sample_vec(ring.n(), source_xe)?;
    let p0: RingElement = a.multiply_small(secret_key.coeffs())?.neg().add_small(&e)?;
    Ok(PublicKey::new(p0, a, secret_key.id()))
}

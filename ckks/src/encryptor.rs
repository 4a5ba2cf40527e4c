use std::sync::Arc;

use backend::poly::RingElement;
use backend::ring::Ring;
use num_bigint::BigInt;
use sampling::source::{Source, new_seed};
use tracing::{instrument, trace};
use zeroize::Zeroizing;

use crate::ciphertext::Ciphertext;
use crate::error::Result;
use crate::keys::{PublicKey, SecretKey};
use crate::parameters::Parameters;
use crate::plaintext::Plaintext;

/// Public-key encryption: `(c0, c1) = (p0*u + e0 + m, p1*u + e1)`.
pub struct Encryptor {
    params: Arc<Parameters>,
    public_key: PublicKey,
    source_xu: Source,
    source_xe: Source,
}

impl Encryptor {
    pub fn new(params: Arc<Parameters>, public_key: &PublicKey) -> Self {
        Self::from_seed(params, public_key, new_seed())
    }

    pub fn from_seed(params: Arc<Parameters>, public_key: &PublicKey, seed: [u8; 32]) -> Self {
        let mut source: Source = Source::new(seed);
        let (_, source_xu) = source.branch();
        let (_, source_xe) = source.branch();
        Self {
            params,
            public_key: public_key.clone(),
            source_xu,
            source_xe,
        }
    }

    /// Encrypts `pt` at its own level and scale.
    #[instrument(skip_all, fields(level = pt.level()))]
    pub fn encrypt(&mut self, pt: &Plaintext) -> Result<Ciphertext> {
        let level: usize = pt.level();
        let n: usize = self.params.ring_degree();
        let q: &BigInt = self.params.modulus_chain().level_modulus(level)?;

        let p0: RingElement = self.public_key.p0().mod_reduce(q, level)?;
        let p1: RingElement = self.public_key.p1().mod_reduce(q, level)?;

        let u: Zeroizing<Vec<i64>> = Zeroizing::new(
            self.params
                .ephemeral_distribution()
                .sample_vec(n, &mut self.source_xu)?,
        );
        let e0: Vec<i64> = self
            .params
            .error_distribution()
            .sample_vec(n, &mut self.source_xe)?;
        let e1: Vec<i64> = self
            .params
            .error_distribution()
            .sample_vec(n, &mut self.source_xe)?;

        let c0: RingElement = p0
            .multiply_small(&u)?
            .add_small(&e0)?
            .add(pt.element())?;
        let c1: RingElement = p1.multiply_small(&u)?.add_small(&e1)?;
        trace!(scale = pt.scale(), "encrypted");

        Ok(Ciphertext::new(c0, c1, pt.scale(), self.public_key.id()))
    }
}

/// Secret-key encryption: `(c0, c1) = (-a*s + e + m, a)` with a fresh uniform `a`.
///
/// Borrows the secret key like [Decryptor](crate::Decryptor). The output carries
/// less noise than public-key encryption and is interchangeable with it.
pub struct SecretKeyEncryptor<'a> {
    params: Arc<Parameters>,
    secret_key: &'a SecretKey,
    source_xa: Source,
    source_xe: Source,
}

impl<'a> SecretKeyEncryptor<'a> {
    pub fn new(params: Arc<Parameters>, secret_key: &'a SecretKey) -> Self {
        Self::from_seed(params, secret_key, new_seed())
    }

    pub fn from_seed(
        params: Arc<Parameters>,
        secret_key: &'a SecretKey,
        seed: [u8; 32],
    ) -> Self {
        let mut source: Source = Source::new(seed);
        let (_, source_xa) = source.branch();
        let (_, source_xe) = source.branch();
        Self {
            params,
            secret_key,
            source_xa,
            source_xe,
        }
    }

    /// Encrypts `pt` at its own level and scale.
    #[instrument(skip_all, fields(level = pt.level()))]
    pub fn encrypt(&mut self, pt: &Plaintext) -> Result<Ciphertext> {
        let ring: &Ring = self.params.ring();
        let a: RingElement = ring.uniform(pt.level(), &mut self.source_xa)?;
        let e: Vec<i64> = self
            .params
            .error_distribution()
            .sample_vec(ring.n(), &mut self.source_xe)?;
        let c0: RingElement = a
            .multiply_small(self.secret_key.coeffs())?
            .neg()
            .add_small(&e)?
            .add(pt.element())?;
        trace!(scale = pt.scale(), "encrypted under the secret key");
        Ok(Ciphertext::new(c0, a, pt.scale(), self.secret_key.id()))
    }
}

use std::sync::Arc;

use backend::error::Shape;
use backend::poly::RingElement;
use tracing::instrument;

use crate::ciphertext::Ciphertext;
use crate::error::{CkksError, Result};
use crate::keys::SecretKey;
use crate::parameters::Parameters;
use crate::plaintext::Plaintext;

/// Computes `c0 + c1*s` using a borrowed secret key.
///
/// No integrity check is performed: a ciphertext under another key decrypts to noise.
pub struct Decryptor<'a> {
    params: Arc<Parameters>,
    secret_key: &'a SecretKey,
}

impl<'a> Decryptor<'a> {
    pub fn new(params: Arc<Parameters>, secret_key: &'a SecretKey) -> Self {
        Self { params, secret_key }
    }

    #[instrument(skip_all, fields(level = ct.level()))]
    pub fn decrypt(&self, ct: &Ciphertext) -> Result<Plaintext> {
        let n: usize = self.params.ring_degree();
        if ct.ring_degree() != n {
            let shape: Shape = ct.c0().shape();
            return Err(CkksError::DimensionMismatch {
                left: Shape { degree: n, ..shape },
                right: shape,
            });
        }
        let m: RingElement = ct
            .c1()
            .multiply_small(self.secret_key.coeffs())?
            .add(ct.c0())?;
        Ok(Plaintext::new(m, ct.scale()))
    }
}

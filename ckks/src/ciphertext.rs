use backend::poly::RingElement;

use crate::keys::KeyId;

/// A pair `(c0, c1)` modulo `Q_level` with `c0 + c1 * s ~ scale * m`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ciphertext {
    c0: RingElement,
    c1: RingElement,
    scale: f64,
    key_id: KeyId,
}

impl Ciphertext {
    pub(crate) fn new(c0: RingElement, c1: RingElement, scale: f64, key_id: KeyId) -> Self {
        debug_assert_eq!(c0.level(), c1.level());
        debug_assert_eq!(c0.modulus(), c1.modulus());
        Self {
            c0,
            c1,
            scale,
            key_id,
        }
    }

    pub fn c0(&self) -> &RingElement {
        &self.c0
    }

    pub fn c1(&self) -> &RingElement {
        &self.c1
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn level(&self) -> usize {
        self.c0.level()
    }

    pub fn ring_degree(&self) -> usize {
        self.c0.n()
    }

    /// Identity of the key pair this ciphertext is encrypted under.
    pub fn key_id(&self) -> KeyId {
        self.key_id
    }
}

use std::fmt;

use backend::poly::RingElement;
use utils::map::Map;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Identity shared by all keys drawn from one [KeyGenerator](crate::KeyGenerator) and
/// by every ciphertext encrypted under its public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyId(pub(crate) u64);

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Small secret polynomial `s`, wiped on drop. Not `Clone`: one copy per generator.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    coeffs: Vec<i64>,
    #[zeroize(skip)]
    id: KeyId,
}

impl SecretKey {
    pub(crate) fn new(coeffs: Vec<i64>, id: KeyId) -> Self {
        Self { coeffs, id }
    }

    pub(crate) fn coeffs(&self) -> &[i64] {
        &self.coeffs
    }

    pub fn id(&self) -> KeyId {
        self.id
    }

    pub fn ring_degree(&self) -> usize {
        self.coeffs.len()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("id", &format_args!("{}", self.id))
            .field("ring_degree", &self.coeffs.len())
            .finish_non_exhaustive()
    }
}

/// Encryption of zero `(p0, p1) = (-a*s + e, a)` modulo `Q_L`.
#[derive(Clone, Debug, PartialEq)]
pub struct PublicKey {
    p0: RingElement,
    p1: RingElement,
    id: KeyId,
}

impl PublicKey {
    pub(crate) fn new(p0: RingElement, p1: RingElement, id: KeyId) -> Self {
        Self { p0, p1, id }
    }

    pub fn p0(&self) -> &RingElement {
        &self.p0
    }

    pub fn p1(&self) -> &RingElement {
        &self.p1
    }

    pub fn id(&self) -> KeyId {
        self.id
    }
}

/// Secret a [KeySwitchingKey] switches away from. The target is always `s`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySource {
    /// `s^2`, for relinearization.
    SecretSquare,
    /// `s(X^gal_el)`, for rotations and conjugation.
    Automorphism { gal_el: usize },
}

/// Rows `(b_i, a_i)` modulo `P * Q_L` with `b_i = -a_i*s + e_i + P * B^i * s'`,
/// one per gadget digit, where `s'` is the [KeySource] secret.
#[derive(Clone, Debug, PartialEq)]
pub struct KeySwitchingKey {
    rows: Vec<(RingElement, RingElement)>,
    source: KeySource,
    id: KeyId,
}

impl KeySwitchingKey {
    pub(crate) fn new(rows: Vec<(RingElement, RingElement)>, source: KeySource, id: KeyId) -> Self {
        Self { rows, source, id }
    }

    pub fn rows(&self) -> &[(RingElement, RingElement)] {
        &self.rows
    }

    pub fn digits(&self) -> usize {
        self.rows.len()
    }

    pub fn source(&self) -> KeySource {
        self.source
    }

    pub fn id(&self) -> KeyId {
        self.id
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RelinearizationKey {
    pub(crate) key: KeySwitchingKey,
}

impl RelinearizationKey {
    pub fn key(&self) -> &KeySwitchingKey {
        &self.key
    }

    pub fn id(&self) -> KeyId {
        self.key.id
    }
}

/// Key switching from `s(X^(5^step))` to `s`, rotating slots left by `step`.
#[derive(Clone, Debug, PartialEq)]
pub struct RotationKey {
    pub(crate) key: KeySwitchingKey,
    pub(crate) step: usize,
}

impl RotationKey {
    pub fn key(&self) -> &KeySwitchingKey {
        &self.key
    }

    /// Rotation step in `[0, slots)`.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn gal_el(&self) -> usize {
        match self.key.source {
            KeySource::Automorphism { gal_el } => gal_el,
            KeySource::SecretSquare => 1,
        }
    }

    pub fn id(&self) -> KeyId {
        self.key.id
    }
}

/// Key switching from `s(X^(2N-1))` to `s`.
#[derive(Clone, Debug, PartialEq)]
pub struct ConjugationKey {
    pub(crate) key: KeySwitchingKey,
}

impl ConjugationKey {
    pub fn key(&self) -> &KeySwitchingKey {
        &self.key
    }

    pub fn id(&self) -> KeyId {
        self.key.id
    }
}

/// Rotation keys indexed by their normalized step.
#[derive(Clone, Debug, Default)]
pub struct RotationKeys {
    keys: Map<usize, RotationKey>,
}

impl RotationKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `key`, replacing any key for the same step.
    pub fn insert(&mut self, key: RotationKey) {
        self.keys.insert(key.step, key);
    }

    pub fn get(&self, step: usize) -> Option<&RotationKey> {
        self.keys.get(&step)
    }

    pub fn contains(&self, step: usize) -> bool {
        self.keys.contains_key(&step)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn steps(&self) -> Vec<usize> {
        let mut steps: Vec<usize> = self.keys.keys().copied().collect();
        steps.sort_unstable();
        steps
    }
}

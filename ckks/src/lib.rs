//! Leveled CKKS: approximate arithmetic on encrypted vectors of complex numbers.
//!
//! A session builds one [Parameters] value and shares it through an `Arc`. A
//! [KeyGenerator] owns the [SecretKey] and emits the public and evaluation keys.
//! [Encoder] and [Encryptor] produce ciphertexts, the [Evaluator] transforms them
//! using public material only, and a [Decryptor] borrowing the secret key
//! recovers plaintexts. A [SecretKeyEncryptor] borrows the key the same way for
//! symmetric encryption.
//!
//! Scale management is explicit: [Evaluator::multiply] returns a ciphertext at the
//! same level with the product of the input scales, and callers invoke
//! [Evaluator::rescale] when they want to drop a level.

pub mod ciphertext;
pub mod decryptor;
pub mod encoder;
pub mod encryptor;
pub mod error;
pub mod evaluator;
pub mod keygen;
pub mod keys;
pub mod parameters;
pub mod plaintext;
pub mod slots;

pub use ciphertext::Ciphertext;
pub use decryptor::Decryptor;
pub use encoder::Encoder;
pub use encryptor::{Encryptor, SecretKeyEncryptor};
pub use error::{CkksError, Result};
pub use evaluator::Evaluator;
pub use keygen::KeyGenerator;
pub use keys::{
    ConjugationKey, KeyId, KeySource, KeySwitchingKey, PublicKey, RelinearizationKey,
    RotationKey, RotationKeys, SecretKey,
};
pub use num::complex::Complex64;
pub use parameters::Parameters;
pub use plaintext::Plaintext;
pub use slots::SlotVector;

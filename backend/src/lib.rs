//! Exact arithmetic over `Z_q[X]/(X^N+1)` with arbitrary-width coefficients, plus the
//! floating-point canonical embedding used to move between slot vectors and ring elements.
//!
//! The two numeric domains meet only in the encoder: [dft::embedding] works on `f64`
//! complex values, everything else on [num_bigint::BigInt].

pub mod automorphism;
pub mod dft;
pub mod error;
pub mod gadget;
pub mod modulus;
pub mod num_bigint;
pub mod poly;
pub mod ring;
pub mod sampling;

pub use automorphism::{GaloisPermutation, conjugation_element, galois_element};
pub use dft::DFT;
pub use dft::embedding::EmbeddingTable;
pub use error::{RingError, Shape};
pub use gadget::Gadget;
pub use modulus::{ModulusChain, WordOps};
pub use crate::num_bigint::RoundingDiv;
pub use poly::{RingElement, negacyclic_mul_i64};
pub use ring::Ring;

use backend::error::{RingError, Shape};
use sampling::SamplingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CkksError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: Shape, right: Shape },
    #[error("level mismatch: {left} vs {right}")]
    LevelMismatch { left: usize, right: usize },
    #[error("level exhausted: no modulus left to rescale by")]
    LevelExhausted,
    #[error("slot overflow: {len} values exceed the {slots} available slots")]
    SlotOverflow { len: usize, slots: usize },
    #[error("key mismatch: {0}")]
    KeyMismatch(String),
    #[error("scale mismatch: {left} and {right} are not related by an integer factor")]
    ScaleMismatch { left: f64, right: f64 },
    #[error("missing rotation key for step {0}")]
    MissingRotationKey(usize),
    #[error("encoded coefficients exceed the {modulus_bits}-bit modulus of level {level}")]
    PlaintextOverflow { level: usize, modulus_bits: u64 },
    #[error("non-finite value in slot {0}")]
    NonFiniteValue(usize),
    #[error(transparent)]
    Sampling(#[from] SamplingError),
}

impl From<RingError> for CkksError {
    fn from(err: RingError) -> Self {
        match err {
            RingError::DimensionMismatch { left, right } => {
                CkksError::DimensionMismatch { left, right }
            }
            other => CkksError::InvalidParameters(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CkksError>;

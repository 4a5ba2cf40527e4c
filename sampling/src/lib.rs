pub mod distributions;
pub mod source;

pub use distributions::{Distribution, SamplingError};
pub use source::Source;

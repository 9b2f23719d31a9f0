//! Column type inference.

mod sampler;

pub use sampler::{SampleCounts, TypeSampler};

//! Concrete format implementations.

pub mod binary;
pub mod xml;

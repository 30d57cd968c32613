//! Test utilities shared across crate-level unit tests.

pub mod registry;

pub use registry::serialized;

#![doc = include_str!("RUSTDOC.md")]

pub mod registry;

#[cfg(test)]
pub mod test_support;

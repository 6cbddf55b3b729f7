//! CLI command implementations.

pub mod deals;

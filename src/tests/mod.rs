//! Integration-style tests spanning more than one module of the crate.
//!
//! Per-module invariants live next to their module in a `#[cfg(test)]
//! mod tests`; this directory is for behavior that only shows up once
//! `adjacency`, `graph`, and `propagator` are exercised together.

mod property_tests;
mod smoke_tests;

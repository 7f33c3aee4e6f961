//! npmapi benchmarking suite
//!
//! Benchmarks for the bulk listing decoder and configuration parsing.

pub mod common;

pub use common::*;

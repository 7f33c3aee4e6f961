//! # npmapi-core
//!
//! Core types and utilities shared across all npmapi crates.
//!
//! This crate provides:
//! - NpmError enum for unified error handling
//! - Calendar-day helpers used by the download statistics endpoints
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod utils;

// Re-export commonly used types
pub use error::{NpmError, NpmResult};
pub use utils::date::{day_before, format_day, today_utc, yesterday_utc};

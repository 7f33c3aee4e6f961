//! npm registry client for npmapi
//!
//! This crate talks to the npm registry, the downloads API and npms.io,
//! reshaping their responses into small typed structures. The registry's
//! bulk listing is decoded incrementally from the response body instead of
//! being buffered and parsed as one document.

pub mod client;
pub mod api;
pub mod listing;

// Re-export main types
pub use client::{RegistryClient, ClientConfig, RetryConfig};
pub use api::{
    DayDownloads, DependedCount, PackageDocument, PackageInfo, Person, Score, UserProfile,
};
pub use listing::{
    decode_bulk_listing, listing_channel, split_fragments, ChunkEvent, ChunkSink, ChunkSource,
    ListingDecoder, ListingEntry, ListingStats,
};

use npmapi_core::error::NpmError;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, NpmError>;

//! Streaming decoder for the registry's bulk package listing.
//!
//! `/-/all/static/all.json` is a single JSON object holding one record per
//! package, many megabytes in size. Instead of buffering the body, chunks are
//! pushed through a bounded channel ([`ChunkSink`] → [`ChunkSource`]) into a
//! [`ListingDecoder`], which carves complete `{...}` records out of the byte
//! stream with [`split_fragments`] and keeps the names of packages that were
//! published at least once.

pub mod decoder;
pub mod sink;
pub mod splitter;

pub use decoder::{ListingDecoder, ListingStats};
pub use sink::{forward_response, listing_channel, ChunkEvent, ChunkSink, ChunkSource};
pub use splitter::{split_fragments, ListingEntry, Split};

use npmapi_core::error::NpmError;

use crate::RegistryResult;

/// Decode one listing stream into sorted package names.
///
/// Resolves on [`ChunkEvent::End`]. A transport error, or a sink dropped
/// without ending, rejects the whole listing with no partial result.
pub async fn decode_bulk_listing(mut source: ChunkSource) -> RegistryResult<Vec<String>> {
    let mut decoder = ListingDecoder::new();

    loop {
        match source.next_event().await {
            Some(ChunkEvent::Data(chunk)) => decoder.on_chunk(&chunk),
            Some(ChunkEvent::End) => return Ok(decoder.on_complete()),
            Some(ChunkEvent::Error(error)) => return Err(decoder.on_error(error)),
            None => {
                return Err(decoder.on_error(NpmError::Network {
                    message: "Bulk listing stream closed before completion".to_string(),
                    source: None,
                }))
            }
        }
    }
}

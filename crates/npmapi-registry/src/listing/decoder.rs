//! Stateful decoder for one bulk listing stream.

use npmapi_core::error::NpmError;
use tracing::{debug, info};

use super::splitter::split_fragments;

/// Counters collected while decoding one stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingStats {
    /// Chunks received, including empty ones
    pub chunks: usize,
    /// Bytes received, including the stripped opening brace
    pub bytes: usize,
    /// Fragments that decoded as JSON objects
    pub fragments: usize,
    /// Fragments that passed the publish filter
    pub accepted: usize,
}

/// Incremental decoder turning listing chunks into package names.
///
/// Terminal transitions consume the decoder, so no chunk can be fed after
/// completion or failure.
#[derive(Debug)]
pub struct ListingDecoder {
    /// Bytes seen but not yet resolved into a fragment
    carry: Vec<u8>,
    /// True until the listing's opening brace has been stripped
    first_chunk: bool,
    /// Accepted names, unsorted until completion
    names: Vec<String>,
    stats: ListingStats,
}

impl ListingDecoder {
    /// Create a decoder in the idle state
    pub fn new() -> Self {
        Self {
            carry: Vec::new(),
            first_chunk: true,
            names: Vec::new(),
            stats: ListingStats::default(),
        }
    }

    /// Feed the next chunk of the response body
    pub fn on_chunk(&mut self, chunk: &[u8]) {
        self.stats.chunks += 1;
        self.stats.bytes += chunk.len();

        let mut chunk = chunk;
        if self.first_chunk {
            // An empty chunk carries no opening brace to strip yet
            let Some((_, rest)) = chunk.split_first() else {
                return;
            };
            chunk = rest;
            self.first_chunk = false;
        }

        self.carry.extend_from_slice(chunk);

        let split = split_fragments(&self.carry);
        let consumed = self.carry.len() - split.remainder.len();
        let entries = split.entries;

        self.stats.fragments += entries.len();
        let before = self.names.len();
        self.names
            .extend(entries.into_iter().filter_map(|entry| entry.into_published_name()));
        self.stats.accepted += self.names.len() - before;

        self.carry.drain(..consumed);

        debug!(
            chunk = self.stats.chunks,
            consumed,
            carried = self.carry.len(),
            accepted = self.names.len() - before,
            "processed listing chunk"
        );
    }

    /// Bytes currently carried over, waiting for a closing brace
    pub fn pending_bytes(&self) -> usize {
        self.carry.len()
    }

    /// Counters collected so far
    pub fn stats(&self) -> ListingStats {
        self.stats
    }

    /// Finish the stream, returning the names in lexicographic order
    pub fn on_complete(self) -> Vec<String> {
        let Self {
            carry,
            mut names,
            stats,
            ..
        } = self;

        names.sort_unstable();
        info!(
            packages = names.len(),
            fragments = stats.fragments,
            bytes = stats.bytes,
            unresolved = carry.len(),
            "bulk listing decoded"
        );
        names
    }

    /// Fail the stream; accumulated names are discarded
    pub fn on_error(self, error: NpmError) -> NpmError {
        debug!(
            discarded = self.names.len(),
            bytes = self.stats.bytes,
            "bulk listing failed: {}",
            error
        );
        error
    }
}

impl Default for ListingDecoder {
    fn default() -> Self {
        Self::new()
    }
}

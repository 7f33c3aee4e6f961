//! Bounded single-producer, single-consumer channel between the HTTP body
//! and the listing decoder.

use bytes::Bytes;
use npmapi_core::error::NpmError;
use tokio::sync::mpsc;
use tracing::debug;

use crate::RegistryResult;

/// One event pushed by the transport side
#[derive(Debug)]
pub enum ChunkEvent {
    /// Next chunk of the response body, in arrival order
    Data(Bytes),
    /// The body finished cleanly
    End,
    /// The body failed; the listing must be rejected
    Error(NpmError),
}

/// Transport-facing half of the listing channel.
///
/// `end` and `error` consume the sink, so each terminal signal is sent at
/// most once. Dropping the sink without either is reported to the decoder
/// as a transport failure.
#[derive(Debug)]
pub struct ChunkSink {
    tx: mpsc::Sender<ChunkEvent>,
}

/// Decoder-facing half of the listing channel
#[derive(Debug)]
pub struct ChunkSource {
    rx: mpsc::Receiver<ChunkEvent>,
}

/// Create a listing channel holding at most `capacity` undelivered events
pub fn listing_channel(capacity: usize) -> (ChunkSink, ChunkSource) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ChunkSink { tx }, ChunkSource { rx })
}

impl ChunkSink {
    /// Forward one chunk, waiting for room when the decoder lags behind
    pub async fn write(&self, chunk: Bytes) -> RegistryResult<()> {
        self.tx
            .send(ChunkEvent::Data(chunk))
            .await
            .map_err(|_| NpmError::Network {
                message: "Listing decoder stopped receiving".to_string(),
                source: None,
            })
    }

    /// Signal a clean end of the body
    pub async fn end(self) {
        // A closed receiver means the decode was abandoned; nothing left to notify
        let _ = self.tx.send(ChunkEvent::End).await;
    }

    /// Signal a transport failure
    pub async fn error(self, error: NpmError) {
        let _ = self.tx.send(ChunkEvent::Error(error)).await;
    }
}

impl ChunkSource {
    /// Receive the next event, or `None` once the sink is gone
    pub async fn next_event(&mut self) -> Option<ChunkEvent> {
        self.rx.recv().await
    }
}

/// Pump an HTTP response body into the sink until it ends or fails
pub async fn forward_response(mut response: reqwest::Response, sink: ChunkSink) {
    let mut forwarded = 0usize;

    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                forwarded += chunk.len();
                if sink.write(chunk).await.is_err() {
                    debug!(forwarded, "listing decoder went away, dropping response body");
                    return;
                }
            }
            Ok(None) => {
                debug!(forwarded, "listing response body complete");
                sink.end().await;
                return;
            }
            Err(e) => {
                sink.error(NpmError::network(
                    format!("Failed to read bulk listing after {} bytes: {}", forwarded, e),
                    e,
                ))
                .await;
                return;
            }
        }
    }
}

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use genstream_sdk::GenerationRequest;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_stream::wrappers::ReceiverStream;

use crate::domain::encoder::FrameEncoder;
use crate::domain::error::RelayError;
use crate::domain::upstream::{ChunkStream, UpstreamClient};

/// Encoded frames of one relay operation, in upstream order.
///
/// Ends after the sentinel frame on success. An `Err` item means the upstream failed after the
/// stream was opened; nothing follows it and no sentinel was produced.
pub type FrameStream = ReceiverStream<Result<Bytes, RelayError>>;

/// Couples one upstream generation request to one downstream consumer.
pub struct RelayService {
    upstream: Arc<dyn UpstreamClient>,
    model: String,
    deadline: Option<Duration>,
}

impl RelayService {
    #[must_use]
    pub fn new(upstream: Arc<dyn UpstreamClient>, model: String, deadline: Option<Duration>) -> Self {
        Self {
            upstream,
            model,
            deadline,
        }
    }

    /// Open the upstream request for `prompt` and start relaying it.
    ///
    /// The upstream is drained by a dedicated task that only requests the next chunk once the
    /// consumer has taken the previous frame, so at most one frame is ever buffered. Dropping the
    /// returned stream aborts the upstream read.
    ///
    /// # Errors
    /// Returns the preflight failure of the upstream request, or
    /// [`RelayError::DeadlineExceeded`] if the deadline elapsed while connecting.
    pub async fn open(&self, prompt: String) -> Result<FrameStream, RelayError> {
        let deadline = self.deadline.map(|d| (Instant::now() + d, d.as_secs()));
        let request = GenerationRequest {
            model: self.model.clone(),
            prompt,
        };

        let chunks = within(deadline, self.upstream.open(&request)).await??;

        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(pump(chunks, tx, deadline));
        Ok(ReceiverStream::new(rx))
    }
}

type FrameSender = mpsc::Sender<Result<Bytes, RelayError>>;

async fn pump(mut chunks: ChunkStream, tx: FrameSender, deadline: Option<(Instant, u64)>) {
    let mut encoder = FrameEncoder::new();
    let mut frames: usize = 0;
    let mut bytes: usize = 0;

    loop {
        // The slot must be free before the next chunk is requested.
        let reserved = tokio::select! {
            biased;
            () = tx.closed() => {
                tracing::debug!(frames, "consumer disconnected; aborting upstream read");
                return;
            }
            reserved = within(deadline, tx.reserve()) => reserved,
        };
        let permit = match reserved {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => {
                tracing::debug!(frames, "consumer disconnected; aborting upstream read");
                return;
            }
            Err(e) => {
                // The consumer is not draining; closing the channel ends the response
                // without a sentinel.
                tracing::warn!(frames, error = %e, "relay deadline hit while writing");
                return;
            }
        };

        let next = tokio::select! {
            biased;
            () = tx.closed() => {
                tracing::debug!(frames, "consumer disconnected; aborting upstream read");
                return;
            }
            next = within(deadline, chunks.next()) => next,
        };

        let chunk = match next {
            Ok(Some(Ok(chunk))) => chunk,
            Ok(None) => {
                let last = encoder.finish();
                match &last {
                    Ok(_) => tracing::debug!(frames, bytes, "upstream completed; sending sentinel"),
                    Err(e) => tracing::warn!(frames, error = %e, "upstream completed uncleanly"),
                }
                permit.send(last);
                return;
            }
            Ok(Some(Err(e))) | Err(e) => {
                tracing::warn!(frames, bytes, error = %e, "relay failed mid-stream");
                permit.send(Err(e));
                return;
            }
        };

        frames += 1;
        bytes += chunk.len();
        tracing::trace!(frame = frames, len = chunk.len(), "frame encoded");
        permit.send(Ok(encoder.encode(&chunk)));
    }
}

/// Run `fut` under the operation's end-to-end deadline, if any.
async fn within<F: Future>(
    deadline: Option<(Instant, u64)>,
    fut: F,
) -> Result<F::Output, RelayError> {
    match deadline {
        Some((at, secs)) => tokio::time::timeout_at(at, fut)
            .await
            .map_err(|_| RelayError::DeadlineExceeded { secs }),
        None => Ok(fut.await),
    }
}

use genstream_sdk::wire::{DATA_FIELD, FRAME_TERMINATOR, SENTINEL};
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Reassembles the document carried by a relay's framed stream.
///
/// Feed it the response body in whatever pieces the transport delivers. Bytes are buffered until
/// a whole frame is delimited, so frames and multi-byte characters may be split anywhere. Once
/// the sentinel frame is seen the decoder is complete and ignores everything that follows.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    buffer: Vec<u8>,
    /// Prefix of `buffer` already searched for a terminator.
    scanned: usize,
    text: String,
    frames: usize,
    complete: bool,
}

impl StreamDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the next piece of the body.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidFrame`] if a delimited frame is not valid UTF-8.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), ClientError> {
        if self.complete {
            return Ok(());
        }
        self.buffer.extend_from_slice(bytes);

        while let Some(end) = self.next_terminator() {
            let block: Vec<u8> = self.buffer.drain(..end + FRAME_TERMINATOR.len()).collect();
            self.scanned = 0;

            let block = std::str::from_utf8(&block[..end])
                .map_err(|e| ClientError::InvalidFrame(format!("frame is not UTF-8: {e}")))?;

            let Some(payload) = frame_payload(block) else {
                continue;
            };
            if payload == SENTINEL {
                tracing::trace!(frames = self.frames, "completion sentinel received");
                self.complete = true;
                self.buffer.clear();
                return Ok(());
            }
            self.frames += 1;
            self.text.push_str(&payload);
        }
        Ok(())
    }

    /// `true` once the completion sentinel has been seen.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Number of payload frames accumulated so far, sentinel excluded.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Text accumulated so far.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// End of body: return the reconstructed text.
    ///
    /// # Errors
    /// Returns [`ClientError::TruncatedStream`] when the sentinel was never seen, whatever the
    /// accumulated text looks like.
    pub fn finish_text(self) -> Result<String, ClientError> {
        if !self.complete {
            return Err(ClientError::TruncatedStream {
                frames: self.frames,
                cause: None,
            });
        }
        Ok(self.text)
    }

    /// End of body: parse the reconstructed text as one JSON document.
    ///
    /// # Errors
    /// Returns [`ClientError::TruncatedStream`] without the sentinel, and
    /// [`ClientError::MalformedDocument`] if the completed text does not parse as `T`.
    pub fn finish<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        let text = self.finish_text()?;
        serde_json::from_str(&text).map_err(ClientError::MalformedDocument)
    }

    fn next_terminator(&mut self) -> Option<usize> {
        // A terminator may straddle the previous scan boundary.
        let from = self.scanned.saturating_sub(FRAME_TERMINATOR.len() - 1);
        let found = self.buffer[from..]
            .windows(FRAME_TERMINATOR.len())
            .position(|w| w == FRAME_TERMINATOR)
            .map(|pos| from + pos);
        if found.is_none() {
            self.scanned = self.buffer.len();
        }
        found
    }
}

/// Payload of one frame, without its terminator. `None` when the frame has no data line.
fn frame_payload(block: &str) -> Option<String> {
    let mut lines = Vec::new();
    for line in block.split('\n') {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == DATA_FIELD {
            lines.push(value);
        }
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

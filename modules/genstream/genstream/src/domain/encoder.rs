use bytes::Bytes;
use genstream_sdk::wire;

use crate::domain::error::RelayError;

/// Turns upstream chunks into downstream frames, one frame per chunk.
///
/// Chunk bytes are decoded as UTF-8 incrementally. A multi-byte sequence cut by a chunk
/// boundary is held back and completed by the next chunk, so every frame carries valid text
/// even when its payload ends up empty. Invalid bytes decode to U+FFFD.
#[derive(Debug, Default)]
pub(crate) struct FrameEncoder {
    pending: Vec<u8>,
}

impl FrameEncoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Encode one chunk into exactly one frame.
    pub(crate) fn encode(&mut self, chunk: &[u8]) -> Bytes {
        let text = self.decode(chunk);
        Bytes::from(wire::frame(&text))
    }

    /// Close the stream after a clean end-of-body.
    ///
    /// # Errors
    /// Returns [`RelayError::MidStream`] when the body ended inside a multi-byte sequence; the
    /// document is cut short and no sentinel must be sent.
    pub(crate) fn finish(self) -> Result<Bytes, RelayError> {
        if self.pending.is_empty() {
            Ok(Bytes::from_static(wire::SENTINEL_FRAME.as_bytes()))
        } else {
            Err(RelayError::MidStream {
                detail: format!(
                    "upstream body ended inside a UTF-8 sequence ({} dangling bytes)",
                    self.pending.len()
                ),
            })
        }
    }

    fn decode(&mut self, chunk: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(chunk);

        let mut out = String::with_capacity(input.len());
        let mut rest = input.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, tail) = rest.split_at(err.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    if let Some(invalid) = err.error_len() {
                        out.push(char::REPLACEMENT_CHARACTER);
                        rest = &tail[invalid..];
                    } else {
                        self.pending = tail.to_vec();
                        break;
                    }
                }
            }
        }
        out
    }
}

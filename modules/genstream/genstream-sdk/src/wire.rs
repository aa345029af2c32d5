use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Downstream framing
// ---------------------------------------------------------------------------

/// Field name carrying frame payload lines.
pub const DATA_FIELD: &str = "data";

/// Marker written at the start of every payload line.
pub const DATA_MARKER: &str = "data: ";

/// Frames end with an empty line.
pub const FRAME_TERMINATOR: &[u8] = b"\n\n";

/// Payload of the terminal frame.
pub const SENTINEL: &str = "[DONE]";

/// The terminal frame as it appears on the wire.
pub const SENTINEL_FRAME: &str = "data: [DONE]\n\n";

/// Content type of the relay's streaming response.
pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream";

/// Identifies who produced an error response: `relay` or `upstream`.
pub const ERROR_SOURCE_HEADER: &str = "x-genstream-error-source";

/// Render one frame around `payload`.
///
/// Each line of the payload gets its own `data: ` marker so that newlines inside a chunk can
/// never produce the blank line that terminates the frame. Decoders rejoin the lines with `\n`.
#[must_use]
pub fn frame(payload: &str) -> String {
    let mut out = String::with_capacity(payload.len() + DATA_MARKER.len() + 2);
    for line in payload.split('\n') {
        out.push_str(DATA_MARKER);
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out
}

// ---------------------------------------------------------------------------
// Upstream request
// ---------------------------------------------------------------------------

/// Body POSTed to the generative backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
}

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use futures::{StreamExt, stream};
use genstream_sdk::wire::EVENT_STREAM_CONTENT_TYPE;
use http::header;

use crate::api::rest::error::domain_error_response;
use crate::domain::error::RelayError;
use crate::domain::relay::FrameStream;

/// Write a relay's frames to the downstream response.
///
/// Nothing is committed until the first frame exists: a failure before it becomes an ordinary
/// error status. After that the status is fixed, so a later failure ends the body without a
/// sentinel and the consumer sees an unterminated stream.
pub(crate) async fn event_stream_response(mut frames: FrameStream, instance: &str) -> Response {
    let first = match frames.next().await {
        Some(Ok(frame)) => frame,
        Some(Err(err)) => {
            tracing::warn!(instance, error = %err, "relay failed before the first frame");
            return domain_error_response(&err, instance);
        }
        None => {
            let err = RelayError::Internal {
                message: "relay ended without producing a frame".into(),
            };
            return domain_error_response(&err, instance);
        }
    };

    let body = Body::from_stream(stream::once(async move { Ok(first) }).chain(frames));

    (
        [
            (header::CONTENT_TYPE, EVENT_STREAM_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        [("x-accel-buffering", "no")],
        body,
    )
        .into_response()
}

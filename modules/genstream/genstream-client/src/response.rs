use std::pin::Pin;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::decoder::StreamDecoder;
use crate::error::ClientError;

pub type BoxStream<T> = Pin<Box<dyn Stream<Item = T> + Send + 'static>>;

/// An accepted relay response whose framed body has not been read yet.
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: BoxStream<Result<Bytes, ClientError>>,
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body", &"BoxStream(..)")
            .finish()
    }
}

impl Response {
    pub(crate) fn new(
        status: StatusCode,
        headers: HeaderMap,
        body: BoxStream<Result<Bytes, ClientError>>,
    ) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The raw framed body, for callers that render frames as they arrive.
    #[must_use]
    pub fn into_stream(self) -> BoxStream<Result<Bytes, ClientError>> {
        self.body
    }

    /// Read the body through a [`StreamDecoder`], stopping at the sentinel.
    ///
    /// # Errors
    /// A transport failure while reading is reported as [`ClientError::TruncatedStream`]
    /// carrying the frames seen so far; frame errors are passed through.
    pub async fn decode(mut self) -> Result<StreamDecoder, ClientError> {
        let mut decoder = StreamDecoder::new();
        while let Some(chunk) = self.body.next().await {
            match chunk {
                Ok(bytes) => {
                    decoder.feed(&bytes)?;
                    if decoder.is_complete() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(frames = decoder.frames(), error = %e, "relay stream broke");
                    return Err(ClientError::TruncatedStream {
                        frames: decoder.frames(),
                        cause: Some(e.to_string()),
                    });
                }
            }
        }
        Ok(decoder)
    }

    /// Reconstructed text of a completed stream.
    ///
    /// # Errors
    /// See [`Response::decode`] and [`StreamDecoder::finish_text`].
    pub async fn text(self) -> Result<String, ClientError> {
        self.decode().await?.finish_text()
    }

    /// Reconstructed JSON document of a completed stream.
    ///
    /// # Errors
    /// See [`Response::decode`] and [`StreamDecoder::finish`].
    pub async fn document<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        self.decode().await?.finish()
    }
}

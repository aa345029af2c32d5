use std::time::Duration;

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use genstream_sdk::GenerationRequest;

use crate::config::UpstreamConfig;
use crate::domain::error::RelayError;

/// Upstream body as it arrives: chunk boundaries carry no meaning.
pub type ChunkStream = BoxStream<'static, Result<Bytes, RelayError>>;

/// Longest upstream error body echoed into a `RelayError`.
const MAX_ERROR_DETAIL: usize = 512;

/// Opens one generation request against the backend.
#[async_trait::async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Start the request and hand back its body once the backend accepted it.
    ///
    /// # Errors
    /// Fails before yielding any chunk when the backend is unreachable or answers with a
    /// non-2xx status.
    async fn open(&self, request: &GenerationRequest) -> Result<ChunkStream, RelayError>;
}

/// [`UpstreamClient`] speaking HTTP to an Ollama-style `/api/generate` endpoint.
pub struct HttpUpstreamClient {
    url: String,
    http: reqwest::Client,
}

impl HttpUpstreamClient {
    /// # Errors
    /// Returns [`RelayError::Internal`] if the HTTP client cannot be constructed.
    pub fn new(config: &UpstreamConfig) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| RelayError::Internal {
                message: format!("failed to build upstream HTTP client: {e}"),
            })?;
        Ok(Self {
            url: config.url.clone(),
            http,
        })
    }
}

#[async_trait::async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn open(&self, request: &GenerationRequest) -> Result<ChunkStream, RelayError> {
        let body = serde_json::to_vec(request).map_err(|e| RelayError::Internal {
            message: format!("failed to encode generation request: {e}"),
        })?;

        let resp = self
            .http
            .post(&self.url)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| RelayError::UpstreamUnavailable {
                detail: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let mut detail = resp.text().await.unwrap_or_default();
            if detail.len() > MAX_ERROR_DETAIL {
                let cut = (0..=MAX_ERROR_DETAIL)
                    .rev()
                    .find(|i| detail.is_char_boundary(*i))
                    .unwrap_or(0);
                detail.truncate(cut);
            }
            tracing::warn!(%status, url = %self.url, "upstream rejected generation request");
            return Err(RelayError::UpstreamRejected {
                status: status.as_u16(),
                detail,
            });
        }

        tracing::debug!(%status, model = %request.model, "upstream stream opened");

        Ok(resp
            .bytes_stream()
            .map_err(|e| RelayError::MidStream {
                detail: e.to_string(),
            })
            .boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config(url: String) -> UpstreamConfig {
        UpstreamConfig {
            url,
            ..UpstreamConfig::default()
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            model: "gemma2:2b".into(),
            prompt: "say hi".into(),
        }
    }

    #[tokio::test]
    async fn posts_model_and_prompt_and_streams_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate")
                    .header("content-type", "application/json")
                    .json_body(json!({"model": "gemma2:2b", "prompt": "say hi"}));
                then.status(200).body(r#"{"word":"hi"}"#);
            })
            .await;

        let client = HttpUpstreamClient::new(&config(server.url("/api/generate"))).unwrap();
        let chunks: Vec<Bytes> = client
            .open(&request())
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(chunks.concat(), br#"{"word":"hi"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_fails_before_streaming() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(500).body("model crashed");
            })
            .await;

        let client = HttpUpstreamClient::new(&config(server.url("/api/generate"))).unwrap();
        let Err(err) = client.open(&request()).await else {
            panic!("expected preflight failure");
        };
        match err {
            RelayError::UpstreamRejected { status, detail } => {
                assert_eq!(status, 500);
                assert_eq!(detail, "model crashed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_backend_is_preflight_failure() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = HttpUpstreamClient::new(&config(format!(
            "http://127.0.0.1:{port}/api/generate"
        )))
        .unwrap();
        let Err(err) = client.open(&request()).await else {
            panic!("expected preflight failure");
        };
        assert!(err.is_preflight(), "{err:?}");
    }
}

use std::time::Duration;

use futures::TryStreamExt;
use genstream_sdk::wire::{ERROR_SOURCE_HEADER, EVENT_STREAM_CONTENT_TYPE};
use genstream_sdk::{
    AlphabetCard, AlphabetCardRequest, PortfolioRequest, ResumeAnalysisRequest, SpeakingPrompt,
    SpeakingPromptRequest, VoiceFeedback, VoiceFeedbackRequest, WordCard, WordCardRequest, routes,
};
use http::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, ErrorSource};
use crate::response::Response;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for [`GenStreamClient`].
#[derive(Debug, Clone)]
pub struct GenStreamClientConfig {
    pub base_url: String,
    /// End-to-end limit for one generation, body included.
    pub timeout: Duration,
}

impl GenStreamClientConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create configuration from environment variables
    ///
    /// Reads:
    /// - `GENSTREAM_BASE_URL`: relay base URL (default: `http://localhost:8080`)
    /// - `GENSTREAM_TIMEOUT_SECS`: optional end-to-end timeout in seconds
    ///
    /// # Errors
    /// Returns [`ClientError::BuildError`] if `GENSTREAM_TIMEOUT_SECS` is not a number.
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url =
            std::env::var("GENSTREAM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let mut config = Self::new(base_url);

        if let Ok(raw) = std::env::var("GENSTREAM_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                ClientError::BuildError(format!("invalid GENSTREAM_TIMEOUT_SECS '{raw}': {e}"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

impl Default for GenStreamClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Calls relay endpoints and reconstructs the documents they stream.
pub struct GenStreamClient {
    base_url: String,
    http: reqwest::Client,
}

impl GenStreamClient {
    /// # Errors
    /// Returns [`ClientError::BuildError`] if the HTTP client cannot be constructed.
    pub fn from_config(config: GenStreamClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::BuildError(e.to_string()))?;

        let mut base_url = config.base_url;
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { base_url, http })
    }

    /// POST `req` to `path` and hand back the accepted stream unread.
    ///
    /// # Errors
    /// Returns [`ClientError::Preflight`] when the relay answers with an error status, and a
    /// connection, timeout or serialization error when the request cannot be made.
    pub async fn execute<Req>(&self, path: &str, req: &Req) -> Result<Response, ClientError>
    where
        Req: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let body =
            serde_json::to_vec(req).map_err(|e| ClientError::Serialization(e.to_string()))?;

        let resp = self
            .http
            .post(&url)
            .header(http::header::CONTENT_TYPE, "application/json")
            .header(http::header::ACCEPT, EVENT_STREAM_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout(e.to_string())
                } else if e.is_connect() {
                    ClientError::Connection(e.to_string())
                } else {
                    ClientError::Reqwest(e)
                }
            })?;

        let status = resp.status();
        let headers = resp.headers().clone();

        if !status.is_success() {
            let origin = parse_error_source_header(&headers);
            let body = resp.bytes().await.unwrap_or_default();
            tracing::debug!(%status, %origin, path, "relay rejected request");
            return Err(ClientError::Preflight {
                status,
                origin,
                body,
            });
        }

        let stream = resp.bytes_stream().map_err(ClientError::Reqwest);
        Ok(Response::new(status, headers, Box::pin(stream)))
    }

    /// Generate and parse one JSON document.
    ///
    /// # Errors
    /// Any error of [`GenStreamClient::execute`] or [`Response::document`].
    pub async fn generate<Req, Doc>(&self, path: &str, req: &Req) -> Result<Doc, ClientError>
    where
        Req: Serialize + ?Sized,
        Doc: DeserializeOwned,
    {
        self.execute(path, req).await?.document().await
    }

    /// Generate and return the reconstructed text without parsing it.
    ///
    /// # Errors
    /// Any error of [`GenStreamClient::execute`] or [`Response::text`].
    pub async fn generate_text<Req>(&self, path: &str, req: &Req) -> Result<String, ClientError>
    where
        Req: Serialize + ?Sized,
    {
        self.execute(path, req).await?.text().await
    }

    /// # Errors
    /// See [`GenStreamClient::generate`].
    pub async fn word_card(&self, req: &WordCardRequest) -> Result<WordCard, ClientError> {
        self.generate(routes::WORD_CARD, req).await
    }

    /// # Errors
    /// See [`GenStreamClient::generate`].
    pub async fn speaking_prompt(
        &self,
        req: &SpeakingPromptRequest,
    ) -> Result<SpeakingPrompt, ClientError> {
        self.generate(routes::SPEAKING_PROMPT, req).await
    }

    /// # Errors
    /// See [`GenStreamClient::generate`].
    pub async fn alphabet_card(
        &self,
        req: &AlphabetCardRequest,
    ) -> Result<AlphabetCard, ClientError> {
        self.generate(routes::ALPHABET_CARD, req).await
    }

    /// # Errors
    /// See [`GenStreamClient::generate`].
    pub async fn voice_feedback(
        &self,
        req: &VoiceFeedbackRequest,
    ) -> Result<VoiceFeedback, ClientError> {
        self.generate(routes::VOICE_FEEDBACK, req).await
    }

    /// The analysis is prose, so it is returned as text.
    ///
    /// # Errors
    /// See [`GenStreamClient::generate_text`].
    pub async fn analyze_resume(&self, req: &ResumeAnalysisRequest) -> Result<String, ClientError> {
        self.generate_text(routes::ANALYZE, req).await
    }

    /// Returns the generated HTML page.
    ///
    /// # Errors
    /// See [`GenStreamClient::generate_text`].
    pub async fn portfolio(&self, req: &PortfolioRequest) -> Result<String, ClientError> {
        self.generate_text(routes::PORTFOLIO, req).await
    }
}

/// Parse the `x-genstream-error-source` header to determine error origin
fn parse_error_source_header(headers: &HeaderMap) -> ErrorSource {
    headers
        .get(ERROR_SOURCE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map_or(ErrorSource::Unknown, |s| match s.to_ascii_lowercase().as_str() {
            "relay" => ErrorSource::Relay,
            "upstream" => ErrorSource::Upstream,
            _ => ErrorSource::Unknown,
        })
}

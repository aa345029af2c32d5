//! genstream relay.
//!
//! Bridges a generative backend that streams its answer as raw byte chunks to a consumer that
//! needs one complete document:
//!
//! ```text
//! backend -> UpstreamClient -> FrameEncoder -> relay task -> HTTP response
//! ```
//!
//! Every upstream chunk becomes exactly one `data: ...\n\n` frame; a clean end of the upstream
//! body appends `data: [DONE]\n\n`. Upstream failures before streaming starts are answered with
//! an RFC 9457 problem response. Failures after the first frame cut the stream without the
//! sentinel, which consumers must treat as truncation.
//!
//! # Example
//!
//! ```no_run
//! use genstream::{GenStreamConfig, GenStreamModule};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GenStreamConfig::load(None)?;
//! let app = GenStreamModule::from_config(&config)?.router()?;
//! let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

mod api;
mod config;
mod domain;
mod module;

pub use config::{
    ENV_PREFIX, GenStreamConfig, LogFormat, LoggingConfig, RelayConfig, ServerConfig,
    UpstreamConfig,
};
pub use domain::error::RelayError;
pub use domain::prompt::PromptTemplate;
pub use domain::relay::{FrameStream, RelayService};
pub use domain::upstream::{ChunkStream, HttpUpstreamClient, UpstreamClient};
pub use module::{AppState, GenStreamModule};

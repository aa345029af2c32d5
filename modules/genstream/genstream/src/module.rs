use std::sync::Arc;

use axum::Router;

use crate::api::rest::routes;
use crate::config::GenStreamConfig;
use crate::domain::error::RelayError;
use crate::domain::relay::RelayService;
use crate::domain::upstream::{HttpUpstreamClient, UpstreamClient};

/// Per-process state shared by the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub(crate) relay: Arc<RelayService>,
}

/// Assembled relay: the upstream client, the relay service and its HTTP surface.
pub struct GenStreamModule {
    state: AppState,
    cors_origin: Option<String>,
}

impl GenStreamModule {
    /// Wire the module against the configured HTTP backend.
    ///
    /// # Errors
    /// Returns [`RelayError::Internal`] if the upstream HTTP client cannot be built.
    pub fn from_config(config: &GenStreamConfig) -> Result<Self, RelayError> {
        let upstream = HttpUpstreamClient::new(&config.upstream)?;
        Ok(Self::with_upstream(Arc::new(upstream), config))
    }

    /// Wire the module against any [`UpstreamClient`].
    #[must_use]
    pub fn with_upstream(upstream: Arc<dyn UpstreamClient>, config: &GenStreamConfig) -> Self {
        let relay = RelayService::new(
            upstream,
            config.upstream.model.clone(),
            config.relay.deadline(),
        );
        Self {
            state: AppState {
                relay: Arc::new(relay),
            },
            cors_origin: config.server.cors_origin.clone(),
        }
    }

    /// The relay's HTTP router.
    ///
    /// # Errors
    /// Returns [`RelayError::Internal`] when the configured CORS origin is not a valid header value.
    pub fn router(&self) -> Result<Router, RelayError> {
        let cors = routes::cors_layer(self.cors_origin.as_deref())?;
        Ok(routes::router(self.state.clone(), cors))
    }
}

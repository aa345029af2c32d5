use axum::Json;
use axum::extract::Extension;
use axum::extract::rejection::JsonRejection;
use axum::response::Response;
use http::StatusCode;

use crate::api::rest::error::domain_error_response;
use crate::api::rest::transport::event_stream_response;
use crate::domain::error::RelayError;
use crate::domain::prompt::PromptTemplate;
use crate::module::AppState;

/// Relay any [`PromptTemplate`] request to the backend as a framed event stream.
pub async fn relay_generation<T: PromptTemplate>(
    Extension(state): Extension<AppState>,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<Response, Response> {
    let Json(req) = payload.map_err(|rejection| {
        let err = RelayError::Validation {
            detail: rejection.body_text(),
        };
        domain_error_response(&err, T::ROUTE)
    })?;
    req.validate()
        .map_err(|e| domain_error_response(&e, T::ROUTE))?;

    let frames = state.relay.open(req.render()).await.map_err(|e| {
        tracing::warn!(route = T::ROUTE, error = %e, "generation preflight failed");
        domain_error_response(&e, T::ROUTE)
    })?;

    Ok(event_stream_response(frames, T::ROUTE).await)
}

pub async fn root() -> &'static str {
    "genstream relay"
}

pub async fn healthz() -> StatusCode {
    StatusCode::NO_CONTENT
}

use axum::response::{IntoResponse, Response};
use genstream_sdk::wire::ERROR_SOURCE_HEADER;
use http::{HeaderValue, StatusCode};
use serde::{Deserialize, Serialize};

use crate::domain::error::RelayError;

// ---------------------------------------------------------------------------
// RFC 9457 Problem Details
// ---------------------------------------------------------------------------

/// RFC 9457 Problem Details for HTTP APIs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub(crate) struct ProblemDetails {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub instance: String,
}

pub(crate) const ERR_VALIDATION: &str = "urn:genstream:error:validation";
pub(crate) const ERR_UPSTREAM_REJECTED: &str = "urn:genstream:error:upstream.rejected";
pub(crate) const ERR_UPSTREAM_UNAVAILABLE: &str = "urn:genstream:error:upstream.unavailable";
pub(crate) const ERR_MID_STREAM: &str = "urn:genstream:error:upstream.mid_stream";
pub(crate) const ERR_DEADLINE: &str = "urn:genstream:error:timeout.deadline";
pub(crate) const ERR_INTERNAL: &str = "urn:genstream:error:internal";

fn problem_type(err: &RelayError) -> &'static str {
    match err {
        RelayError::Validation { .. } => ERR_VALIDATION,
        RelayError::UpstreamRejected { .. } => ERR_UPSTREAM_REJECTED,
        RelayError::UpstreamUnavailable { .. } => ERR_UPSTREAM_UNAVAILABLE,
        RelayError::MidStream { .. } => ERR_MID_STREAM,
        RelayError::DeadlineExceeded { .. } => ERR_DEADLINE,
        RelayError::Internal { .. } => ERR_INTERNAL,
    }
}

fn http_status(err: &RelayError) -> StatusCode {
    match err {
        RelayError::Validation { .. } => StatusCode::BAD_REQUEST,
        RelayError::UpstreamRejected { .. }
        | RelayError::UpstreamUnavailable { .. }
        | RelayError::MidStream { .. } => StatusCode::BAD_GATEWAY,
        RelayError::DeadlineExceeded { .. } => StatusCode::GATEWAY_TIMEOUT,
        RelayError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn title(err: &RelayError) -> &'static str {
    match err {
        RelayError::Validation { .. } => "Validation Error",
        RelayError::UpstreamRejected { .. } => "Upstream Rejected Request",
        RelayError::UpstreamUnavailable { .. } => "Upstream Unavailable",
        RelayError::MidStream { .. } => "Upstream Stream Failed",
        RelayError::DeadlineExceeded { .. } => "Deadline Exceeded",
        RelayError::Internal { .. } => "Internal Error",
    }
}

/// Upstream rejections are reported as such; everything else originates in the relay.
fn error_source(err: &RelayError) -> &'static str {
    match err {
        RelayError::UpstreamRejected { .. } => "upstream",
        _ => "relay",
    }
}

fn detail(err: &RelayError) -> String {
    match err {
        RelayError::UpstreamRejected { detail, .. } if !detail.is_empty() => {
            format!("{err}: {detail}")
        }
        _ => err.to_string(),
    }
}

fn to_problem_details(err: &RelayError, instance: &str) -> ProblemDetails {
    ProblemDetails {
        error_type: problem_type(err).to_owned(),
        title: title(err).to_owned(),
        status: http_status(err).as_u16(),
        detail: detail(err),
        instance: instance.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Axum error response
// ---------------------------------------------------------------------------

/// Convert a `RelayError` into an axum `Response` with RFC 9457 Problem Details.
pub(crate) fn domain_error_response(err: &RelayError, instance: &str) -> Response {
    let pd = to_problem_details(err, instance);
    let body = serde_json::to_string(&pd).unwrap_or_default();

    let mut response = (
        http_status(err),
        [(http::header::CONTENT_TYPE, "application/problem+json")],
        body,
    )
        .into_response();

    response.headers_mut().insert(
        ERROR_SOURCE_HEADER,
        HeaderValue::from_static(error_source(err)),
    );
    response
}

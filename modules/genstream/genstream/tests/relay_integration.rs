//! End-to-end: the real router on a loopback socket, driven by the client library.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use bytes::Bytes;
use futures::{StreamExt, stream};
use genstream::{ChunkStream, GenStreamConfig, GenStreamModule, RelayError, UpstreamClient};
use genstream_client::{ClientError, ErrorSource, GenStreamClient, GenStreamClientConfig};
use genstream_sdk::{
    GenerationRequest, PortfolioRequest, ResumeAnalysisRequest, VoiceFeedbackRequest,
    WordCardRequest, routes,
};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use httpmock::prelude::*;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Upstream replaying a fixed script; `Err` entries fail the body at that point.
struct Scripted {
    script: Vec<Result<&'static str, &'static str>>,
    prompts: Mutex<Vec<String>>,
}

impl Scripted {
    fn new(script: Vec<Result<&'static str, &'static str>>) -> Arc<Self> {
        Arc::new(Self {
            script,
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl UpstreamClient for Scripted {
    async fn open(&self, request: &GenerationRequest) -> Result<ChunkStream, RelayError> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        let items: Vec<Result<Bytes, RelayError>> = self
            .script
            .iter()
            .map(|item| match item {
                Ok(text) => Ok(Bytes::from_static(text.as_bytes())),
                Err(detail) => Err(RelayError::MidStream {
                    detail: (*detail).to_owned(),
                }),
            })
            .collect();
        Ok(stream::iter(items).boxed())
    }
}

/// Upstream that accepts the request and then never sends anything.
struct Silent;

#[async_trait::async_trait]
impl UpstreamClient for Silent {
    async fn open(&self, _request: &GenerationRequest) -> Result<ChunkStream, RelayError> {
        Ok(stream::pending::<Result<Bytes, RelayError>>().boxed())
    }
}

async fn serve(module: &GenStreamModule) -> GenStreamClient {
    let app = module.router().unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    GenStreamClient::from_config(GenStreamClientConfig::new(format!("http://{addr}"))).unwrap()
}

async fn serve_scripted(upstream: Arc<Scripted>) -> GenStreamClient {
    serve(&GenStreamModule::with_upstream(
        upstream,
        &GenStreamConfig::default(),
    ))
    .await
}

fn word_request() -> WordCardRequest {
    WordCardRequest {
        word: "hi".into(),
        language: "Russian".into(),
    }
}

#[tokio::test]
async fn document_survives_arbitrary_upstream_chunking() {
    let upstream = Scripted::new(vec![Ok(r#"{"wor"#), Ok(r#"d":"hi"#), Ok(r#""}"#)]);
    let client = serve_scripted(upstream.clone()).await;

    let doc: Value = client
        .generate(routes::WORD_CARD, &word_request())
        .await
        .unwrap();
    assert_eq!(doc, json!({"word": "hi"}));

    let card = client.word_card(&word_request()).await.unwrap();
    assert_eq!(card.word, "hi");

    let prompts = upstream.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("\"hi\""), "{}", prompts[0]);
}

#[tokio::test]
async fn streaming_response_headers() {
    let client = serve_scripted(Scripted::new(vec![Ok("\"ok\"")])).await;

    let response = client
        .execute(routes::WORD_CARD, &word_request())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers["content-type"], "text/event-stream");
    assert_eq!(headers["cache-control"], "no-cache");
    assert_eq!(headers["x-accel-buffering"], "no");

    assert_eq!(response.text().await.unwrap(), "\"ok\"");
}

#[tokio::test]
async fn multiline_prose_is_relayed_verbatim() {
    let client = serve_scripted(Scripted::new(vec![
        Ok("Strong match.\n\n"),
        Ok("Rust: 10 years.\nHire."),
    ]))
    .await;

    let text = client
        .analyze_resume(&ResumeAnalysisRequest {
            jd: "rust developer".into(),
            extracted_text: "10 years of rust".into(),
        })
        .await
        .unwrap();
    assert_eq!(text, "Strong match.\n\nRust: 10 years.\nHire.");
}

#[tokio::test]
async fn portfolio_page_is_relayed_as_html() {
    let upstream = Scripted::new(vec![
        Ok("<!DOCTYPE html>\n<html><head><style>body{margin:0}</style></head>"),
        Ok("<body><h1>Jane Doe</h1></body></html>"),
    ]);
    let client = serve_scripted(upstream.clone()).await;

    let page = client
        .portfolio(&PortfolioRequest {
            portfolio_content: "Jane Doe, Rust engineer".into(),
        })
        .await
        .unwrap();
    assert_eq!(
        page,
        "<!DOCTYPE html>\n<html><head><style>body{margin:0}</style></head>\
         <body><h1>Jane Doe</h1></body></html>"
    );

    let err = client
        .portfolio(&PortfolioRequest::default())
        .await
        .unwrap_err();
    match err {
        ClientError::Preflight { status, origin, .. } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(origin, ErrorSource::Relay);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let prompts = upstream.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Jane Doe, Rust engineer"), "{}", prompts[0]);
}

#[tokio::test]
async fn voice_feedback_accuracy_is_not_range_checked() {
    let client = serve_scripted(Scripted::new(vec![Ok(
        r#"{"accuracy":140,"feedback":"Great"}"#,
    )]))
    .await;

    let feedback = client
        .voice_feedback(&VoiceFeedbackRequest {
            text: "da".into(),
            audio_accuracy: Some(140.0),
        })
        .await
        .unwrap();
    assert_eq!(feedback.feedback, "Great");
}

#[tokio::test]
async fn empty_upstream_body_completes_with_no_text() {
    let client = serve_scripted(Scripted::new(vec![])).await;
    let text = client
        .generate_text(routes::WORD_CARD, &word_request())
        .await
        .unwrap();
    assert!(text.is_empty());
}

#[tokio::test]
async fn failure_after_first_frame_is_truncation() {
    let client = serve_scripted(Scripted::new(vec![
        Ok(r#"{"a":1}"#),
        Err("connection reset by backend"),
    ]))
    .await;

    let err = client
        .generate::<_, Value>(routes::WORD_CARD, &word_request())
        .await
        .unwrap_err();
    assert!(err.is_truncated(), "{err:?}");
}

#[tokio::test]
async fn failure_before_first_frame_is_an_error_status() {
    let client = serve_scripted(Scripted::new(vec![Err("connection reset by backend")])).await;

    let err = client.word_card(&word_request()).await.unwrap_err();
    match err {
        ClientError::Preflight { status, origin, .. } => {
            assert_eq!(status, StatusCode::BAD_GATEWAY);
            assert_eq!(origin, ErrorSource::Relay);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn upstream_500_reaches_the_caller_with_zero_frames() {
    let backend = MockServer::start_async().await;
    let mock = backend
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(500).body("model crashed");
        })
        .await;

    let mut config = GenStreamConfig::default();
    config.upstream.url = backend.url("/api/generate");
    let client = serve(&GenStreamModule::from_config(&config).unwrap()).await;

    let err = client.word_card(&word_request()).await.unwrap_err();
    match err {
        ClientError::Preflight {
            status,
            origin,
            body,
        } => {
            assert_eq!(status, StatusCode::BAD_GATEWAY);
            assert_eq!(origin, ErrorSource::Upstream);
            let problem: Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(problem["status"], 502);
            assert_eq!(problem["instance"], routes::WORD_CARD);
            assert!(
                problem["detail"].as_str().unwrap().contains("model crashed"),
                "{problem}"
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn missing_field_is_rejected_before_upstream() {
    let upstream = Scripted::new(vec![Ok("{}")]);
    let client = serve_scripted(upstream.clone()).await;

    let err = client
        .word_card(&WordCardRequest {
            word: "hi".into(),
            language: String::new(),
        })
        .await
        .unwrap_err();

    match err {
        ClientError::Preflight { status, origin, .. } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(origin, ErrorSource::Relay);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(upstream.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn stalled_upstream_hits_the_deadline() {
    let mut config = GenStreamConfig::default();
    config.relay.deadline_secs = 1;
    let client = serve(&GenStreamModule::with_upstream(Arc::new(Silent), &config)).await;

    let err = client.word_card(&word_request()).await.unwrap_err();
    match err {
        ClientError::Preflight { status, origin, .. } => {
            assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
            assert_eq!(origin, ErrorSource::Relay);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Router-level checks
// ---------------------------------------------------------------------------

fn router() -> axum::Router {
    GenStreamModule::with_upstream(Scripted::new(vec![]), &GenStreamConfig::default())
        .router()
        .unwrap()
}

#[tokio::test]
async fn health_endpoints() {
    let response = router()
        .oneshot(Request::get(routes::HEALTHZ).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router()
        .oneshot(Request::get(routes::ROOT).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body, "genstream relay");
}

#[tokio::test]
async fn unparseable_body_is_problem_details() {
    let response = router()
        .oneshot(
            Request::post(routes::ALPHABET_CARD)
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()["content-type"],
        "application/problem+json"
    );
    assert_eq!(response.headers()["x-genstream-error-source"], "relay");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let problem: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(problem["type"], "urn:genstream:error:validation");
    assert_eq!(problem["instance"], routes::ALPHABET_CARD);
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let response = router()
        .oneshot(
            Request::options(routes::WORD_CARD)
                .header("origin", "http://localhost:5173")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

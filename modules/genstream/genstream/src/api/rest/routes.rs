use axum::Router;
use axum::extract::Extension;
use axum::routing::{get, post};
use genstream_sdk::{
    AlphabetCardRequest, PortfolioRequest, ResumeAnalysisRequest, SpeakingPromptRequest,
    VoiceFeedbackRequest, WordCardRequest, routes,
};
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::rest::handlers::{healthz, relay_generation, root};
use crate::domain::error::RelayError;
use crate::domain::prompt::PromptTemplate;
use crate::module::AppState;

fn generation_route<T: PromptTemplate>(router: Router) -> Router {
    router.route(T::ROUTE, post(relay_generation::<T>))
}

pub(crate) fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, RelayError> {
    let allow_origin = match origin {
        Some(o) => AllowOrigin::exact(HeaderValue::from_str(o).map_err(|e| {
            RelayError::Internal {
                message: format!("invalid CORS origin '{o}': {e}"),
            }
        })?),
        None => AllowOrigin::from(Any),
    };
    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

pub(crate) fn router(state: AppState, cors: CorsLayer) -> Router {
    let mut router = Router::new()
        .route(routes::ROOT, get(root))
        .route(routes::HEALTHZ, get(healthz));

    router = generation_route::<WordCardRequest>(router);
    router = generation_route::<SpeakingPromptRequest>(router);
    router = generation_route::<AlphabetCardRequest>(router);
    router = generation_route::<VoiceFeedbackRequest>(router);
    router = generation_route::<ResumeAnalysisRequest>(router);
    router = generation_route::<PortfolioRequest>(router);

    router
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

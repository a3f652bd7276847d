use crate::models::{CheckHealthResult, QueryDataRequest, QueryDataResponse};
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, State},
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

pub fn router(state: Arc<AppState>) -> Router {
    let limit = state.max_request_body_bytes;
    Router::new()
        .route("/api/query", post(query_data_handler))
        .route("/api/health", post(check_health_handler).get(check_health_handler))
        .layer(DefaultBodyLimit::max(limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn query_data_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryDataRequest>,
) -> Json<QueryDataResponse> {
    debug!("Received query request with {} query(ies)", req.queries.len());
    Json(state.datasource.query_data(req).await)
}

pub async fn check_health_handler(State(state): State<Arc<AppState>>) -> Json<CheckHealthResult> {
    Json(state.datasource.check_health().await)
}

//! REST surface for the alert orchestrator.
//!
//! Thin, unauthenticated endpoints over [`AlertService`]: `/health` and
//! `/api/v1/alert`. No logic beyond parameter passing and error mapping.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::advisory::remote::RemoteClient;
use crate::alert::{AlertRequest, AlertResponse, AlertService};
use crate::sources::SourceProvider;

/// Query parameters for the alert endpoint.
#[derive(Debug, Deserialize)]
struct AlertQuery {
    lat: Option<f64>,
    lon: Option<f64>,
    profile: Option<String>,
    lang: Option<String>,
    question: Option<String>,
}

/// Error body for invalid requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn alert<P: SourceProvider, C: RemoteClient>(
    State(service): State<Arc<AlertService<P, C>>>,
    Query(query): Query<AlertQuery>,
) -> Result<Json<AlertResponse>, (StatusCode, Json<ApiError>)> {
    let request = AlertRequest {
        lat: query.lat,
        lon: query.lon,
        profile: query.profile,
        language: query.lang,
        question: query.question,
    };
    match service.build_alert(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: e.to_string(),
            }),
        )),
    }
}

/// Build the application router.
pub fn router<P: SourceProvider, C: RemoteClient>(service: Arc<AlertService<P, C>>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/alert", get(alert::<P, C>))
        .with_state(service)
}

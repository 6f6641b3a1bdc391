use axum::{Json, response::IntoResponse};
use serde_json::json;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "content-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn readiness_check() -> impl IntoResponse {
    Json(json!({ "status": "ready" }))
}

pub async fn metrics() -> impl IntoResponse {
    checker_core::observability::get_metrics()
}

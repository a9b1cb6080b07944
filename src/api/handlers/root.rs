use axum::{http::StatusCode, http::Uri, response::IntoResponse, Json};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "OK",
            "message": "Classhub API is running",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

pub async fn not_found(uri: Uri) -> impl IntoResponse {
    tracing::warn!("404 - Route not found: {}", uri);
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Route not found",
            "path": uri.path(),
        })),
    )
}

//! Health check and status endpoints

use axum::{response::Html, Json};
use serde::Serialize;
use utoipa::ToSchema;

const STATUS_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <title>Library API</title>
</head>
<body>
    <h1>Library API</h1>
    <p>The book catalog is up. API documentation is available at <a href="/swagger-ui">/swagger-ui</a>.</p>
</body>
</html>"#;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Human-readable status page
#[utoipa::path(
    get,
    path = "/status",
    tag = "health",
    responses(
        (status = 200, description = "Status page", body = String, content_type = "text/html")
    )
)]
pub async fn status_page() -> Html<&'static str> {
    Html(STATUS_PAGE)
}

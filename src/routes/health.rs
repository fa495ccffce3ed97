use axum::{http::StatusCode, response::Json};
use serde_json::json;

pub async fn health_check() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "service": "VaultDoc API" })),
    )
}

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "VaultDoc API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health_check": "/health",
            "users_api": "/api/users",
            "folders_api": "/api/folders",
            "documents_api": "/api/documents",
            "permissions_api": "/api/permissions",
            "statistics": "/api/statistics"
        }
    }))
}

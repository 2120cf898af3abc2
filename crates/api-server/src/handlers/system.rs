use axum::response::Json;

pub async fn banner() -> &'static str {
    "E-Commerce API is running..."
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

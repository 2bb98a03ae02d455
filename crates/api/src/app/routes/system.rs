use axum::{response::IntoResponse, Json};

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "OK" }))
}

pub async fn index() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "orderdesk",
        "orders_url": "/orders",
    }))
}

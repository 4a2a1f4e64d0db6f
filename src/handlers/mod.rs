// src/handlers/mod.rs

pub mod auth;
pub mod game;
pub mod ws;

use axum::{Json, response::IntoResponse};
use serde_json::json;

/// Points clients at the interactive API documentation.
pub async fn index() -> impl IntoResponse {
    Json(json!({ "documentationURL": "/documentation" }))
}

//! Service status endpoint.

use axum::{Json, Router, routing::get};
use serde::Serialize;

/// Version embedded at compile time from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    message: &'static str,
    version: &'static str,
}

pub fn router() -> Router {
    Router::new().route("/", get(status))
}

async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "active",
        message: "Reelpass up and running",
        version: VERSION,
    })
}

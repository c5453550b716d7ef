use std::sync::Arc;

use axum::{
    Router,
    response::IntoResponse,
    routing::{get, post},
};
use log::info;
use race_app::Application;
use thiserror::Error;

mod race;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
}

pub fn router(app: Arc<Application>) -> Router {
    Router::new()
        .nest(
            "/v1",
            Router::new()
                .route("/races", get(race::get_all).post(race::start))
                .route("/races/best", get(race::get_best))
                .route("/races/{id}", get(race::get_by_id))
                .route("/races/{id}/stop", post(race::stop)),
        )
        .with_state(AppState { app })
}

pub async fn run(
    app: Arc<Application>,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) {
    let port = std::env::var("RACE_HTTP_API_PORT")
        .expect("RACE_HTTP_API_PORT must be set")
        .parse::<u16>()
        .expect("RACE_HTTP_API_PORT must be a valid u16");

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .expect("Failed to bind HTTP API port");

    info!("API server listening on port {}", port);
    if let Err(e) = axum::serve(listener, router(app))
        .with_graceful_shutdown(shutdown_signal)
        .await
    {
        log::error!("HTTP API server error: {}", e);
    }

    info!("HTTP API shut down gracefully");
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::http::Response<axum::body::Body> {
        let (status, msg) = match self {
            ServiceError::NotFound(msg) => (axum::http::StatusCode::NOT_FOUND, msg),
            ServiceError::BadRequest(msg) => (axum::http::StatusCode::BAD_REQUEST, msg),
            ServiceError::Internal(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = serde_json::json!({ "error": msg });
        (status, axum::Json(body)).into_response()
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    items: Vec<T>,
    total: usize,
    page: usize,
    per_page: usize,
    total_pages: usize,
}

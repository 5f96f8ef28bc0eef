use std::sync::Arc;

use anyhow::Context;
use axum::body::Body;
use axum::http::{header, Method, StatusCode};
use axum::response::Response;
use axum::{extract::FromRef, routing::get, Router};
use secrecy::SecretBox;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::error::{method_not_allowed, not_found, ApiError};
use super::routes::{category_router, questions_router, quizzes_router};
use crate::configuration::{generate_secret_key, Settings};
use crate::db::DbPool;
use crate::telemetry::encode_metrics;

#[derive(FromRef, Clone)]
pub struct AppState {
    pool: DbPool,
    secret_key: Arc<SecretBox<[u8; 32]>>,
}

impl AppState {
    pub fn new(pool: DbPool, secret_key: SecretBox<[u8; 32]>) -> Self {
        Self {
            pool,
            secret_key: Arc::new(secret_key),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(category_router(state.clone()))
        .merge(questions_router(state.clone()))
        .merge(quizzes_router(state));

    Router::new()
        .nest("/api", api)
        .route("/metrics", get(metrics))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(cors())
        .layer(TraceLayer::new_for_http())
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_methods([
            Method::GET,
            Method::PATCH,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
}

pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let pool = DbPool::connect(&settings.database.connection_string())
        .await
        .context("Failed to connect to the database")?;
    tracing::info!(backend = pool.backend(), "Connected to the database");

    let state = AppState::new(pool, generate_secret_key());
    let app = build_router(state);

    let addr = settings.application.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn metrics() -> Result<Response, ApiError> {
    let (content_type, buf) = encode_metrics()
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Failed to encode metrics: {e}")))?;
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(buf))
        .map_err(|e| ApiError::Internal(e.into()))
}

//! # Server Module
//!
//! HTTP surface of the Starkward guardian service.
//!
//! ## Submodules
//!
//! - [`error`] - Client-visible error mapping
//! - [`routes`] - Route handlers
//!
//! ## API Endpoints
//!
//! - `POST /verify` - Verify a transaction against its on-chain policy
//!   and co-sign it
//! - `POST /encodePolicy` - Encode a policy document into its on-chain
//!   transport form
//! - `GET /getPolicies/:address` - List the latest policy per signer of
//!   an account
//! - `GET /ping` - Health check

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::verifier::Verifier;

pub use error::ApiError;

/// Errors that can occur while running the HTTP server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listen socket could not be bound or the server loop failed.
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    /// The verification pipeline.
    pub verifier: Arc<Verifier>,
}

/// Build the service router.
///
/// CORS is permissive: the service authenticates nothing itself, every
/// decision is derived from on-chain state and the request body.
#[must_use]
pub fn router(verifier: Arc<Verifier>) -> Router {
    Router::new()
        .route("/verify", post(routes::verify))
        .route("/encodePolicy", post(routes::encode_policy))
        .route("/getPolicies/:address", get(routes::get_policies))
        .route("/ping", get(routes::ping))
        .fallback(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "message": "not found" })),
            )
        })
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { verifier })
}

/// Bind `port` on all interfaces and serve until the process exits.
///
/// # Errors
///
/// Returns [`ServerError::Io`] if the socket cannot be bound or the
/// accept loop fails.
pub async fn serve(port: u16, verifier: Arc<Verifier>) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "listening");
    axum::serve(listener, router(verifier)).await?;
    Ok(())
}

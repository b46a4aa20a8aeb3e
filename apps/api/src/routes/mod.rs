pub mod health;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::artifacts::handlers as artifacts;
use crate::auth::handlers as auth;
use crate::likes::handlers as likes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Auth
        .route("/jwt", post(auth::handle_issue_token))
        .route("/logout", post(auth::handle_logout))
        // Artifacts
        .route(
            "/artifacts",
            get(artifacts::handle_list_artifacts).post(artifacts::handle_create_artifact),
        )
        .route("/artifactLimited", get(artifacts::handle_top_liked))
        .route(
            "/artifacts/:id",
            get(artifacts::handle_get_artifact)
                .put(artifacts::handle_upsert_artifact)
                .delete(artifacts::handle_delete_artifact),
        )
        // Likes
        .route(
            "/artifactLikes",
            get(likes::handle_liked_artifacts).post(likes::handle_record_like),
        )
        .with_state(state)
}

/// CORS for the single configured client origin, with credentials.
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("CLIENT_ORIGIN '{origin}' is not a valid header value"))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]))
}

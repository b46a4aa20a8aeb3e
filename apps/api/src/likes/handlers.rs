//! Axum route handlers for the Likes API.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::artifacts::handlers::EmailQuery;
use crate::auth::cookie::AuthUser;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::ack::InsertAck;
use crate::models::artifact::Artifact;
use crate::models::like::LikeSubmission;
use crate::state::AppState;

/// POST /artifactLikes
pub async fn handle_record_like(
    State(state): State<AppState>,
    AppJson(submission): AppJson<LikeSubmission>,
) -> Result<Json<InsertAck>, AppError> {
    Ok(Json(state.likes.record_like(submission).await?))
}

/// GET /artifactLikes?email=
///
/// Requires a `token` cookie whose email matches the query.
pub async fn handle_liked_artifacts(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(params): Query<EmailQuery>,
) -> Result<Json<Vec<Artifact>>, AppError> {
    let artifacts = state
        .likes
        .list_liked_artifacts(params.email(), Some(&claims))
        .await?;
    Ok(Json(artifacts))
}

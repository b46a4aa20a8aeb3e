//! Axum route handlers for the Artifacts API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::artifacts::repository::TOP_LIKED_LIMIT;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::ack::{DeleteAck, InsertAck, UpdateAck};
use crate::models::artifact::{Artifact, ArtifactFilter, ArtifactSubmission, ArtifactUpdate};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

impl EmailQuery {
    /// The `email` parameter, treating an empty value as absent.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }
}

/// GET /artifacts?email=
pub async fn handle_list_artifacts(
    State(state): State<AppState>,
    Query(params): Query<EmailQuery>,
) -> Result<Json<Vec<Artifact>>, AppError> {
    let filter = match params.email() {
        Some(email) => ArtifactFilter::submitted_by(email),
        None => ArtifactFilter::default(),
    };
    Ok(Json(state.artifacts.list(&filter).await?))
}

/// GET /artifactLimited
pub async fn handle_top_liked(
    State(state): State<AppState>,
) -> Result<Json<Vec<Artifact>>, AppError> {
    Ok(Json(state.artifacts.list_top_liked(TOP_LIKED_LIMIT).await?))
}

/// GET /artifacts/:id
pub async fn handle_get_artifact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Artifact>, AppError> {
    Ok(Json(state.artifacts.get(&id).await?))
}

/// POST /artifacts
pub async fn handle_create_artifact(
    State(state): State<AppState>,
    AppJson(submission): AppJson<ArtifactSubmission>,
) -> Result<Json<InsertAck>, AppError> {
    Ok(Json(state.artifacts.create(submission).await?))
}

/// PUT /artifacts/:id
pub async fn handle_upsert_artifact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(update): AppJson<ArtifactUpdate>,
) -> Result<Json<UpdateAck>, AppError> {
    Ok(Json(state.artifacts.upsert(&id, &update).await?))
}

/// DELETE /artifacts/:id
pub async fn handle_delete_artifact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, AppError> {
    Ok(Json(state.artifacts.delete(&id).await?))
}

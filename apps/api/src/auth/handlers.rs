//! Axum route handlers for issuing and clearing the identity cookie.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::info;

use crate::auth::token::IdentityRequest;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

/// POST /jwt
///
/// Signs the posted identity (must include `email`) and sets it as the `token` cookie.
pub async fn handle_issue_token(
    State(state): State<AppState>,
    AppJson(request): AppJson<IdentityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = request
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("email is required".to_string()))?;

    let token = state.verifier.issue(&email, request.extra)?;
    info!("Issued credential for {email}");

    Ok((
        [(header::SET_COOKIE, state.cookies.session_cookie(&token))],
        Json(json!({ "success": true })),
    ))
}

/// POST /logout
pub async fn handle_logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, state.cookies.cleared_cookie())],
        Json(json!({ "success": true })),
    )
}

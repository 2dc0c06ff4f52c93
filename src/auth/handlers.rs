//! Authentication handlers

use axum::{
    body::Bytes,
    extract::{Extension, Json},
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use super::extractors::AuthedUser;
use super::models::AccessTokenPayload;
use crate::common::{ApiError, AppState};

/// POST /api/auth/google
/// Verifies a Google OAuth access token and returns the derived identity
///
/// # Request Body
/// ```json
/// {
///   "access_token": "<google access token>"
/// }
/// ```
///
/// # Response
/// ```json
/// {
///   "user": { "internalUserId": "...", "provider": "google", ... }
/// }
/// ```
pub async fn google_auth(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    info!("🔐 Received Google auth request");

    let payload: AccessTokenPayload = serde_json::from_slice(&body).map_err(|_| {
        ApiError::BadRequest("request body must be {\"access_token\": string}".to_string())
    })?;

    let identity = state.verifier.verify(&payload.access_token).await?;
    Ok(Json(json!({ "user": identity })))
}

/// GET /api/me
/// Returns the identity behind the bearer token
pub async fn me_handler(AuthedUser(identity): AuthedUser) -> Json<serde_json::Value> {
    Json(json!({ "user": identity }))
}

//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tracing::{debug, warn};

use super::models::VerifiedIdentity;
use crate::common::{safe_token_log, ApiError, AppState};

/// Authenticated caller extractor
///
/// Pulls the bearer token from the `Authorization` header and verifies it
/// with the identity provider. Runs before any body extractor, so backup
/// payloads are never looked at for unauthenticated requests.
#[derive(Debug)]
pub struct AuthedUser(pub VerifiedIdentity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match header.and_then(bearer_token) {
            Some(t) => t,
            None => {
                warn!(
                    has_header = header.is_some(),
                    "Authentication failed: missing or malformed Authorization header"
                );
                return Err(ApiError::Unauthorized("missing bearer token".into()));
            }
        };

        debug!(token = %safe_token_log(token), "Verifying bearer token");
        let identity = app_state.verifier.verify(token).await?;
        Ok(AuthedUser(identity))
    }
}

/// Handles "Bearer <token>" with any scheme casing
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

// src/backups/handlers.rs

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Json},
    http::StatusCode,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::models::BackupDocument;
use super::validators::BackupValidator;
use crate::auth::AuthedUser;
use crate::common::{ApiError, ValidationResult, Validator};

fn parse_body(body: Result<Bytes, BytesRejection>) -> Result<Value, ApiError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge("backup document exceeds the size limit".to_string())
        } else {
            ApiError::BadRequest("request body could not be read".to_string())
        }
    })?;

    serde_json::from_slice(&body).map_err(|_| {
        ApiError::ValidationError("document: request body is not valid JSON".to_string())
    })
}

/// POST /api/backups/validate
/// Reports every problem found in a backup document without importing it
pub async fn validate_backup(
    AuthedUser(identity): AuthedUser,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ValidationResult>, ApiError> {
    let document = parse_body(body)?;
    let result = BackupValidator.validate(&document);

    info!(
        user_id = %identity.internal_user_id,
        valid = result.is_valid,
        error_count = result.errors.len(),
        "Backup document validated"
    );

    Ok(Json(result))
}

/// POST /api/backups/import
/// Accepts a backup document only if it validates completely. Storing it is
/// left to the caller that receives the accepted document.
pub async fn import_backup(
    AuthedUser(identity): AuthedUser,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, ApiError> {
    let document = parse_body(body)?;

    let result = BackupValidator.validate(&document);
    if !result.is_valid {
        warn!(
            user_id = %identity.internal_user_id,
            error_count = result.errors.len(),
            "Backup import rejected"
        );
        return Err(result.into());
    }

    let backup = BackupDocument::from_validated(document).ok_or_else(|| {
        ApiError::InternalServer("validated backup could not be decoded".to_string())
    })?;
    let summary = backup.summary();

    info!(
        user_id = %identity.internal_user_id,
        sessions = summary.sessions,
        groups = summary.groups,
        tabs = summary.tabs,
        "Backup import accepted"
    );

    Ok(Json(json!({
        "accepted": true,
        "userId": identity.internal_user_id,
        "summary": summary,
    })))
}

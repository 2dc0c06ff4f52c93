// src/backups/routes.rs

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use super::handlers;

/// Creates the backup router
///
/// # Routes
/// - `POST /api/backups/validate` - Diagnostics for a backup document
/// - `POST /api/backups/import` - Accept a fully valid backup document
///
/// Bodies above `max_body_bytes` are refused before any handler runs.
pub fn backups_routes(max_body_bytes: usize) -> Router {
    Router::new()
        .route("/api/backups/validate", post(handlers::validate_backup))
        .route("/api/backups/import", post(handlers::import_backup))
        .layer(DefaultBodyLimit::max(max_body_bytes))
}

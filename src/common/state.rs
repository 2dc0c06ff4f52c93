// Application state shared across all modules

use std::sync::Arc;

use super::config::AppConfig;
use crate::auth::TokenVerifier;

/// Immutable for the process lifetime; built once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub verifier: Arc<TokenVerifier>,
}

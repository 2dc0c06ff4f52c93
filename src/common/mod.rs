// Common module - shared types and utilities across all modules

pub mod config;
pub mod error;
pub mod helpers;
pub mod state;
pub mod validation;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use error::ApiError;
pub use helpers::{
    deserialize_json_integer, integral_f64, json_integer, safe_email_log, safe_token_log,
    sha256_hex,
};
pub use state::AppState;
pub use validation::{ValidationResult, Validator};

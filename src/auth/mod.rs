//! # Auth Module
//!
//! Identity gate for every request:
//! - Google access token verification against the tokeninfo endpoint
//! - Stable internal user ids derived from the provider subject
//! - AuthedUser extractor for protected routes

pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod verifier;

#[cfg(test)]
mod tests;

pub use errors::VerificationError;
pub use extractors::AuthedUser;
pub use models::{Provider, VerifiedIdentity};
pub use routes::auth_routes;
pub use verifier::TokenVerifier;

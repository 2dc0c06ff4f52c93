//! Token verification failures

use thiserror::Error;

/// Closed set of verification outcomes. Callers branch on [`code`],
/// the message is safe to return to clients.
///
/// [`code`]: VerificationError::code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("access token is invalid")]
    InvalidToken,

    #[error("access token has expired")]
    ExpiredToken,

    #[error("access token was not issued for this application")]
    InvalidAudience,

    #[error("access token could not be verified")]
    VerificationFailed,
}

impl VerificationError {
    pub fn code(&self) -> &'static str {
        match self {
            VerificationError::InvalidToken => "INVALID_TOKEN",
            VerificationError::ExpiredToken => "EXPIRED_TOKEN",
            VerificationError::InvalidAudience => "INVALID_AUDIENCE",
            VerificationError::VerificationFailed => "VERIFICATION_FAILED",
        }
    }

    /// Classifies a provider-reported error by its text
    pub fn from_provider_error(text: &str) -> Self {
        if text.to_ascii_lowercase().contains("expired") {
            VerificationError::ExpiredToken
        } else {
            VerificationError::InvalidToken
        }
    }
}

//! Google access token verification
//!
//! Tokens are never trusted at face value: every call asks Google's
//! tokeninfo endpoint about the token, then checks the answer against the
//! configured client id before an identity is handed out.
//! Docs: https://developers.google.com/identity/protocols/oauth2

use chrono::Utc;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, error, info, warn};

use super::errors::VerificationError;
use super::models::{Provider, TokenInfo, VerifiedIdentity};
use crate::common::{safe_email_log, sha256_hex};

#[derive(Debug, Clone)]
pub struct TokenVerifier {
    http: Client,
    tokeninfo_url: Url,
    expected_audience: String,
}

impl TokenVerifier {
    pub fn new(http: Client, tokeninfo_url: Url, expected_audience: impl Into<String>) -> Self {
        Self {
            http,
            tokeninfo_url,
            expected_audience: expected_audience.into(),
        }
    }

    /// Verifies `access_token` with a single tokeninfo request.
    ///
    /// No retries and no caching; two calls with the same token make two
    /// requests. A blank token is rejected as `InvalidToken` without any
    /// request, since the provider could only refuse it.
    pub async fn verify(&self, access_token: &str) -> Result<VerifiedIdentity, VerificationError> {
        let access_token = access_token.trim();
        if access_token.is_empty() {
            warn!("Token verification rejected: empty access token");
            return Err(VerificationError::InvalidToken);
        }

        let token_info = self.fetch_token_info(access_token).await?;
        let identity =
            identity_from_token_info(&token_info, &self.expected_audience, Utc::now().timestamp())?;

        info!(
            user_id = %identity.internal_user_id,
            email = %identity.email.as_deref().map(safe_email_log).unwrap_or_default(),
            provider = %identity.provider,
            "Access token verified"
        );
        Ok(identity)
    }

    async fn fetch_token_info(&self, access_token: &str) -> Result<TokenInfo, VerificationError> {
        debug!("Initiating token validation with tokeninfo endpoint");

        let response = self
            .http
            .get(self.tokeninfo_url.clone())
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(|e| transport_failure(&e))?;

        let status = response.status();
        debug!(http_status = %status, "Received response from tokeninfo endpoint");

        if status.is_server_error() {
            warn!(http_status = %status, "Tokeninfo endpoint unavailable");
            return Err(VerificationError::VerificationFailed);
        }

        let body = response.bytes().await.map_err(|e| transport_failure(&e))?;

        let token_info = match serde_json::from_slice::<TokenInfo>(&body) {
            Ok(info) => info,
            // Google answers some rejections without a JSON body
            Err(_) if status.is_client_error() => TokenInfo::default(),
            Err(_) => {
                error!(
                    http_status = %status,
                    failure = "malformed_response",
                    "Tokeninfo response could not be parsed"
                );
                return Err(VerificationError::VerificationFailed);
            }
        };

        if status.is_client_error() || token_info.error_text().is_some() {
            let err = provider_rejection(&token_info);
            warn!(
                http_status = %status,
                code = err.code(),
                "Tokeninfo endpoint rejected access token"
            );
            return Err(err);
        }

        if status != StatusCode::OK {
            warn!(http_status = %status, "Unexpected tokeninfo status");
            return Err(VerificationError::VerificationFailed);
        }

        Ok(token_info)
    }
}

/// Turns a successful tokeninfo answer into an identity. `now` is epoch
/// seconds.
///
/// Checks run subject, audience, then expiry, so a response without a
/// subject is always `InvalidToken`.
pub fn identity_from_token_info(
    token_info: &TokenInfo,
    expected_audience: &str,
    now: i64,
) -> Result<VerifiedIdentity, VerificationError> {
    let subject = match token_info.subject() {
        Some(sub) => sub,
        None => {
            warn!(code = "INVALID_TOKEN", "Access token missing subject claim");
            return Err(VerificationError::InvalidToken);
        }
    };

    if token_info.audience() != Some(expected_audience) {
        warn!(
            code = "INVALID_AUDIENCE",
            has_audience = token_info.audience().is_some(),
            "Access token audience validation failed - rejecting token"
        );
        return Err(VerificationError::InvalidAudience);
    }

    let lapsed = token_info.expires_at().is_some_and(|exp| exp <= now)
        || token_info.expires_in().is_some_and(|secs| secs <= 0);
    if lapsed {
        warn!(code = "EXPIRED_TOKEN", "Access token has expired");
        return Err(VerificationError::ExpiredToken);
    }

    let provider = Provider::Google;
    Ok(VerifiedIdentity {
        internal_user_id: internal_user_id(provider, subject),
        email: token_info.email.clone(),
        email_verified: token_info.email_verified(),
        provider_subject: subject.to_string(),
        provider,
        scopes: token_info.scopes(),
    })
}

/// Stable internal id for an external account
pub fn internal_user_id(provider: Provider, subject: &str) -> String {
    sha256_hex(&format!("{}:{}", provider, subject))
}

fn provider_rejection(token_info: &TokenInfo) -> VerificationError {
    token_info
        .error_text()
        .map(|text| VerificationError::from_provider_error(&text))
        .unwrap_or(VerificationError::InvalidToken)
}

/// Logs only the failure kind; the request URL carries the token.
fn transport_failure(e: &reqwest::Error) -> VerificationError {
    let kind = if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect"
    } else if e.is_body() || e.is_decode() {
        "body"
    } else if e.is_request() {
        "request"
    } else {
        "other"
    };
    error!(failure = kind, "HTTP error contacting tokeninfo endpoint");
    VerificationError::VerificationFailed
}

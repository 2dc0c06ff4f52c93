//! Authentication data models

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::common::{integral_f64, json_integer};

/// Identity providers whose tokens can be verified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity derived from a verified access token. Never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedIdentity {
    /// SHA-256 of `"<provider>:<subject>"`, hex encoded
    pub internal_user_id: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub provider_subject: String,
    pub provider: Provider,
    pub scopes: Vec<String>,
}

/// Access token payload for `POST /api/auth/google`
#[derive(Deserialize)]
pub struct AccessTokenPayload {
    pub access_token: String,
}

/// Google tokeninfo response. Every field is optional; Google mixes
/// strings and numbers for the numeric ones.
#[derive(Debug, Default, Deserialize)]
pub struct TokenInfo {
    pub azp: Option<String>,
    pub aud: Option<String>,
    pub sub: Option<String>,
    pub scope: Option<String>,
    pub exp: Option<serde_json::Value>,
    pub expires_in: Option<serde_json::Value>,
    pub email: Option<String>,
    pub email_verified: Option<serde_json::Value>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl TokenInfo {
    /// Authorized party wins over audience when both are present
    pub fn audience(&self) -> Option<&str> {
        self.azp
            .as_deref()
            .or(self.aud.as_deref())
            .filter(|a| !a.is_empty())
    }

    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn error_text(&self) -> Option<String> {
        match (&self.error, &self.error_description) {
            (None, None) => None,
            (Some(e), None) => Some(e.clone()),
            (None, Some(d)) => Some(d.clone()),
            (Some(e), Some(d)) => Some(format!("{}: {}", e, d)),
        }
    }

    pub fn email_verified(&self) -> bool {
        match &self.email_verified {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    pub fn scopes(&self) -> Vec<String> {
        self.scope
            .as_deref()
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Absolute expiry in epoch seconds
    pub fn expires_at(&self) -> Option<i64> {
        self.exp
            .as_ref()
            .and_then(|v| as_i64_lenient("exp", v))
    }

    /// Remaining lifetime in seconds as reported by the provider
    pub fn expires_in(&self) -> Option<i64> {
        self.expires_in
            .as_ref()
            .and_then(|v| as_i64_lenient("expires_in", v))
    }
}

/// Google sends these as strings or numbers, integral floats included
fn as_i64_lenient(field: &'static str, value: &serde_json::Value) -> Option<i64> {
    let parsed = match value {
        serde_json::Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral_f64))
        }
        other => json_integer(other),
    };

    if parsed.is_none() {
        debug!(field, "Ignoring unreadable tokeninfo expiry value");
    }
    parsed
}

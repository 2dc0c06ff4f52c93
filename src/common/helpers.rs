// Helper functions for safe logging

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Masks email addresses for safe logging
///
/// # Example
/// ```ignore
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => "***@***.***".to_string(),
    }
}

/// Masks tokens for safe logging
///
/// Only the length is kept; no characters of the token are ever echoed.
pub fn safe_token_log(token: &str) -> String {
    format!("<redacted {} chars>", token.chars().count())
}

/// Lowercase hex SHA-256 of `input`
pub fn sha256_hex(input: &str) -> String {
    Sha256::digest(input.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Reads a JSON number as an integer. JSON has a single number type, so
/// `1.0` and `1` are the same value; fractional or out-of-range numbers
/// give `None`.
pub fn json_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().and_then(integral_f64))
}

/// `Some` for finite whole numbers inside the `i64` range
pub fn integral_f64(n: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}

/// Deserializes an integer field that may have been written as `1.0`
pub fn deserialize_json_integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    json_integer(&value).ok_or_else(|| serde::de::Error::custom("expected an integral number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_email_log_masks_local_part() {
        assert_eq!(safe_email_log("user@example.com"), "u***@example.com");
        assert_eq!(safe_email_log("not-an-email"), "***@***.***");
        assert_eq!(safe_email_log("@example.com"), "***@***.***");
    }

    #[test]
    fn test_safe_token_log_never_echoes_token() {
        let token = "ya29.a0AfH6SMBexampletoken";
        let masked = safe_token_log(token);
        assert!(!masked.contains("ya29"));
        assert_eq!(masked, format!("<redacted {} chars>", token.len()));
    }

    #[test]
    fn test_json_integer_accepts_integral_floats() {
        assert_eq!(json_integer(&serde_json::json!(1)), Some(1));
        assert_eq!(json_integer(&serde_json::json!(1.0)), Some(1));
        assert_eq!(
            json_integer(&serde_json::json!(1700000000000.0)),
            Some(1_700_000_000_000)
        );
        assert_eq!(json_integer(&serde_json::json!(1.5)), None);
        assert_eq!(json_integer(&serde_json::json!(1e300)), None);
        assert_eq!(json_integer(&serde_json::json!(u64::MAX)), None);
        assert_eq!(json_integer(&serde_json::json!("1")), None);
    }

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}

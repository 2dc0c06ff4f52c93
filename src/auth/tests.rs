//! Tests for auth module
//!
//! These tests verify token verification against a mocked tokeninfo
//! endpoint, the failure taxonomy, and internal id derivation.

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::auth::extractors::bearer_token;
    use crate::auth::models::TokenInfo;
    use crate::auth::verifier::{identity_from_token_info, internal_user_id};
    use reqwest::Client;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CLIENT_ID: &str = "1234-extension.apps.googleusercontent.com";

    async fn verifier_for(server: &MockServer) -> TokenVerifier {
        let url = format!("{}/tokeninfo", server.uri()).parse().unwrap();
        TokenVerifier::new(Client::new(), url, CLIENT_ID)
    }

    async fn mount_tokeninfo(server: &MockServer, token: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/tokeninfo"))
            .and(query_param("access_token", token))
            .respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }

    fn good_body(sub: &str) -> serde_json::Value {
        json!({
            "azp": CLIENT_ID,
            "aud": CLIENT_ID,
            "sub": sub,
            "scope": "openid https://www.googleapis.com/auth/userinfo.email",
            "exp": (chrono::Utc::now().timestamp() + 3600).to_string(),
            "expires_in": "3599",
            "email": "user@example.com",
            "email_verified": "true",
            "access_type": "online"
        })
    }

    #[tokio::test]
    async fn test_verify_valid_token() {
        let server = MockServer::start().await;
        mount_tokeninfo(
            &server,
            "good-token",
            ResponseTemplate::new(200).set_body_json(good_body("10769150350006150715113082367")),
        )
        .await;

        let identity = verifier_for(&server).await.verify("good-token").await.unwrap();

        assert_eq!(identity.provider, Provider::Google);
        assert_eq!(identity.provider_subject, "10769150350006150715113082367");
        assert_eq!(identity.email.as_deref(), Some("user@example.com"));
        assert!(identity.email_verified);
        assert_eq!(identity.scopes.len(), 2);
        assert_eq!(
            identity.internal_user_id,
            internal_user_id(Provider::Google, "10769150350006150715113082367")
        );
    }

    #[tokio::test]
    async fn test_missing_subject_is_invalid_token() {
        let server = MockServer::start().await;
        let mut body = good_body("ignored");
        body.as_object_mut().unwrap().remove("sub");
        mount_tokeninfo(&server, "no-sub", ResponseTemplate::new(200).set_body_json(body)).await;

        let err = verifier_for(&server).await.verify("no-sub").await.unwrap_err();
        assert_eq!(err, VerificationError::InvalidToken);
        assert_eq!(err.code(), "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_audience_mismatch_is_invalid_audience() {
        let server = MockServer::start().await;
        let mut body = good_body("42");
        body["azp"] = json!("someone-else.apps.googleusercontent.com");
        body["aud"] = json!("someone-else.apps.googleusercontent.com");
        mount_tokeninfo(&server, "other-app", ResponseTemplate::new(200).set_body_json(body)).await;

        let err = verifier_for(&server).await.verify("other-app").await.unwrap_err();
        assert_eq!(err, VerificationError::InvalidAudience);
    }

    #[tokio::test]
    async fn test_authorized_party_takes_precedence_over_audience() {
        let server = MockServer::start().await;
        let mut body = good_body("42");
        body["azp"] = json!("someone-else.apps.googleusercontent.com");
        mount_tokeninfo(&server, "azp-mismatch", ResponseTemplate::new(200).set_body_json(body))
            .await;

        let err = verifier_for(&server)
            .await
            .verify("azp-mismatch")
            .await
            .unwrap_err();
        assert_eq!(err, VerificationError::InvalidAudience);
    }

    #[tokio::test]
    async fn test_expired_error_text_is_expired_token() {
        let server = MockServer::start().await;
        mount_tokeninfo(
            &server,
            "old-token",
            ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_token",
                "error_description": "Token has been expired or revoked."
            })),
        )
        .await;

        let err = verifier_for(&server).await.verify("old-token").await.unwrap_err();
        assert_eq!(err, VerificationError::ExpiredToken);
    }

    #[tokio::test]
    async fn test_other_provider_error_is_invalid_token() {
        let server = MockServer::start().await;
        mount_tokeninfo(
            &server,
            "garbage",
            ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_token",
                "error_description": "Invalid Value"
            })),
        )
        .await;

        let err = verifier_for(&server).await.verify("garbage").await.unwrap_err();
        assert_eq!(err, VerificationError::InvalidToken);
    }

    #[tokio::test]
    async fn test_client_error_without_body_is_invalid_token() {
        let server = MockServer::start().await;
        mount_tokeninfo(&server, "bare-400", ResponseTemplate::new(400)).await;

        let err = verifier_for(&server).await.verify("bare-400").await.unwrap_err();
        assert_eq!(err, VerificationError::InvalidToken);
    }

    #[tokio::test]
    async fn test_server_error_is_verification_failed() {
        let server = MockServer::start().await;
        mount_tokeninfo(&server, "any", ResponseTemplate::new(503)).await;

        let err = verifier_for(&server).await.verify("any").await.unwrap_err();
        assert_eq!(err, VerificationError::VerificationFailed);
    }

    #[tokio::test]
    async fn test_malformed_response_is_verification_failed() {
        let server = MockServer::start().await;
        mount_tokeninfo(
            &server,
            "any",
            ResponseTemplate::new(200).set_body_string("<html>not json</html>"),
        )
        .await;

        let err = verifier_for(&server).await.verify("any").await.unwrap_err();
        assert_eq!(err, VerificationError::VerificationFailed);
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_verification_failed() {
        let url = "http://127.0.0.1:1/tokeninfo".parse().unwrap();
        let verifier = TokenVerifier::new(Client::new(), url, CLIENT_ID);

        let err = verifier.verify("any").await.unwrap_err();
        assert_eq!(err, VerificationError::VerificationFailed);
    }

    #[tokio::test]
    async fn test_timeout_is_verification_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tokeninfo"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(good_body("42"))
                    .set_delay(std::time::Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(200))
            .build()
            .unwrap();
        let url = format!("{}/tokeninfo", server.uri()).parse().unwrap();
        let verifier = TokenVerifier::new(client, url, CLIENT_ID);

        let err = verifier.verify("slow").await.unwrap_err();
        assert_eq!(err, VerificationError::VerificationFailed);
    }

    #[tokio::test]
    async fn test_empty_token_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = verifier_for(&server).await.verify("   ").await.unwrap_err();
        assert_eq!(err, VerificationError::InvalidToken);
    }

    #[test]
    fn test_lapsed_expiry_is_expired_token() {
        let info = TokenInfo {
            azp: Some(CLIENT_ID.to_string()),
            sub: Some("42".to_string()),
            exp: Some(json!("1000")),
            ..TokenInfo::default()
        };

        let err = identity_from_token_info(&info, CLIENT_ID, 2000).unwrap_err();
        assert_eq!(err, VerificationError::ExpiredToken);

        let identity = identity_from_token_info(&info, CLIENT_ID, 999).unwrap();
        assert_eq!(identity.provider_subject, "42");
    }

    #[test]
    fn test_missing_subject_wins_over_lapsed_expiry() {
        let info = TokenInfo {
            aud: Some(CLIENT_ID.to_string()),
            exp: Some(json!("1000")),
            ..TokenInfo::default()
        };

        let err = identity_from_token_info(&info, CLIENT_ID, 2000).unwrap_err();
        assert_eq!(err, VerificationError::InvalidToken);
    }

    #[test]
    fn test_audience_mismatch_wins_over_lapsed_expiry() {
        let info = TokenInfo {
            azp: Some("someone-else.apps.googleusercontent.com".to_string()),
            sub: Some("42".to_string()),
            exp: Some(json!("1000")),
            expires_in: Some(json!(0)),
            ..TokenInfo::default()
        };

        let err = identity_from_token_info(&info, CLIENT_ID, 2000).unwrap_err();
        assert_eq!(err, VerificationError::InvalidAudience);
    }

    #[test]
    fn test_integral_float_expiry_is_honoured() {
        let info = TokenInfo {
            azp: Some(CLIENT_ID.to_string()),
            sub: Some("42".to_string()),
            exp: Some(json!(1.7e9)),
            ..TokenInfo::default()
        };

        assert_eq!(info.expires_at(), Some(1_700_000_000));
        let err = identity_from_token_info(&info, CLIENT_ID, 1_800_000_000).unwrap_err();
        assert_eq!(err, VerificationError::ExpiredToken);

        let info = TokenInfo {
            expires_in: Some(json!("-5.0")),
            ..TokenInfo::default()
        };
        assert_eq!(info.expires_in(), Some(-5));
    }

    #[test]
    fn test_unreadable_expiry_is_ignored() {
        let info = TokenInfo {
            azp: Some(CLIENT_ID.to_string()),
            sub: Some("42".to_string()),
            exp: Some(json!("soon")),
            expires_in: Some(json!(12.5)),
            ..TokenInfo::default()
        };

        assert_eq!(info.expires_at(), None);
        assert_eq!(info.expires_in(), None);
        assert!(identity_from_token_info(&info, CLIENT_ID, 2000).is_ok());
    }

    #[test]
    fn test_missing_audience_is_invalid_audience() {
        let info = TokenInfo {
            sub: Some("42".to_string()),
            ..TokenInfo::default()
        };

        let err = identity_from_token_info(&info, CLIENT_ID, 0).unwrap_err();
        assert_eq!(err, VerificationError::InvalidAudience);
    }

    #[test]
    fn test_blank_subject_is_invalid_token() {
        let info = TokenInfo {
            aud: Some(CLIENT_ID.to_string()),
            sub: Some("  ".to_string()),
            ..TokenInfo::default()
        };

        let err = identity_from_token_info(&info, CLIENT_ID, 0).unwrap_err();
        assert_eq!(err, VerificationError::InvalidToken);
    }

    #[test]
    fn test_internal_user_id_is_deterministic_and_opaque() {
        let a1 = internal_user_id(Provider::Google, "111111111111111111111");
        let a2 = internal_user_id(Provider::Google, "111111111111111111111");
        let b = internal_user_id(Provider::Google, "222222222222222222222");

        assert_eq!(a1, a2);
        assert_ne!(a1, b);
        assert_eq!(a1.len(), 64);
        assert!(a1.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!a1.contains("111111111111111111111"));
    }

    #[test]
    fn test_internal_user_ids_do_not_collide() {
        let ids: std::collections::HashSet<String> = (0..500)
            .map(|n| internal_user_id(Provider::Google, &n.to_string()))
            .collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_provider_error_classification() {
        assert_eq!(
            VerificationError::from_provider_error("Token EXPIRED"),
            VerificationError::ExpiredToken
        );
        assert_eq!(
            VerificationError::from_provider_error("invalid_token"),
            VerificationError::InvalidToken
        );
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer   abc"), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }

    #[test]
    fn test_identity_serializes_camel_case() {
        let identity = VerifiedIdentity {
            internal_user_id: "id".to_string(),
            email: None,
            email_verified: false,
            provider_subject: "42".to_string(),
            provider: Provider::Google,
            scopes: vec![],
        };

        let value = serde_json::to_value(&identity).unwrap();
        assert_eq!(value["internalUserId"], "id");
        assert_eq!(value["providerSubject"], "42");
        assert_eq!(value["provider"], "google");
    }
}

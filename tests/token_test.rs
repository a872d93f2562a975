mod common;

use checkout_relay::{
    domain::{
        credentials::Credentials, error::GatewayError, mode::ProviderEndpoints,
        provider::OutboundBody,
    },
    services::token::acquire_token,
};
use common::*;
use std::time::Duration;

fn creds() -> Credentials {
    Credentials::new(Some(CLIENT_ID.into()), Some(CLIENT_SECRET.into())).unwrap()
}

// ── 1. token_request_shape ─────────────────────────────────────────────────

#[tokio::test]
async fn token_request_shape() {
    let transport = FakeTransport::new().respond(200, token_body("A21", Some(32400)));
    let endpoints = ProviderEndpoints::from_base(BASE_URL);

    let token = acquire_token(&*transport, &creds(), &endpoints, Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(token.value(), "A21");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.url, format!("{BASE_URL}/v1/oauth2/token"));
    assert_eq!(req.authorization, creds().basic_auth_header());
    assert_eq!(req.body, OutboundBody::Form("grant_type=client_credentials".into()));
    assert_eq!(req.timeout, Duration::from_secs(5));
    assert!(req.idempotency_key.is_none());
}

// ── 2. non_2xx_is_upstream_auth_with_raw_body ──────────────────────────────

#[tokio::test]
async fn non_2xx_is_upstream_auth_with_raw_body() {
    let raw = r#"{"error":"invalid_client","error_description":"Client Authentication failed"}"#;
    let transport = FakeTransport::new().respond(401, raw);
    let endpoints = ProviderEndpoints::from_base(BASE_URL);

    let err = acquire_token(&*transport, &creds(), &endpoints, Duration::from_secs(5))
        .await
        .unwrap_err();
    match err {
        GatewayError::UpstreamAuth { status, body } => {
            assert_eq!(status, Some(401));
            assert_eq!(body, raw);
        }
        other => panic!("expected UpstreamAuth, got {other:?}"),
    }
}

// ── 3. success_without_token_field_is_upstream_auth ────────────────────────

#[tokio::test]
async fn success_without_token_field_is_upstream_auth() {
    let transport = FakeTransport::new().respond(200, r#"{"token_type":"Bearer"}"#);
    let endpoints = ProviderEndpoints::from_base(BASE_URL);

    let err = acquire_token(&*transport, &creds(), &endpoints, Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::UpstreamAuth { status: Some(200), .. }));
}

// ── 4. transport_failure_is_upstream_auth ──────────────────────────────────

#[tokio::test]
async fn transport_failure_is_upstream_auth() {
    let transport = FakeTransport::new().fail("connection refused");
    let endpoints = ProviderEndpoints::from_base(BASE_URL);

    let err = acquire_token(&*transport, &creds(), &endpoints, Duration::from_secs(5))
        .await
        .unwrap_err();
    match err {
        GatewayError::UpstreamAuth { status, body } => {
            assert_eq!(status, None);
            assert!(body.contains("connection refused"));
        }
        other => panic!("expected UpstreamAuth, got {other:?}"),
    }
    assert_eq!(transport.calls(), 1, "no retry");
}

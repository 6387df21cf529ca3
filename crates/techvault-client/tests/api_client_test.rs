//! Integration tests for the bearer-token and refresh-and-retry policy.

use serde_json::{Value, json};
use techvault_client::testing::ScriptedTransport;
use techvault_client::{ApiClient, MemoryStore, RefreshPolicy, paths};
use techvault_core::error::VaultError;
use techvault_core::http::Method;
use techvault_core::models::session::{SessionStatus, TokenPair};

fn signed_in(transport: &ScriptedTransport) -> ApiClient<ScriptedTransport, MemoryStore> {
    let api = ApiClient::new(transport.clone(), MemoryStore::new(), RefreshPolicy::default());
    api.store_tokens(&TokenPair {
        access: "access-1".into(),
        refresh: "refresh-1".into(),
    })
    .unwrap();
    api.set_status(SessionStatus::Authenticated);
    api
}

fn expired() -> Value {
    json!({"detail": "Given token not valid for any token type", "code": "token_not_valid"})
}

#[tokio::test]
async fn refresh_then_replay_with_new_token() {
    let transport = ScriptedTransport::new();
    transport
        .push_json(401, expired())
        .push_json(200, json!({"access": "access-2"}))
        .push_json(200, json!([{"id": 1}]));
    let api = signed_in(&transport);

    let body: Vec<Value> = api.get("/api/servers/").await.unwrap();
    assert_eq!(body.len(), 1);

    let sent = transport.requests();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].bearer.as_deref(), Some("access-1"));

    assert_eq!(sent[1].path, paths::TOKEN_REFRESH);
    assert_eq!(sent[1].method, Method::Post);
    assert_eq!(sent[1].bearer, None);
    assert_eq!(sent[1].body, Some(json!({"refresh": "refresh-1"})));

    assert_eq!(sent[2].path, "/api/servers/");
    assert_eq!(sent[2].bearer.as_deref(), Some("access-2"));
    // The replay is the same logical request.
    assert_eq!(sent[2].request_id, sent[0].request_id);

    assert_eq!(api.access_token().unwrap().as_deref(), Some("access-2"));
    // Server did not rotate: the old refresh token stays.
    assert_eq!(api.refresh_token().unwrap().as_deref(), Some("refresh-1"));
    assert_eq!(api.status(), SessionStatus::Authenticated);
}

#[tokio::test]
async fn rotated_refresh_token_is_stored() {
    let transport = ScriptedTransport::new();
    transport
        .push_json(401, expired())
        .push_json(200, json!({"access": "access-2", "refresh": "refresh-2"}))
        .push_json(200, json!({}));
    let api = signed_in(&transport);

    let _: Value = api.get("/api/user/profile/").await.unwrap();

    assert_eq!(api.refresh_token().unwrap().as_deref(), Some("refresh-2"));
}

#[tokio::test]
async fn second_401_is_not_retried() {
    let transport = ScriptedTransport::new();
    transport
        .push_json(401, expired())
        .push_json(200, json!({"access": "access-2"}))
        .push_json(401, json!({"detail": "still no"}));
    let api = signed_in(&transport);

    let err = api.get::<Value>("/api/passwords/").await.unwrap_err();

    match err {
        VaultError::AuthenticationFailed { reason } => assert_eq!(reason, "still no"),
        other => panic!("expected AuthenticationFailed, got {other:?}"),
    }
    // Original, one refresh, one replay. Nothing more.
    assert_eq!(transport.requests().len(), 3);
    assert_eq!(transport.remaining(), 0);
}

#[tokio::test]
async fn failed_refresh_clears_session() {
    let transport = ScriptedTransport::new();
    transport
        .push_json(401, expired())
        .push_json(401, json!({"detail": "Token is blacklisted"}));
    let api = signed_in(&transport);
    let mut status = api.subscribe();

    let err = api.get::<Value>("/api/configurations/").await.unwrap_err();

    assert!(matches!(err, VaultError::SessionExpired));
    assert!(err.is_auth());
    assert_eq!(api.access_token().unwrap(), None);
    assert_eq!(api.refresh_token().unwrap(), None);
    assert!(status.has_changed().unwrap());
    assert_eq!(*status.borrow_and_update(), SessionStatus::Expired);

    // Later protected calls go out without credentials and are not refreshed.
    transport.push_json(401, json!({"detail": "Authentication credentials were not provided."}));
    let err = api.get::<Value>("/api/configurations/").await.unwrap_err();
    assert!(matches!(err, VaultError::SessionExpired));
    let sent = transport.requests();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[2].bearer, None);
}

#[tokio::test]
async fn missing_refresh_token_skips_refresh_call() {
    let transport = ScriptedTransport::new();
    transport.push_json(401, expired());
    let api = ApiClient::new(transport.clone(), MemoryStore::new(), RefreshPolicy::default());

    let err = api.get::<Value>("/api/backups/").await.unwrap_err();

    assert!(matches!(err, VaultError::SessionExpired));
    assert_eq!(transport.paths(), vec!["/api/backups/".to_string()]);
    assert_eq!(api.status(), SessionStatus::Expired);
}

#[tokio::test]
async fn transport_failure_during_refresh_clears_session() {
    let transport = ScriptedTransport::new();
    transport
        .push_json(401, expired())
        .push_transport_error("connection reset");
    let api = signed_in(&transport);

    let err = api.get::<Value>("/api/voip/").await.unwrap_err();

    assert!(matches!(err, VaultError::SessionExpired));
    assert_eq!(api.access_token().unwrap(), None);
}

#[tokio::test]
async fn transport_failure_on_request_is_not_retried() {
    let transport = ScriptedTransport::new();
    transport.push_transport_error("connection refused");
    let api = signed_in(&transport);

    let err = api.get::<Value>("/api/software/").await.unwrap_err();

    assert!(matches!(err, VaultError::Transport(_)));
    assert_eq!(transport.requests().len(), 1);
    assert_eq!(api.status(), SessionStatus::Authenticated);
}

#[tokio::test]
async fn validation_errors_surface_verbatim() {
    let transport = ScriptedTransport::new();
    transport.push_json(400, json!({"name": ["Organization with this name already exists."]}));
    let api = signed_in(&transport);

    let err = api
        .post::<_, Value>("/api/organizations/", &json!({"name": "Acme"}))
        .await
        .unwrap_err();

    let fields = err.field_errors().expect("validation error");
    assert_eq!(
        fields["name"],
        vec!["Organization with this name already exists."]
    );
}

#[tokio::test]
async fn public_requests_never_refresh() {
    let transport = ScriptedTransport::new();
    transport.push_json(401, json!({"detail": "No active account found with the given credentials"}));
    let api = signed_in(&transport);

    let err = api
        .send_public_json::<Value>(
            techvault_core::http::HttpRequest::post(paths::LOGIN)
                .with_body(json!({"username": "a", "password": "b"})),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, VaultError::AuthenticationFailed { .. }));
    let sent = transport.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].bearer, None);
    // The existing session is untouched by a failed public call.
    assert_eq!(api.access_token().unwrap().as_deref(), Some("access-1"));
}

//! End-to-end session flows against a scripted server.

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use techvault_client::testing::ScriptedTransport;
use techvault_client::{MemoryStore, paths};
use techvault_core::error::VaultError;
use techvault_core::http::HttpResponse;
use techvault_core::models::choices::ChoiceCategory;
use techvault_core::models::configuration::Configuration;
use techvault_core::models::session::{SessionStatus, TokenPair};
use techvault_core::models::user::Credentials;
use techvault_core::storage::{ACCESS_TOKEN_KEY, KeyValueStore, SELECTED_ORGANIZATION_KEY};
use techvault_session::{
    LoginOutcome, ProfileRefetch, RestoreOutcome, TechVault, TechVaultConfig,
};

const ORGANIZATIONS: &str = "/api/organizations/";

type Vault = TechVault<ScriptedTransport, Arc<MemoryStore>>;

fn vault(transport: &ScriptedTransport, store: &Arc<MemoryStore>) -> Vault {
    TechVault::new(transport.clone(), Arc::clone(store), &TechVaultConfig::default())
}

fn tokens() -> Value {
    json!({"access": "access-1", "refresh": "refresh-1", "user": {"id": 1, "username": "alice"}})
}

fn profile() -> Value {
    json!({"id": 1, "username": "alice", "email": "alice@example.com", "full_name": "Alice Smith"})
}

fn organizations() -> Value {
    json!([
        {"id": 1, "name": "Acme"},
        {"id": 2, "name": "Globex"}
    ])
}

fn version(n: u32, content: &str) -> Value {
    json!({
        "version_number": n,
        "snapshot": {"name": "edge-fw", "content": content},
        "created_at": "2025-03-01T12:00:00Z",
        "created_by": {"username": "alice"}
    })
}

/// Script a full login (login, profile, organization list) and run it.
async fn logged_in(transport: &ScriptedTransport, store: &Arc<MemoryStore>) -> Vault {
    transport
        .push_json(200, tokens())
        .push_json(200, profile())
        .push_json(200, organizations());
    let vault = vault(transport, store);
    vault
        .login(&Credentials::new("alice", "correct horse"))
        .await
        .unwrap();
    vault
}

#[tokio::test]
async fn login_loads_profile_and_organizations() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    transport
        .push_json(200, tokens())
        .push_json(200, profile())
        .push_json(200, organizations());
    let vault = vault(&transport, &store);

    let outcome = vault
        .login(&Credentials::new("alice", "correct horse"))
        .await
        .unwrap();

    let LoginOutcome::Authenticated(user) = outcome else {
        panic!("expected an established session");
    };
    assert_eq!(user.display_name(), "Alice Smith");
    assert_eq!(vault.status(), SessionStatus::Authenticated);
    assert_eq!(vault.auth.user().unwrap().email, "alice@example.com");
    assert_eq!(vault.scope.organizations().len(), 2);
    assert_eq!(vault.scope.selected(), None);

    assert_eq!(transport.paths(), vec![paths::LOGIN, paths::PROFILE, ORGANIZATIONS]);
    let sent = transport.requests();
    assert_eq!(sent[0].bearer, None);
    assert_eq!(sent[1].bearer.as_deref(), Some("access-1"));

    let session = vault.auth.session().unwrap().unwrap();
    assert_eq!(session.refresh_token, "refresh-1");
}

#[tokio::test]
async fn two_factor_login_takes_two_steps() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    transport
        .push_json(200, json!({"requires_2fa": true}))
        .push_json(200, tokens())
        .push_json(200, profile())
        .push_json(200, organizations());
    let vault = vault(&transport, &store);

    let credentials = Credentials::new("alice", "correct horse");
    let first = vault.login(&credentials).await.unwrap();
    assert_eq!(first, LoginOutcome::TwoFactorRequired);
    assert_eq!(vault.status(), SessionStatus::Anonymous);
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);

    let second = vault
        .login(&credentials.with_otp("123456"))
        .await
        .unwrap();
    assert!(matches!(second, LoginOutcome::Authenticated(_)));

    let sent = transport.requests();
    assert!(sent[0].body.as_ref().unwrap().get("otp_code").is_none());
    assert_eq!(sent[1].body.as_ref().unwrap()["otp_code"], "123456");
}

#[tokio::test]
async fn wrong_two_factor_code_is_an_authentication_failure() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    transport.push_json(400, json!({"non_field_errors": ["Invalid two-factor code."]}));
    let vault = vault(&transport, &store);

    let err = vault
        .login(&Credentials::new("alice", "correct horse").with_otp("000000"))
        .await
        .unwrap_err();

    match err {
        VaultError::AuthenticationFailed { reason } => {
            assert_eq!(reason, "Invalid two-factor code.")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(vault.status(), SessionStatus::Anonymous);
    assert_eq!(transport.paths(), vec![paths::LOGIN]);
}

#[tokio::test]
async fn repeated_two_factor_prompt_after_a_code_is_rejected() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    transport.push_json(200, json!({"requires_2fa": true}));
    let vault = vault(&transport, &store);

    let err = vault
        .login(&Credentials::new("alice", "correct horse").with_otp("123456"))
        .await
        .unwrap_err();

    assert!(matches!(err, VaultError::AuthenticationFailed { .. }));
    assert_eq!(vault.status(), SessionStatus::Anonymous);
    assert_eq!(vault.auth.user(), None);
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
    assert_eq!(transport.paths(), vec![paths::LOGIN]);
}

#[tokio::test]
async fn field_errors_on_login_stay_validation_errors() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    transport.push_json(400, json!({"username": ["This field is required."]}));
    let vault = vault(&transport, &store);

    let err = vault.login(&Credentials::new("", "x")).await.unwrap_err();

    let fields = err.field_errors().unwrap();
    assert_eq!(fields["username"], vec!["This field is required."]);
}

#[tokio::test]
async fn complete_user_skips_profile_fetch_when_configured() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    transport
        .push_json(200, json!({"access": "a", "refresh": "r", "user": profile()}))
        .push_json(200, organizations());
    let mut config = TechVaultConfig::default();
    config.auth.profile_refetch = ProfileRefetch::WhenIncomplete;
    let vault = TechVault::new(transport.clone(), Arc::clone(&store), &config);

    vault.login(&Credentials::new("alice", "pw")).await.unwrap();

    assert_eq!(transport.paths(), vec![paths::LOGIN, ORGANIZATIONS]);
    assert_eq!(vault.auth.user().unwrap().username, "alice");
}

#[tokio::test]
async fn failed_profile_fetch_leaves_no_session() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    transport
        .push_json(200, tokens())
        .push_json(500, json!({"detail": "boom"}));
    let vault = vault(&transport, &store);

    let err = vault.login(&Credentials::new("alice", "pw")).await.unwrap_err();

    assert!(matches!(err, VaultError::Server { status: 500, .. }));
    assert_eq!(vault.status(), SessionStatus::Anonymous);
    assert_eq!(vault.auth.user(), None);
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn logout_resets_every_store() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    let vault = logged_in(&transport, &store).await;
    vault.scope.set_selected(Some(2)).unwrap();
    transport.push(HttpResponse::empty(204));

    vault.logout().await.unwrap();

    let logout = transport.requests().pop().unwrap();
    assert_eq!(logout.path, paths::LOGOUT);
    assert_eq!(logout.bearer.as_deref(), Some("access-1"));
    assert_eq!(logout.body, Some(json!({"refresh": "refresh-1"})));

    assert_eq!(vault.status(), SessionStatus::Anonymous);
    assert_eq!(vault.auth.user(), None);
    assert!(vault.scope.organizations().is_empty());
    assert_eq!(vault.scope.selected(), None);
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
    assert_eq!(store.get(SELECTED_ORGANIZATION_KEY).unwrap(), None);
}

#[tokio::test]
async fn logout_succeeds_locally_when_server_is_unreachable() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    let vault = logged_in(&transport, &store).await;
    transport.push_transport_error("connection refused");

    vault.logout().await.unwrap();

    assert_eq!(vault.status(), SessionStatus::Anonymous);
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn selection_survives_a_restart() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    let vault = logged_in(&transport, &store).await;
    let selected = vault.scope.set_selected(Some(2)).unwrap().unwrap();
    assert_eq!(selected.name, "Globex");
    drop(vault);

    let restarted = ScriptedTransport::new();
    restarted
        .push_json(200, profile())
        .push_json(200, organizations());
    let vault = TechVault::new(restarted.clone(), Arc::clone(&store), &TechVaultConfig::default());

    let user = vault.start().await.unwrap().unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(vault.status(), SessionStatus::Authenticated);
    assert_eq!(vault.scope.selected_id(), Some(2));
    assert_eq!(restarted.paths(), vec![paths::PROFILE, ORGANIZATIONS]);
}

#[tokio::test]
async fn stale_selection_is_dropped_on_restore() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    store.set(ACCESS_TOKEN_KEY, "access-1").unwrap();
    store.set(SELECTED_ORGANIZATION_KEY, "99").unwrap();
    transport
        .push_json(200, profile())
        .push_json(200, organizations());
    let vault = vault(&transport, &store);

    vault.start().await.unwrap();

    assert_eq!(vault.scope.selected(), None);
    assert_eq!(store.get(SELECTED_ORGANIZATION_KEY).unwrap(), None);
}

#[tokio::test]
async fn selection_on_a_later_page_survives_restore() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    store.set(ACCESS_TOKEN_KEY, "access-1").unwrap();
    store.set(SELECTED_ORGANIZATION_KEY, "3").unwrap();
    transport
        .push_json(200, profile())
        .push_json(
            200,
            json!({
                "count": 3,
                "next": "http://vault/api/organizations/?page=2",
                "results": [{"id": 1, "name": "Acme"}, {"id": 2, "name": "Globex"}]
            }),
        )
        .push_json(
            200,
            json!({"count": 3, "next": null, "results": [{"id": 3, "name": "Initech"}]}),
        );
    let vault = vault(&transport, &store);

    vault.start().await.unwrap();

    assert_eq!(vault.scope.organizations().len(), 3);
    assert_eq!(vault.scope.selected_id(), Some(3));
    assert_eq!(store.get(SELECTED_ORGANIZATION_KEY).unwrap().as_deref(), Some("3"));
    assert_eq!(transport.remaining(), 0);
}

#[tokio::test]
async fn start_without_stored_session_makes_no_requests() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    let vault = vault(&transport, &store);

    assert_eq!(vault.start().await.unwrap(), None);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn unknown_organization_cannot_be_selected() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    let vault = logged_in(&transport, &store).await;

    let err = vault.scope.set_selected(Some(42)).unwrap_err();

    assert!(matches!(err, VaultError::NotFound { .. }));
    assert_eq!(vault.scope.selected(), None);
    assert_eq!(store.get(SELECTED_ORGANIZATION_KEY).unwrap(), None);
}

#[tokio::test]
async fn choices_are_fetched_once() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    transport.push_json(
        200,
        json!({
            "server_type": [{"value": "physical", "label": "Physical"}, ["virtual", "Virtual"]],
            "something_new": [["x", "X"]]
        }),
    );
    let vault = vault(&transport, &store);

    let (a, b) = tokio::join!(
        vault.choices.label(ChoiceCategory::ServerType, "virtual"),
        vault.choices.label(ChoiceCategory::ServerType, "physical"),
    );
    assert_eq!(a, "Virtual");
    assert_eq!(b, "Physical");
    assert_eq!(
        vault.choices.label(ChoiceCategory::ServerType, "mainframe").await,
        "mainframe"
    );
    assert_eq!(transport.paths(), vec![paths::CHOICES]);
    assert_eq!(vault.choices.last_error().await, None);
}

#[tokio::test]
async fn choices_fall_back_when_the_fetch_fails() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    transport.push_json(500, json!({"detail": "down"}));
    let vault = vault(&transport, &store);

    let options = vault.choices.options(ChoiceCategory::BackupType).await;

    assert_eq!(options, vec![ChoiceCategory::BackupType.fallback()]);
    assert!(vault.choices.last_error().await.is_some());
    // The fallback is cached; no second request.
    vault.choices.options(ChoiceCategory::VoipType).await;
    assert_eq!(transport.paths(), vec![paths::CHOICES]);
}

#[tokio::test]
async fn refresh_replaces_the_fallback_after_a_failure() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    transport
        .push_json(500, json!({"detail": "down"}))
        .push_json(200, json!({"server_type": [["virtual", "Virtual"]]}))
        .push_json(503, json!({"detail": "busy"}));
    let vault = vault(&transport, &store);

    assert_eq!(
        vault.choices.options(ChoiceCategory::ServerType).await,
        vec![ChoiceCategory::ServerType.fallback()]
    );
    assert!(vault.choices.last_error().await.is_some());

    let set = vault.choices.refresh().await.unwrap();
    assert_eq!(set.label(ChoiceCategory::ServerType, "virtual"), "Virtual");
    assert_eq!(vault.choices.last_error().await, None);
    assert_eq!(vault.choices.label_by_name("server_type", "virtual").await, "Virtual");
    assert_eq!(vault.choices.label_by_name("no_such_category", "virtual").await, "virtual");

    // A failed refresh keeps the good set and records the error.
    vault.choices.refresh().await.unwrap_err();
    assert_eq!(vault.choices.label(ChoiceCategory::ServerType, "virtual").await, "Virtual");
    assert!(vault.choices.last_error().await.is_some());
    assert_eq!(transport.paths(), vec![paths::CHOICES; 3]);
}

#[tokio::test]
async fn restoring_a_configuration_version_reloads_history_and_entity() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    let vault = vault(&transport, &store);
    vault
        .client()
        .store_tokens(&TokenPair {
            access: "access-1".into(),
            refresh: "refresh-1".into(),
        })
        .unwrap();

    transport
        .push_json(200, json!([version(4, "d"), version(3, "c"), version(2, "b"), version(1, "a")]))
        .push_json(200, json!({"detail": "Restored version 3"}))
        .push_json(
            200,
            json!([version(5, "c"), version(4, "d"), version(3, "c"), version(2, "b"), version(1, "a")]),
        )
        .push_json(
            200,
            json!({"id": 7, "organization": 1, "name": "edge-fw", "content": "c", "version_number": 5}),
        );

    let restored = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&restored);
    let mut history = vault
        .versions::<Configuration>(7)
        .with_listener(move |id, n| seen.lock().unwrap().push((id, n)));

    history.load().await.unwrap();
    assert_eq!(history.versions().len(), 4);
    assert_eq!(history.versions()[1].author().as_deref(), Some("alice"));
    history.toggle(3);

    let outcome = history
        .restore(3, |v| v.snapshot["content"] == "c")
        .await
        .unwrap();

    assert_eq!(outcome, RestoreOutcome::Restored { version_number: 3 });
    assert_eq!(*restored.lock().unwrap(), vec![(7, 3)]);
    assert_eq!(history.versions()[0].version_number, 5);
    assert!(history.is_expanded(3));

    let live = vault.services.configurations.get(7).await.unwrap();
    assert_eq!(live.version_number, 5);
    assert_eq!(live.content, "c");

    let sent = transport.requests();
    assert_eq!(sent[0].path, "/api/configurations/7/versions/");
    assert_eq!(sent[1].path, "/api/configurations/7/restore_version/");
    assert_eq!(sent[1].body, Some(json!({"version_number": 3})));
    assert_eq!(sent[2].path, "/api/configurations/7/versions/");
    assert_eq!(sent[3].path, "/api/configurations/7/");
}

#[tokio::test]
async fn cancelled_restore_sends_nothing() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    transport.push_json(200, json!([version(2, "b"), version(1, "a")]));
    let vault = vault(&transport, &store);
    let mut history = vault.versions::<Configuration>(7);
    history.load().await.unwrap();

    let outcome = history.restore(1, |_| false).await.unwrap();

    assert_eq!(outcome, RestoreOutcome::Cancelled);
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn failed_refresh_ends_the_session_everywhere() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    let vault = logged_in(&transport, &store).await;
    let mut status = vault.client().subscribe();
    transport
        .push_json(401, json!({"detail": "Token expired"}))
        .push_json(401, json!({"detail": "Token is blacklisted"}));

    let result = vault
        .services
        .servers
        .list(&techvault_core::ListQuery::default())
        .await;
    let err = vault.guard(result).unwrap_err();

    assert!(matches!(err, VaultError::SessionExpired));
    assert!(status.has_changed().unwrap());
    assert_eq!(*status.borrow_and_update(), SessionStatus::Expired);
    assert_eq!(vault.auth.user(), None);
    assert!(vault.scope.organizations().is_empty());
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn restore_survives_a_failed_history_reload() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    let vault = vault(&transport, &store);
    vault
        .client()
        .store_tokens(&TokenPair {
            access: "access-1".into(),
            refresh: "refresh-1".into(),
        })
        .unwrap();
    transport
        .push_json(200, json!([version(2, "b"), version(1, "a")]))
        .push_json(200, json!({"detail": "Restored version 1"}))
        .push_transport_error("connection reset");

    let restored = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&restored);
    let mut history = vault
        .versions::<Configuration>(7)
        .with_listener(move |id, n| seen.lock().unwrap().push((id, n)));
    history.load().await.unwrap();

    let outcome = history.restore(1, |_| true).await.unwrap();

    assert!(matches!(outcome, RestoreOutcome::RestoredStale { version_number: 1, .. }));
    assert_eq!(*restored.lock().unwrap(), vec![(7, 1)]);
    assert_eq!(history.versions().len(), 2);
    assert_eq!(transport.remaining(), 0);
}

#[tokio::test]
async fn expired_session_empties_the_scope_without_guard() {
    let transport = ScriptedTransport::new();
    let store = Arc::new(MemoryStore::new());
    let vault = logged_in(&transport, &store).await;
    vault.scope.set_selected(Some(1)).unwrap();
    transport
        .push_json(401, json!({"detail": "Token expired"}))
        .push_json(401, json!({"detail": "Token is blacklisted"}));

    let err = vault
        .services
        .servers
        .list(&techvault_core::ListQuery::default())
        .await
        .unwrap_err();

    assert!(matches!(err, VaultError::SessionExpired));
    assert_eq!(vault.status(), SessionStatus::Expired);
    assert_eq!(vault.scope.selected(), None);
    assert_eq!(vault.scope.selected_id(), None);
    assert!(vault.scope.organizations().is_empty());
    assert!(matches!(
        vault.scope.set_selected(Some(1)),
        Err(VaultError::NotFound { .. })
    ));
    // A forced expiry keeps the persisted choice for the next login.
    assert_eq!(store.get(SELECTED_ORGANIZATION_KEY).unwrap().as_deref(), Some("1"));
}

//! Session lifecycle across separate client instances sharing one
//! credentials file, the way consecutive CLI invocations do.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::Path;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;
use tradepost_application::use_cases::{Login, LoginInput, Logout, RestoreSession, SessionStatus};
use tradepost_application::{AuthenticatedClient, InvalidationReason, SessionEvent};
use tradepost_domain::TokenStatus;
use tradepost_infrastructure::{
    ClientConfig, FileCredentialStore, ReqwestTransport, SystemClock, TokioFileSystem,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type Store = FileCredentialStore<TokioFileSystem>;
type Client = AuthenticatedClient<ReqwestTransport, Store>;

fn open(server: &MockServer, credentials: &Path) -> (Arc<Client>, Arc<Store>) {
    let config = ClientConfig::new(credentials)
        .with_base_url(&server.uri())
        .unwrap();
    let store = Arc::new(FileCredentialStore::new(
        TokioFileSystem::new(),
        credentials.to_path_buf(),
    ));
    let client = Arc::new(AuthenticatedClient::with_options(
        Arc::new(ReqwestTransport::new(&config).unwrap()),
        Arc::clone(&store),
        config.client_options(),
    ));
    (client, store)
}

fn user_json() -> serde_json::Value {
    json!({"id": 7, "email": "bo@example.com", "username": "bo"})
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "A1", "refresh": "R1", "user": user_json()
        })))
        .mount(server)
        .await;
}

async fn login(client: Arc<Client>) {
    Login::new(client)
        .execute(LoginInput {
            login: "bo".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn login_is_picked_up_by_the_next_invocation() {
    let server = MockServer::start().await;
    let dir = tempdir().expect("Failed to create temp directory");
    let credentials = dir.path().join("credentials.json");
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile/"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&server)
        .await;

    let (first, _) = open(&server, &credentials);
    login(first).await;

    let (second, store) = open(&server, &credentials);
    let user = RestoreSession::new(second).execute().await.unwrap();
    let status = SessionStatus::new(store, SystemClock::new())
        .execute()
        .await
        .unwrap();

    assert_eq!(user.map(|u| u.username), Some("bo".to_string()));
    assert_eq!(
        status,
        TokenStatus::Valid {
            seconds_remaining: None,
            can_refresh: true
        }
    );
}

#[tokio::test]
async fn logout_leaves_nothing_behind() {
    let server = MockServer::start().await;
    let dir = tempdir().expect("Failed to create temp directory");
    let credentials = dir.path().join("credentials.json");
    mount_login(&server).await;

    let (client, store) = open(&server, &credentials);
    login(Arc::clone(&client)).await;
    assert!(credentials.exists());

    Logout::new(client).execute().await.unwrap();

    assert!(!credentials.exists());
    let status = SessionStatus::new(store, SystemClock::new())
        .execute()
        .await
        .unwrap();
    assert_eq!(status, TokenStatus::NotAuthenticated);
}

#[tokio::test]
async fn revoked_session_is_cleared_on_restore() {
    let server = MockServer::start().await;
    let dir = tempdir().expect("Failed to create temp directory");
    let credentials = dir.path().join("credentials.json");
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "blacklisted"})))
        .expect(1)
        .mount(&server)
        .await;

    let (first, _) = open(&server, &credentials);
    login(first).await;

    let (second, _) = open(&server, &credentials);
    let mut events = second.subscribe();
    let user = RestoreSession::new(second).execute().await.unwrap();

    assert_eq!(user, None);
    assert!(!credentials.exists());
    match events.try_recv().unwrap() {
        SessionEvent::Invalidated {
            reason: InvalidationReason::RefreshRejected { .. },
        } => {}
        other => panic!("unexpected event: {other:?}"),
    }
}

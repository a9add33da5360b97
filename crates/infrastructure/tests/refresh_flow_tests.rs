//! End-to-end tests of the authenticated client over real HTTP.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use tradepost_application::use_cases::{Catalog, Login, LoginInput};
use tradepost_application::{ApiError, AuthenticatedClient, CredentialStore, SessionEvent};
use tradepost_domain::{ApiRequest, Condition, CredentialKey, CredentialPair, ProductQuery, User};
use tradepost_infrastructure::{
    ClientConfig, FileCredentialStore, ReqwestTransport, TokioFileSystem,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

type Client = AuthenticatedClient<ReqwestTransport, FileCredentialStore<TokioFileSystem>>;

fn user_json() -> serde_json::Value {
    json!({
        "id": 1, "email": "ana@example.com", "username": "ana",
        "first_name": "Ana", "last_name": "", "phone": null, "address": null
    })
}

async fn client_for(
    server: &MockServer,
    dir: &tempfile::TempDir,
    pair: Option<CredentialPair>,
) -> Arc<Client> {
    let config = ClientConfig::new(dir.path().join("credentials.json"))
        .with_base_url(&server.uri())
        .unwrap()
        .with_timeout(Duration::from_secs(5));
    let store = FileCredentialStore::new(TokioFileSystem::new(), config.credentials_path.clone());
    if let Some(pair) = pair {
        store.save_pair(&pair).await.unwrap();
    }
    let transport = ReqwestTransport::new(&config).unwrap();
    Arc::new(AuthenticatedClient::with_options(
        Arc::new(transport),
        Arc::new(store),
        config.client_options(),
    ))
}

#[tokio::test]
async fn expired_access_token_is_refreshed_and_request_replayed() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/auth/profile/"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Given token not valid for any token type",
            "code": "token_not_valid"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .and(body_json(json!({"refresh": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "A2"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile/"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &dir, Some(CredentialPair::new("A1", "R1"))).await;
    let mut events = client.subscribe();

    let user: User = client.get("/api/auth/profile/").await.unwrap();

    assert_eq!(user.username, "ana");
    assert_eq!(
        client.store().load_pair().await.unwrap(),
        Some(CredentialPair::new("A2", "R1"))
    );
    assert!(matches!(events.try_recv().unwrap(), SessionEvent::TokenRefreshed { .. }));
}

#[tokio::test]
async fn missing_refresh_token_never_calls_refresh() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/cart/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "never"})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, &dir, None).await;
    client
        .store()
        .set(CredentialKey::AccessToken, "A1")
        .await
        .unwrap();

    let err = client.request(ApiRequest::get("/api/cart/")).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(client.store().get(CredentialKey::AccessToken).await.unwrap(), None);
}

#[tokio::test]
async fn rejected_refresh_clears_the_credentials_file() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/cart/orders/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is invalid or expired",
            "code": "token_not_valid"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &dir, Some(CredentialPair::new("A1", "R1"))).await;

    let err = client
        .request(ApiRequest::get("/api/cart/orders/"))
        .await
        .unwrap_err();

    assert!(err.is_refresh_failure());
    assert!(!dir.path().join("credentials.json").exists());
}

#[tokio::test]
async fn login_is_sent_without_bearer_and_persists_tokens() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .and(body_json(json!({"login": "ana@example.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "A1", "refresh": "R1", "user": user_json()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &dir, None).await;
    let user = Login::new(client.clone())
        .execute(LoginInput {
            login: "ana@example.com".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();

    assert_eq!(user.display_name(), "Ana");
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(
        client.store().load_pair().await.unwrap(),
        Some(CredentialPair::new("A1", "R1"))
    );
}

#[tokio::test]
async fn product_search_sends_filters_as_query() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/products/"))
        .and(query_param("search", "film camera"))
        .and(query_param("condition", "like-new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 12, "title": "Film camera", "price": "85.00", "condition": "like-new",
             "category_name": "Photography", "seller_name": "ana", "is_available": true}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &dir, None).await;
    let items = Catalog::new(client)
        .search(&ProductQuery {
            search: Some("film camera".into()),
            category: None,
            condition: Some(Condition::LikeNew),
        })
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].price.to_string(), "85.00");
}

#[tokio::test]
async fn validation_errors_surface_with_fields() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/products/create/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "title": ["This field may not be blank."]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, &dir, Some(CredentialPair::new("A1", "R1"))).await;
    let err = client
        .post::<_, serde_json::Value>("/api/products/create/", &json!({"title": ""}))
        .await
        .unwrap_err();

    let ApiError::Status { status, .. } = &err else {
        panic!("expected status error, got {err:?}");
    };
    assert_eq!(status.as_u16(), 400);
    assert_eq!(err.field_errors()["title"], vec!["This field may not be blank."]);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig::new(dir.path().join("credentials.json"))
        .with_base_url("http://127.0.0.1:9")
        .unwrap()
        .with_timeout(Duration::from_secs(2));
    let client = AuthenticatedClient::new(
        Arc::new(ReqwestTransport::new(&config).unwrap()),
        Arc::new(FileCredentialStore::new(TokioFileSystem::new(), config.credentials_path.clone())),
    );

    let err = client.request(ApiRequest::get("/api/products/")).await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
}

//! End-to-end HTTP tests.
//!
//! Each test boots the real router on an ephemeral port with an in-memory
//! database and drives it with a cookie-holding HTTP client, covering the
//! session round trip the service-level tests cannot.

#![allow(clippy::unwrap_used)]

mod common;

use reqwest::StatusCode;
use secrecy::SecretString;
use serde_json::json;

use tradepost_core::Role;
use tradepost_server::config::ServerConfig;
use tradepost_server::state::AppState;
use tradepost_server::{middleware, routes};

use common::{seed_product, seed_user, test_pool};

struct TestServer {
    base_url: String,
    pool: sqlx::SqlitePool,
}

impl TestServer {
    async fn spawn() -> Self {
        let pool = test_pool().await;

        let config = ServerConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://localhost".to_owned(),
            session_secret: SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6!"),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let state = AppState::new(config, pool.clone());

        let session_layer = middleware::create_session_layer(state.pool(), state.config())
            .await
            .unwrap();

        let app = axum::Router::new()
            .merge(routes::routes())
            .layer(session_layer)
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            pool,
        }
    }

    fn client() -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .unwrap()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Log `username` in on a fresh cookie-holding client.
    async fn login(&self, username: &str) -> reqwest::Client {
        let client = Self::client();
        let response = client
            .post(self.url("/auth/login"))
            .json(&json!({ "username": username, "password": "s3cure-enough!" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        client
    }
}

#[tokio::test]
async fn test_register_login_and_whoami() {
    let server = TestServer::spawn().await;
    let client = TestServer::client();

    let response = client
        .post(server.url("/users"))
        .json(&json!({
            "username": "alice",
            "name": "Alice",
            "surname": "Smith",
            "password": "s3cure-enough!",
            "role": "Customer"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Not logged in yet.
    let response = client
        .get(server.url("/auth/current"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .post(server.url("/auth/login"))
        .json(&json!({ "username": "alice", "password": "s3cure-enough!" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(server.url("/auth/current"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], "Customer");
    assert!(body.get("password_hash").is_none());

    // Log out, session is gone.
    let response = client
        .delete(server.url("/auth/current"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .get(server.url("/auth/current"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_with_bad_credentials_is_401() {
    let server = TestServer::spawn().await;
    seed_user(&server.pool, "alice", Role::Customer).await;
    let client = TestServer::client();

    let response = client
        .post(server.url("/auth/login"))
        .json(&json!({ "username": "alice", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Unknown user gets the identical status.
    let response = client
        .post(server.url("/auth/login"))
        .json(&json!({ "username": "ghost", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_review_flow_over_http() {
    let server = TestServer::spawn().await;
    seed_user(&server.pool, "alice", Role::Customer).await;
    seed_product(&server.pool, "Galaxy-S24").await;

    let client = server.login("alice").await;

    let response = client
        .post(server.url("/reviews/Galaxy-S24"))
        .json(&json!({ "score": 5, "comment": "great screen" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // One review per product per user.
    let response = client
        .post(server.url("/reviews/Galaxy-S24"))
        .json(&json!({ "score": 1, "comment": "changed my mind" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .get(server.url("/reviews/Galaxy-S24"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["username"], "alice");
    assert_eq!(body[0]["score"], 5);

    // Out-of-range score is rejected before the service is reached.
    let response = client
        .post(server.url("/reviews/Galaxy-S24"))
        .json(&json!({ "score": 6, "comment": "too good" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Unknown product is a 404.
    let response = client
        .delete(server.url("/reviews/Phantom-X"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .delete(server.url("/reviews/Galaxy-S24"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_role_gates_over_http() {
    let server = TestServer::spawn().await;
    seed_user(&server.pool, "alice", Role::Customer).await;
    seed_user(&server.pool, "mona", Role::Manager).await;
    seed_user(&server.pool, "root", Role::Admin).await;
    seed_product(&server.pool, "Galaxy-S24").await;

    let customer = server.login("alice").await;
    let manager = server.login("mona").await;
    let admin = server.login("root").await;

    // Listing users is admin-only.
    for (client, status) in [
        (&customer, StatusCode::UNAUTHORIZED),
        (&manager, StatusCode::UNAUTHORIZED),
        (&admin, StatusCode::OK),
    ] {
        let response = client.get(server.url("/users")).send().await.unwrap();
        assert_eq!(response.status(), status);
    }

    // Writing reviews is customer-only.
    let body = json!({ "score": 3, "comment": "from the back office" });
    for client in [&manager, &admin] {
        let response = client
            .post(server.url("/reviews/Galaxy-S24"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Bulk review deletion is staff-only.
    let response = customer
        .delete(server.url("/reviews"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = manager
        .delete(server.url("/reviews"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Anonymous callers never get past the session check.
    let anonymous = TestServer::client();
    let response = anonymous.get(server.url("/users")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_management_over_http() {
    let server = TestServer::spawn().await;
    seed_user(&server.pool, "alice", Role::Customer).await;
    seed_user(&server.pool, "bob", Role::Customer).await;
    seed_user(&server.pool, "root", Role::Admin).await;

    let alice = server.login("alice").await;
    let admin = server.login("root").await;

    // Customers cannot read other accounts.
    let response = alice
        .get(server.url("/users/bob"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Self-update round trip.
    let response = alice
        .patch(server.url("/users/alice"))
        .json(&json!({
            "name": "Alicia",
            "surname": "Smithson",
            "address": "1 Main St",
            "birthdate": "1990-06-15"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["name"], "Alicia");
    assert_eq!(body["birthdate"], "1990-06-15");

    // A future birthdate is a 400.
    let response = alice
        .patch(server.url("/users/alice"))
        .json(&json!({
            "name": "Alicia",
            "surname": "Smithson",
            "birthdate": "2999-01-01"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Duplicate registration is a 409.
    let response = TestServer::client()
        .post(server.url("/users"))
        .json(&json!({
            "username": "alice",
            "name": "A",
            "surname": "S",
            "password": "s3cure-enough!",
            "role": "Customer"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Admin deletes a customer; deleting a fellow admin is refused.
    let response = admin
        .delete(server.url("/users/bob"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    seed_user(&server.pool, "root2", Role::Admin).await;
    let response = admin
        .delete(server.url("/users/root2"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = admin
        .get(server.url("/users/roles/Admin"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 2);
}

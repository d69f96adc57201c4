//! End-to-end tests for the HTTP API.
//!
//! Each test builds the full router on a fresh in-memory SQLite database
//! and drives it with `oneshot` requests.

use std::sync::Arc;

use chrono::{Duration, Utc};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use todo_api::api::{create_router, AppState};
use todo_api::config::Config;
use todo_api::domain::UserRole;
use todo_api::infra::{Database, Persistence};
use todo_api::services::{TokenIssuer, UserManager, UserService};

const SECRET: &str = "test-secret-key-for-testing-only-32chars";

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    async fn new() -> Self {
        let mut config = Config::new("sqlite::memory:", SECRET).unwrap();
        // Every pooled connection to `sqlite::memory:` is a separate database
        config.database_max_connections = 1;

        let database = Arc::new(Database::connect(&config).await.unwrap());
        let state = AppState::from_config(database, config);

        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, body)
    }

    async fn register(&self, username: &str, email: Option<&str>) -> (String, String) {
        let mut body = json!({ "username": username, "password": "pw123" });
        if let Some(email) = email {
            body["email"] = json!(email);
        }
        let (status, body) = self
            .request(Method::POST, "/api/auth/register", None, Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);

        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    async fn login(&self, username: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "username": username, "password": "pw123" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// Grant admin the way the CLI does, then sign in again for a fresh token.
    async fn admin(&self, username: &str) -> String {
        self.register(username, None).await;
        self.users()
            .set_role(username, UserRole::Admin)
            .await
            .unwrap();
        self.login(username).await
    }

    fn users(&self) -> UserManager<Persistence> {
        UserManager::new(Arc::new(Persistence::new(self.state.database.get_connection())))
    }

    async fn create_todo(&self, token: &str, title: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/todos",
                Some(token),
                Some(json!({ "title": title })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_str().unwrap().to_string()
    }
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_and_ping() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));

    let (status, body) = app.request(Method::GET, "/ping", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Pong!"));

    let (status, body) = app.request(Method::GET, "/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_ready_reports_outage_without_details() {
    let app = TestApp::new().await;
    app.state.database.get_connection().close().await.unwrap();

    let (status, body) = app.request(Method::GET, "/health/ready", None, None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body,
        json!({ "status": "degraded", "database": { "status": "unhealthy" } })
    );
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = TestApp::new().await;
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    assert_eq!(response.headers()["referrer-policy"], "no-referrer");
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_register_login_and_me() {
    let app = TestApp::new().await;
    let (_, user_id) = app.register("alice", Some("alice@example.com")).await;

    let token = app.login("alice").await;
    let (status, body) = app.request(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user_id.as_str());
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], "user");
    assert!(body.get("passwordHash").is_none());

    // Email works as the login identifier too
    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "pw123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let app = TestApp::new().await;
    app.register("alice", None).await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": "alice", "password": "other" })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "CONFLICT");
}

#[tokio::test]
async fn test_usernames_are_case_insensitive() {
    let app = TestApp::new().await;
    app.register("alice", None).await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": "Alice", "password": "pw123" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "CONFLICT");

    // Any casing signs in to the same account
    let token = app.login("ALICE").await;
    let (_, me) = app.request(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(me["username"], "alice");
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let app = TestApp::new().await;

    for body in [
        json!({ "username": "al", "password": "pw123" }),
        json!({ "username": "alice", "password": "pw" }),
        json!({ "username": "alice", "password": "pw123", "email": "not-an-email" }),
        json!({ "username": "alice", "password": "pw123", "role": "admin" }),
    ] {
        let (status, response) = app
            .request(Method::POST, "/api/auth/register", None, Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(error_code(&response), "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_user() {
    let app = TestApp::new().await;
    app.register("alice", None).await;

    for body in [
        json!({ "username": "alice", "password": "wrong" }),
        json!({ "username": "nobody", "password": "pw123" }),
    ] {
        let (status, response) = app
            .request(Method::POST, "/api/auth/login", None, Some(body))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&response), "INVALID_CREDENTIALS");
    }
}

#[tokio::test]
async fn test_missing_or_bad_token() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/api/todos", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHENTICATED");

    let (status, body) = app
        .request(Method::GET, "/api/todos", Some("not.a.token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "INVALID_TOKEN");
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let app = TestApp::new().await;
    app.register("alice", None).await;
    let alice = app.users().get_by_username("alice").await.unwrap();

    let issuer = TokenIssuer::new(SECRET.as_bytes(), Duration::hours(24));
    let expired = issuer
        .issue_at(&alice, Utc::now() - Duration::hours(25))
        .unwrap();

    let (status, body) = app
        .request(Method::GET, "/api/todos", Some(&expired.token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "EXPIRED_TOKEN");
}

#[tokio::test]
async fn test_bearer_scheme_any_case() {
    let app = TestApp::new().await;
    let (token, _) = app.register("alice", None).await;

    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, format!("bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["username"], "alice");
}

// =============================================================================
// Todos
// =============================================================================

#[tokio::test]
async fn test_alice_todo_lifecycle() {
    let app = TestApp::new().await;
    let (token, user_id) = app.register("alice", None).await;

    let (status, todo) = app
        .request(
            Method::POST,
            "/api/todos",
            Some(&token),
            Some(json!({ "title": "Buy milk", "description": "<p>2 litres</p>" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(todo["title"], "Buy milk");
    assert_eq!(todo["ownerId"], user_id.as_str());
    assert_eq!(todo["completed"], false);
    assert!(todo["createdAt"].is_string());
    let todo_id = todo["id"].as_str().unwrap().to_string();

    let (status, list) = app.request(Method::GET, "/api/todos", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, updated) = app
        .request(
            Method::PATCH,
            &format!("/api/todos/{}", todo_id),
            Some(&token),
            Some(json!({ "completed": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["title"], "Buy milk");

    let (status, stats) = app
        .request(Method::GET, "/api/todos/stats", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats, json!({ "total": 1, "completed": 1, "pending": 0 }));

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/todos/{}", todo_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .request(Method::GET, &format!("/api/todos/{}", todo_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
}

#[tokio::test]
async fn test_blank_title_persists_nothing() {
    let app = TestApp::new().await;
    let (token, _) = app.register("alice", None).await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/todos",
            Some(&token),
            Some(json!({ "title": "   " })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");

    let (_, list) = app.request(Method::GET, "/api/todos", Some(&token), None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_empty_patch_rejected() {
    let app = TestApp::new().await;
    let (token, _) = app.register("alice", None).await;
    let todo_id = app.create_todo(&token, "Buy milk").await;

    let (status, body) = app
        .request(
            Method::PATCH,
            &format!("/api/todos/{}", todo_id),
            Some(&token),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_delete_missing_todo_not_found() {
    let app = TestApp::new().await;
    let (token, _) = app.register("alice", None).await;

    let (status, body) = app
        .request(
            Method::DELETE,
            "/api/todos/00000000-0000-4000-8000-000000000000",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_todo_id_is_validation_error() {
    let app = TestApp::new().await;
    let (token, _) = app.register("alice", None).await;

    let (status, body) = app
        .request(Method::GET, "/api/todos/not-a-uuid", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_non_owner_forbidden_admin_allowed() {
    let app = TestApp::new().await;
    let (alice, alice_id) = app.register("alice", None).await;
    let (bob, _) = app.register("bob", None).await;
    let admin = app.admin("root").await;
    let todo_id = app.create_todo(&alice, "Alice's").await;
    let uri = format!("/api/todos/{}", todo_id);

    let (status, body) = app
        .request(Method::PATCH, &uri, Some(&bob), Some(json!({ "completed": true })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "FORBIDDEN");

    let (status, _) = app.request(Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(
            Method::GET,
            &format!("/api/todos?ownerId={}", alice_id),
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, list) = app
        .request(
            Method::GET,
            &format!("/api/todos?ownerId={}", alice_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, updated) = app
        .request(Method::PATCH, &uri, Some(&admin), Some(json!({ "title": "Renamed" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Renamed");

    let (status, _) = app.request(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// =============================================================================
// Statistics
// =============================================================================

#[tokio::test]
async fn test_global_stats_admin_only() {
    let app = TestApp::new().await;
    let (token, _) = app.register("alice", None).await;

    let (status, body) = app
        .request(Method::GET, "/api/todos/admin/users", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "FORBIDDEN");
}

#[tokio::test]
async fn test_global_stats_cover_every_user() {
    let app = TestApp::new().await;
    let (alice, alice_id) = app.register("alice", Some("alice@example.com")).await;
    let (_, bob_id) = app.register("bob", None).await;
    let admin = app.admin("root").await;

    let first = app.create_todo(&alice, "One").await;
    app.create_todo(&alice, "Two").await;
    app.request(
        Method::PATCH,
        &format!("/api/todos/{}", first),
        Some(&alice),
        Some(json!({ "completed": true })),
    )
    .await;

    let (status, stats) = app
        .request(Method::GET, "/api/todos/admin/users", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalUsers"], 3);
    assert_eq!(stats["totalTodos"], 2);

    let users = stats["users"].as_array().unwrap();
    assert_eq!(users.len(), 3);

    assert_eq!(users[0]["userId"], alice_id.as_str());
    assert_eq!(users[0]["email"], "alice@example.com");
    assert_eq!(users[0]["totalTodos"], 2);
    assert_eq!(users[0]["completed"], 1);
    assert_eq!(users[0]["pending"], 1);

    assert_eq!(users[1]["userId"], bob_id.as_str());
    assert_eq!(users[1]["totalTodos"], 0);
    assert_eq!(users[1]["pending"], 0);

    let sum: u64 = users.iter().map(|u| u["totalTodos"].as_u64().unwrap()).sum();
    assert_eq!(sum, 2);
}

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use routegate_api::config::Config;
use routegate_api::services::Services;
use routegate_auth::{IdentityStore, NewUser, PasswordHasher};
use routegate_contract::{ApiResponse, Client};
use routegate_core::{Method, Role};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    services: Arc<Services>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port.
        let config = Config {
            jwt_secret: JWT_SECRET.to_string(),
            port: 0,
            request_timeout: Duration::from_secs(5),
            token_ttl: chrono::Duration::minutes(10),
            bcrypt_cost: 4,
        };
        let (app, _registry, services) =
            routegate_api::app::build_app(&config).expect("route set is invalid");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            services,
            handle,
        }
    }

    /// Seed a user directly into the store, bypassing the signup route.
    async fn seed_user(&self, email: &str, password: &str, role: Role) {
        let password_hash = self.services.passwords.hash(password).unwrap();
        self.services
            .store
            .insert(NewUser {
                name: "Seeded User".to_string(),
                username: email.split('@').next().unwrap().to_string(),
                email: email.to_string(),
                language: "en".to_string(),
                role,
                password_hash,
            })
            .await
            .unwrap();
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let res = reqwest::Client::new()
            .post(format!("{}/auth/login", self.base_url))
            .json(&json!({"email": email, "password": password}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = res.json().await.unwrap();
        body["data"].as_str().unwrap().to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn home_greets_without_authentication() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(format!("{}/", srv.base_url)).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Hello World");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn signup_creates_a_user_and_rejects_duplicates() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let payload = json!({
        "name": "Alice Johnson",
        "username": "alice",
        "email": "alice@example.com",
        "language": "en",
        "password": "supersecret",
    });

    let res = client
        .post(format!("{}/auth/signup", srv.base_url))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "User registered successfully!");
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert!(body["data"].get("password").is_none());

    // Same email again.
    let res = client
        .post(format!("{}/auth/signup", srv.base_url))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["message"],
        "A user with the provided email or username already exists. Please use different credentials."
    );
}

#[tokio::test]
async fn signup_validation_failures_report_each_field() {
    let srv = TestServer::spawn().await;

    let res = reqwest::Client::new()
        .post(format!("{}/auth/signup", srv.base_url))
        .json(&json!({
            "name": "Bob",
            "username": "bob",
            "email": "not-an-email",
            "language": "en",
            "password": "short",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Validation failed");
    let issues = body["error"]["issues"].as_array().unwrap();
    let fields: Vec<&str> = issues
        .iter()
        .map(|issue| issue["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"username"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

#[tokio::test]
async fn login_rejects_bad_credentials_uniformly() {
    let srv = TestServer::spawn().await;
    srv.seed_user("carol@example.com", "correct-horse", Role::User)
        .await;
    let client = reqwest::Client::new();

    for payload in [
        json!({"email": "carol@example.com", "password": "wrong-horse"}),
        json!({"email": "nobody@example.com", "password": "correct-horse"}),
    ] {
        let res = client
            .post(format!("{}/auth/login", srv.base_url))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["message"], "Invalid email or password");
    }
}

#[tokio::test]
async fn login_issues_a_token_and_never_leaks_the_password() {
    let srv = TestServer::spawn().await;
    srv.seed_user("dave@example.com", "correct-horse", Role::User)
        .await;

    let res = reqwest::Client::new()
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({"email": "dave@example.com", "password": "correct-horse"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let text = res.text().await.unwrap();
    assert!(!text.contains("password"));
    let body: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["message"], "Login successful");
    assert!(!body["data"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn logout_requires_authentication() {
    let srv = TestServer::spawn().await;
    srv.seed_user("erin@example.com", "correct-horse", Role::User)
        .await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/logout", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let token = srv.login("erin@example.com", "correct-horse").await;
    let res = client
        .post(format!("{}/auth/logout", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Logged out successfully");
}

#[tokio::test]
async fn session_cookie_authenticates_like_a_bearer_token() {
    let srv = TestServer::spawn().await;
    srv.seed_user("fay@example.com", "correct-horse", Role::User)
        .await;
    let token = srv.login("fay@example.com", "correct-horse").await;

    let res = reqwest::Client::new()
        .post(format!("{}/auth/logout", srv.base_url))
        .header("Cookie", format!("session={token}"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn expired_tokens_are_rejected_with_a_specific_message() {
    let srv = TestServer::spawn().await;
    srv.seed_user("gil@example.com", "correct-horse", Role::User)
        .await;

    let now = Utc::now().timestamp();
    let claims = json!({
        "sub": 1,
        "uuid": "00000000-0000-0000-0000-000000000000",
        "iat": now - 600,
        "exp": now - 300,
    });
    let stale = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt");

    let res = reqwest::Client::new()
        .post(format!("{}/auth/logout", srv.base_url))
        .bearer_auth(&stale)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Token has expired");
}

#[tokio::test]
async fn user_directory_is_administrators_only() {
    let srv = TestServer::spawn().await;
    srv.seed_user("hank@example.com", "correct-horse", Role::User)
        .await;
    srv.seed_user("root@example.com", "correct-horse", Role::Administrator)
        .await;
    let client = reqwest::Client::new();

    let token = srv.login("hank@example.com", "correct-horse").await;
    let res = client
        .get(format!("{}/users", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let token = srv.login("root@example.com", "correct-horse").await;
    let res = client
        .get(format!("{}/users?page=1&pageSize=1", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Users fetched successfully");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["metadata"]["total"], 2);
    assert_eq!(body["metadata"]["totalPages"], 2);
    assert_eq!(body["metadata"]["currentPage"], 1);
    assert_eq!(body["metadata"]["pageSize"], 1);
    assert!(body["data"][0].get("password").is_none());
}

#[tokio::test]
async fn user_directory_rejects_malformed_pagination() {
    let srv = TestServer::spawn().await;
    srv.seed_user("root@example.com", "correct-horse", Role::Administrator)
        .await;
    let token = srv.login("root@example.com", "correct-horse").await;

    let res = reqwest::Client::new()
        .get(format!("{}/users?page=zero", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["error"]["issues"][0]["field"], "page");
}

#[tokio::test]
async fn typed_client_narrows_replies_by_status_family() {
    let srv = TestServer::spawn().await;
    srv.seed_user("iris@example.com", "correct-horse", Role::Administrator)
        .await;
    let token = srv.login("iris@example.com", "correct-horse").await;

    let client = Client::new(srv.base_url.clone());
    match client.query("/", Method::Get, None).await.unwrap() {
        ApiResponse::Success { code, message, .. } => {
            assert_eq!(code, 200);
            assert_eq!(message, "Hello World");
        }
        other => panic!("expected success, got {other:?}"),
    }

    // Unauthenticated listing narrows to the error envelope.
    match client.query("/users", Method::Get, None).await.unwrap() {
        ApiResponse::Failure { code, .. } => assert_eq!(code, 401),
        other => panic!("expected failure, got {other:?}"),
    }

    let mut client = Client::new(srv.base_url.clone());
    client.auth(token);
    let listed = client
        .query("/users", Method::Get, Some(&json!({"pageSize": 5})))
        .await
        .unwrap();
    match listed {
        ApiResponse::Success { code, metadata, .. } => {
            assert_eq!(code, 200);
            assert_eq!(metadata.unwrap().total, 1);
        }
        other => panic!("expected success, got {other:?}"),
    }
}

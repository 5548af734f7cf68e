//! Shared test harness: an in-memory application with the real router.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, Response, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;
use warden::{
    api::{build_router, ApiState},
    auth::{
        credential_store::CredentialStore, AuthenticationGateway, SigningKeyStore,
        SqlxCredentialStore, TokenService,
    },
    config::ServerConfig,
    storage::{run_migrations, AuditLogRepository, CollegeRecordRepository, DbPool},
};

pub const TEST_SECRET: &[u8] = b"integration-test-secret-32-bytes!";

pub struct TestApp {
    pub pool: DbPool,
    pub router: Router,
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_ttls(Duration::minutes(30), Duration::days(30)).await
}

pub async fn setup_test_app_with_ttls(access_ttl: Duration, refresh_ttl: Duration) -> TestApp {
    // A single never-recycled connection keeps the in-memory database alive
    // for the whole test.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("create sqlite pool");

    run_migrations(&pool).await.expect("run migrations for tests");

    let credential_store = Arc::new(SqlxCredentialStore::new(pool.clone()));
    credential_store.ensure_bootstrap_account().await.expect("seed bootstrap account");

    let token_service =
        TokenService::new(Arc::new(SigningKeyStore::new(TEST_SECRET, access_ttl, refresh_ttl)));
    let audit_repository = Arc::new(AuditLogRepository::new(pool.clone()));
    let gateway = Arc::new(AuthenticationGateway::new(
        credential_store,
        token_service,
        audit_repository,
    ));
    let colleges = Arc::new(CollegeRecordRepository::new(pool.clone()));

    let state = ApiState { gateway, colleges, pool: pool.clone() };
    let router = build_router(state, &ServerConfig::default());

    TestApp { pool, router }
}

pub async fn send_request(
    app: &TestApp,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    };

    app.router.clone().oneshot(request).await.expect("send request")
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("parse JSON body")
}

/// Log in over HTTP and return (access token, refresh token).
pub async fn login(app: &TestApp, username: &str, password: &str) -> (String, String) {
    let response = send_request(
        app,
        Method::POST,
        "/admin/login",
        None,
        Some(serde_json::json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login must succeed");

    let body = read_json(response).await;
    let access = body["jwtToken"].as_str().expect("jwtToken in body").to_string();
    let refresh = body["refreshToken"].as_str().expect("refreshToken in body").to_string();
    (access, refresh)
}

pub async fn count_accounts(app: &TestApp) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM admin_accounts")
        .fetch_one(&app.pool)
        .await
        .expect("count accounts")
}

//! End-to-end tests for the authentication endpoints.

mod common;

use axum::http::{Method, StatusCode};
use chrono::Duration;
use serde_json::json;

use common::{count_accounts, login, read_json, send_request, setup_test_app};

#[tokio::test]
async fn login_with_bootstrap_account_returns_token() {
    let app = setup_test_app().await;

    let response = send_request(
        &app,
        Method::POST,
        "/admin/login",
        None,
        Some(json!({ "username": "admin", "password": "password@123" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "successfully login");
    assert!(!body["jwtToken"].as_str().unwrap().is_empty());
    assert!(!body["refreshToken"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn bad_credentials_get_one_uniform_answer() {
    let app = setup_test_app().await;

    let wrong_password = send_request(
        &app,
        Method::POST,
        "/admin/login",
        None,
        Some(json!({ "username": "admin", "password": "password@124" })),
    )
    .await;
    let unknown_user = send_request(
        &app,
        Method::POST,
        "/admin/login",
        None,
        Some(json!({ "username": "stranger", "password": "password@123" })),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown_user.status(), StatusCode::BAD_REQUEST);

    // Neither response may disclose which factor failed.
    let first = read_json(wrong_password).await;
    let second = read_json(unknown_user).await;
    assert_eq!(first["message"], second["message"]);
}

#[tokio::test]
async fn malformed_login_payload_is_rejected() {
    let app = setup_test_app().await;

    let response = send_request(
        &app,
        Method::POST,
        "/admin/login",
        None,
        Some(json!({ "username": "ab", "password": "short" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_user_without_bearer_is_unauthorized() {
    let app = setup_test_app().await;
    let before = count_accounts(&app).await;

    let response = send_request(
        &app,
        Method::POST,
        "/admin/User",
        None,
        Some(json!({
            "username": "operator",
            "email": "operator@example.com",
            "password": "password@123",
            "excess_level": "read-only"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(count_accounts(&app).await, before, "no account may be created");
}

#[tokio::test]
async fn create_user_with_bearer_creates_login_capable_account() {
    let app = setup_test_app().await;
    let (access, _) = login(&app, "admin", "password@123").await;

    let response = send_request(
        &app,
        Method::POST,
        "/admin/User",
        Some(&access),
        Some(json!({
            "username": "operator",
            "email": "operator@example.com",
            "password": "hunter2hunter2",
            "excess_level": "read-and-write"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["message"], "user created");

    // The new account can log in.
    login(&app, "operator", "hunter2hunter2").await;
}

#[tokio::test]
async fn duplicate_username_is_rejected_with_single_row() {
    let app = setup_test_app().await;
    let (access, _) = login(&app, "admin", "password@123").await;

    let payload = json!({
        "username": "operator",
        "email": "operator@example.com",
        "password": "password@123",
        "excess_level": "full"
    });
    let first =
        send_request(&app, Method::POST, "/admin/User", Some(&access), Some(payload)).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    // Same username, different email.
    let second = send_request(
        &app,
        Method::POST,
        "/admin/User",
        Some(&access),
        Some(json!({
            "username": "operator",
            "email": "other@example.com",
            "password": "password@123",
            "excess_level": "full"
        })),
    )
    .await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    let operators: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM admin_accounts WHERE username = 'operator'")
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(operators, 1);
}

#[tokio::test]
async fn tampered_bearer_is_unauthorized() {
    let app = setup_test_app().await;
    let (access, _) = login(&app, "admin", "password@123").await;

    let mut tampered = access.clone();
    tampered.pop();
    tampered.push('x');

    let response = send_request(&app, Method::POST, "/admin/logout", Some(&tampered), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_returns_usable_access_token() {
    let app = setup_test_app().await;
    let (_, refresh) = login(&app, "admin", "password@123").await;

    let response = send_request(
        &app,
        Method::POST,
        "/admin/refresh",
        None,
        Some(json!({ "refreshToken": refresh })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    let fresh_access = body["jwtToken"].as_str().unwrap();

    // The reissued access token works against a protected route.
    let logout =
        send_request(&app, Method::POST, "/admin/logout", Some(fresh_access), None).await;
    assert_eq!(logout.status(), StatusCode::OK);
}

#[tokio::test]
async fn logout_invalidates_the_refresh_token() {
    let app = setup_test_app().await;
    let (access, refresh) = login(&app, "admin", "password@123").await;

    let logout = send_request(&app, Method::POST, "/admin/logout", Some(&access), None).await;
    assert_eq!(logout.status(), StatusCode::OK);
    let body = read_json(logout).await;
    assert_eq!(body["message"], "logout successfully");

    // The cleared session must reject the old refresh token.
    let refresh_attempt = send_request(
        &app,
        Method::POST,
        "/admin/refresh",
        None,
        Some(json!({ "refreshToken": refresh })),
    )
    .await;
    assert_eq!(refresh_attempt.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn second_login_supersedes_first_session() {
    let app = setup_test_app().await;
    let (_, first_refresh) = login(&app, "admin", "password@123").await;
    // Claim timestamps have one-second granularity; same-second logins
    // would mint byte-identical tokens.
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    let (_, second_refresh) = login(&app, "admin", "password@123").await;

    let stale = send_request(
        &app,
        Method::POST,
        "/admin/refresh",
        None,
        Some(json!({ "refreshToken": first_refresh })),
    )
    .await;
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);

    let live = send_request(
        &app,
        Method::POST,
        "/admin/refresh",
        None,
        Some(json!({ "refreshToken": second_refresh })),
    )
    .await;
    assert_eq!(live.status(), StatusCode::OK);
}

#[tokio::test]
async fn expired_access_token_is_unauthorized() {
    let app = common::setup_test_app_with_ttls(Duration::seconds(-1), Duration::days(30)).await;
    let (access, _) = login(&app, "admin", "password@123").await;

    let response = send_request(&app, Method::POST, "/admin/logout", Some(&access), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_and_root_respond() {
    let app = setup_test_app().await;

    let health = send_request(&app, Method::GET, "/health", None, None).await;
    assert_eq!(health.status(), StatusCode::OK);
    let body = read_json(health).await;
    assert_eq!(body["message"], "It's healthy");

    let root = send_request(&app, Method::GET, "/", None, None).await;
    assert_eq!(root.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_failures_are_audited() {
    let app = setup_test_app().await;

    send_request(
        &app,
        Method::POST,
        "/admin/login",
        None,
        Some(json!({ "username": "admin", "password": "password@999" })),
    )
    .await;

    let failures: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM auth_audit_log WHERE event_type = 'auth.login.failed'",
    )
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(failures, 1);
}

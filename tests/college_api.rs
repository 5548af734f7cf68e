//! End-to-end tests for the bearer-protected college directory.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{login, read_json, send_request, setup_test_app, TestApp};

async fn authed_app() -> (TestApp, String) {
    let app = setup_test_app().await;
    let (access, _) = login(&app, "admin", "password@123").await;
    (app, access)
}

fn northfield() -> serde_json::Value {
    json!({
        "name": "Northfield College",
        "unique_name": "northfield",
        "address": "12 College Road",
        "pin_code": "560001",
        "icon": "northfield.png",
        "strength": 1200
    })
}

#[tokio::test]
async fn college_routes_require_a_bearer() {
    let app = setup_test_app().await;

    let list = send_request(&app, Method::GET, "/admin/college", None, None).await;
    assert_eq!(list.status(), StatusCode::UNAUTHORIZED);

    let create =
        send_request(&app, Method::POST, "/admin/college", None, Some(northfield())).await;
    assert_eq!(create.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_then_list_college() {
    let (app, access) = authed_app().await;

    let create =
        send_request(&app, Method::POST, "/admin/college", Some(&access), Some(northfield()))
            .await;
    assert_eq!(create.status(), StatusCode::CREATED);

    let list = send_request(&app, Method::GET, "/admin/college", Some(&access), None).await;
    assert_eq!(list.status(), StatusCode::OK);
    let body = read_json(list).await;
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["unique_name"], "northfield");
}

#[tokio::test]
async fn duplicate_college_is_rejected() {
    let (app, access) = authed_app().await;

    send_request(&app, Method::POST, "/admin/college", Some(&access), Some(northfield())).await;
    let duplicate =
        send_request(&app, Method::POST, "/admin/college", Some(&access), Some(northfield()))
            .await;
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_college_changes_fields() {
    let (app, access) = authed_app().await;
    send_request(&app, Method::POST, "/admin/college", Some(&access), Some(northfield())).await;

    let update = send_request(
        &app,
        Method::PATCH,
        "/admin/college",
        Some(&access),
        Some(json!({ "unique_name": "northfield", "strength": 1500 })),
    )
    .await;
    assert_eq!(update.status(), StatusCode::OK);

    let list = send_request(&app, Method::GET, "/admin/college", Some(&access), None).await;
    let body = read_json(list).await;
    assert_eq!(body[0]["strength"], 1500);
    // Untouched fields are preserved.
    assert_eq!(body[0]["address"], "12 College Road");
}

#[tokio::test]
async fn update_unknown_college_is_not_found() {
    let (app, access) = authed_app().await;

    let update = send_request(
        &app,
        Method::PATCH,
        "/admin/college",
        Some(&access),
        Some(json!({ "unique_name": "atlantis", "strength": 1 })),
    )
    .await;
    assert_eq!(update.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_college_hides_it_from_default_listing() {
    let (app, access) = authed_app().await;
    send_request(&app, Method::POST, "/admin/college", Some(&access), Some(northfield())).await;

    let delete = send_request(
        &app,
        Method::DELETE,
        "/admin/college",
        Some(&access),
        Some(json!({ "unique_name": "northfield" })),
    )
    .await;
    assert_eq!(delete.status(), StatusCode::OK);

    let list = send_request(&app, Method::GET, "/admin/college", Some(&access), None).await;
    let body = read_json(list).await;
    assert!(body.as_array().unwrap().is_empty());

    // Soft-deleted records stay reachable on request.
    let with_deleted = send_request(
        &app,
        Method::GET,
        "/admin/college?mark_as_deleted=true",
        Some(&access),
        None,
    )
    .await;
    let body = read_json(with_deleted).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn pagination_limits_results() {
    let (app, access) = authed_app().await;

    for index in 0..3 {
        let mut record = northfield();
        record["unique_name"] = json!(format!("college-{index}"));
        record["name"] = json!(format!("College {index}"));
        send_request(&app, Method::POST, "/admin/college", Some(&access), Some(record)).await;
    }

    let page = send_request(
        &app,
        Method::GET,
        "/admin/college?page=1&limit=2",
        Some(&access),
        None,
    )
    .await;
    let body = read_json(page).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let last = send_request(
        &app,
        Method::GET,
        "/admin/college?page=2&limit=2",
        Some(&access),
        None,
    )
    .await;
    let body = read_json(last).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

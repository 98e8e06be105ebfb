//! 认证 API 集成测试

use axum::http::{header, StatusCode};
use chrono::{Duration, Utc};

mod common;
use common::{
    body_json, create_test_app, create_test_jwt_service, login_request, register,
    register_and_login, send_json, PASSWORD,
};

#[tokio::test]
async fn test_login_success() {
    let (app, _) = create_test_app();
    register(&app, "alice", "alice@example.com").await;

    let response = login_request(&app, "/auth/token", "alice@example.com", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["token_type"], "Bearer");
}

#[tokio::test]
async fn test_login_alias_route() {
    let (app, _) = create_test_app();
    register(&app, "alice", "alice@example.com").await;

    let response = login_request(&app, "/token", "alice@example.com", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email() {
    let (app, _) = create_test_app();
    register(&app, "alice", "alice@example.com").await;

    let wrong = login_request(&app, "/auth/token", "alice@example.com", "nope").await;
    assert_eq!(wrong.status(), StatusCode::BAD_REQUEST);
    let wrong = body_json(wrong).await;

    let unknown = login_request(&app, "/auth/token", "bob@example.com", PASSWORD).await;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
    let unknown = body_json(unknown).await;

    // 两种失败对外不可区分
    assert_eq!(wrong["detail"], "Incorrect email or password");
    assert_eq!(wrong["detail"], unknown["detail"]);
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, _) = create_test_app();

    let response = send_json(&app, "GET", "/todos/", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );

    let json = body_json(response).await;
    assert_eq!(json["detail"], "Could not validate credentials");
    assert_eq!(json["code"], 401);
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let (app, _) = create_test_app();

    let response = send_json(&app, "GET", "/todos/", Some("not.a.token"), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let (app, _) = create_test_app();
    register(&app, "alice", "alice@example.com").await;

    let stale = create_test_jwt_service()
        .issue_at("alice@example.com", Utc::now() - Duration::hours(1))
        .unwrap();

    let response = send_json(&app, "GET", "/todos/", Some(&stale), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token() {
    let (app, _) = create_test_app();
    let (_, token) = register_and_login(&app, "alice").await;

    let response = send_json(&app, "POST", "/auth/refresh_token", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["token_type"], "Bearer");
    let refreshed = json["access_token"].as_str().unwrap().to_string();

    let response = send_json(&app, "GET", "/todos/", Some(&refreshed), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_rejects_missing_and_expired_tokens() {
    let (app, _) = create_test_app();
    register(&app, "alice", "alice@example.com").await;

    let response = send_json(&app, "POST", "/auth/refresh_token", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let stale = create_test_jwt_service()
        .issue_at("alice@example.com", Utc::now() - Duration::hours(1))
        .unwrap();
    let response = send_json(&app, "POST", "/auth/refresh_token", Some(&stale), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_of_deleted_user_rejected() {
    let (app, _) = create_test_app();
    let (id, token) = register_and_login(&app, "alice").await;

    let response = send_json(&app, "DELETE", &format!("/users/{}", id), Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send_json(&app, "GET", "/todos/", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_responses_carry_tracking_headers() {
    let (app, _) = create_test_app();

    let response = send_json(&app, "GET", "/todos/", None, None).await;
    let request_id = response
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(response.headers().contains_key("x-trace-id"));

    // 错误响应体中的 request_id 与响应头一致
    let json = body_json(response).await;
    assert_eq!(json["request_id"], request_id.as_str());
}

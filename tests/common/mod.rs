//! 测试公共模块
//! 提供测试辅助函数和测试工具

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use secrecy::Secret;
use serde_json::{json, Value};
use std::sync::Arc;
use todo_service::{
    auth::jwt::JwtService,
    config::{AppConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig, StorageBackend},
    middleware::AppState,
    repository::{MemoryStore, Store},
    routes,
};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";
pub const PASSWORD: &str = "secret";

/// 创建测试配置（内存存储，低开销 Argon2 参数）
pub fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(), // 使用随机端口
            graceful_shutdown_timeout_secs: 5,
            max_body_bytes: 64 * 1024,
        },
        database: DatabaseConfig {
            backend: StorageBackend::Memory,
            url: Secret::new(String::new()),
            max_connections: 5,
            min_connections: 0,
            acquire_timeout_secs: 1,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new(TEST_SECRET.to_string()),
            access_token_exp_secs: 300,
            password_min_length: 4,
            argon2_memory_kib: 8,
            argon2_iterations: 1,
            argon2_parallelism: 1,
        },
    }
}

/// 与测试应用共用同一密钥的令牌服务
pub fn create_test_jwt_service() -> JwtService {
    JwtService::from_config(&create_test_config()).expect("Failed to create test jwt service")
}

/// 基于指定存储创建测试应用状态
pub fn create_test_app_state(store: Arc<dyn Store>) -> Arc<AppState> {
    Arc::new(
        AppState::new(create_test_config(), store).expect("Failed to create test app state"),
    )
}

/// 基于内存存储创建测试应用
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let state = create_test_app_state(Arc::new(MemoryStore::new()));
    (routes::create_router(state.clone()), state)
}

/// 发送请求
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// 发送 JSON 请求，可附带 Bearer 令牌
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
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

    send(app, request).await
}

/// 读取响应体为 JSON
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// 注册用户，返回响应 JSON
pub async fn register(app: &Router, username: &str, email: &str) -> Value {
    let response = send_json(
        app,
        "POST",
        "/users/",
        None,
        Some(json!({ "username": username, "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(response.status(), 201, "registration of {} failed", username);
    body_json(response).await
}

/// 表单登录
pub async fn login_request(app: &Router, uri: &str, email: &str, password: &str) -> Response<Body> {
    let form = format!("username={}&password={}", email, password);
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap();

    send(app, request).await
}

/// 登录并返回访问令牌
pub async fn login(app: &Router, email: &str) -> String {
    let response = login_request(app, "/auth/token", email, PASSWORD).await;
    assert_eq!(response.status(), 200, "login of {} failed", email);
    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// 注册并登录，返回 (用户 id, 令牌)
pub async fn register_and_login(app: &Router, username: &str) -> (i64, String) {
    let email = format!("{}@example.com", username);
    let user = register(app, username, &email).await;
    let token = login(app, &email).await;
    (user["id"].as_i64().unwrap(), token)
}

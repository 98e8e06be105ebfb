//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

use crate::{handlers, middleware::AppState};

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点
    let public_routes = Router::new()
        .route("/", get(handlers::root::index))
        .route("/olamundo", get(handlers::root::ola_mundo))
        .route("/health", get(handlers::health::health_check))
        .route("/health/", get(handlers::health::health_check));

    // 认证路由
    let auth_routes = Router::new()
        .route("/auth/token", post(handlers::auth::login))
        .route("/token", post(handlers::auth::login))
        .route("/auth/refresh_token", post(handlers::auth::refresh_token));

    // 用户管理（修改与删除需要本人令牌）
    let user_routes = Router::new()
        .route(
            "/users",
            get(handlers::user::list_users).post(handlers::user::create_user),
        )
        .route(
            "/users/",
            get(handlers::user::list_users).post(handlers::user::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::user::get_user)
                .put(handlers::user::update_user)
                .delete(handlers::user::delete_user),
        );

    // 待办事项（全部需要认证）
    let todo_routes = Router::new()
        .route(
            "/todos",
            get(handlers::todo::list_todos).post(handlers::todo::create_todo),
        )
        .route(
            "/todos/",
            get(handlers::todo::list_todos).post(handlers::todo::create_todo),
        )
        .route(
            "/todos/{id}",
            patch(handlers::todo::update_todo).delete(handlers::todo::delete_todo),
        );

    let max_body_bytes = state.config.server.max_body_bytes;

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(user_routes)
        .merge(todo_routes)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}

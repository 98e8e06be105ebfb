//! 用户管理的 HTTP 处理器

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    middleware::AppState,
    models::{auth::Message, user::*},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

/// 注册用户
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserPublic>), AppError> {
    let user = state.user_service.create(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// 列出用户
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<UserList>, AppError> {
    Ok(Json(state.user_service.list(page).await?))
}

/// 获取用户详情
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<UserPublic>, AppError> {
    Ok(Json(state.user_service.get(id).await?))
}

/// 更新用户（仅本人）
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserPublic>, AppError> {
    Ok(Json(state.user_service.update(id, req, &user).await?))
}

/// 删除用户（仅本人）
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    state.user_service.delete(id, &user).await?;
    Ok(Json(Message::new("User deleted")))
}

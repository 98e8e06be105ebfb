//! 待办事项的 HTTP 处理器

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    middleware::AppState,
    models::{auth::Message, todo::*},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

/// 创建待办事项
pub async fn create_todo(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoPublic>), AppError> {
    let todo = state.todo_service.create(req, &user).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// 列出当前用户的待办事项
pub async fn list_todos(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<TodoFilter>,
) -> Result<Json<TodoList>, AppError> {
    Ok(Json(state.todo_service.list(filter, &user).await?))
}

/// 部分更新待办事项
pub async fn update_todo(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTodoRequest>,
) -> Result<Json<TodoPublic>, AppError> {
    Ok(Json(state.todo_service.update(id, req, &user).await?))
}

/// 删除待办事项
pub async fn delete_todo(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    state.todo_service.delete(id, &user).await?;
    Ok(Json(Message::new("Task has been deleted successfully.")))
}

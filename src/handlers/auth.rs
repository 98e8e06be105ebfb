//! 认证相关的 HTTP 处理器

use crate::{
    auth::middleware::extract_token,
    error::AppError,
    middleware::AppState,
    models::auth::{LoginForm, TokenResponse},
};
use axum::{extract::State, http::HeaderMap, Form, Json};
use std::sync::Arc;

/// 登录（OAuth2 password 表单，username 字段为邮箱）
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state
        .auth_service
        .authenticate(&form.username, &form.password)
        .await?;

    Ok(Json(TokenResponse::bearer(token)))
}

/// 刷新访问令牌
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    let token = extract_token(&headers)?;
    let token = state.auth_service.refresh(&token).await?;

    Ok(Json(TokenResponse::bearer(token)))
}

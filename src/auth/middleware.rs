//! JWT 认证提取器

use crate::{error::AppError, middleware::AppState, models::user::User};
use axum::{extract::FromRequestParts, http::HeaderMap};
use std::sync::Arc;

/// 当前登录用户，由 Bearer 令牌解析得到
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

// 实现 FromRequestParts 以便在 handler 中直接提取 CurrentUser
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)?;
        let user = state.auth_service.resolve(&token).await?;
        Ok(CurrentUser(user))
    }
}

/// 从 Authorization 头提取令牌（scheme 不区分大小写）
pub fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or(AppError::Unauthenticated)
}

//! PostgreSQL 存储后端

use super::{Store, EMAIL_TAKEN, USERNAME_TAKEN};
use crate::{db, error::AppError};
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgStore {
    pub(crate) db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        match db::health_check(&self.db).await {
            db::HealthStatus::Healthy => Ok(()),
            db::HealthStatus::Unhealthy(msg) => Err(AppError::DependencyUnavailable(msg)),
        }
    }
}

/// 将唯一约束冲突转换为 Conflict，其余错误原样返回
pub(crate) fn map_unique_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_username_key") => AppError::conflict(USERNAME_TAKEN),
                Some("users_email_key") => AppError::conflict(EMAIL_TAKEN),
                other => {
                    tracing::warn!(constraint = ?other, "Unexpected unique violation");
                    AppError::conflict("Resource already exists")
                }
            };
        }
    }
    AppError::Database(err)
}

/// 转义 LIKE 通配符，使用户输入按字面子串匹配
pub(crate) fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

//! 健康检查处理器

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    middleware::AppState,
    models::health::{ComponentStatus, HealthCheck},
};

/// 健康检查
/// 检查存储连通性，失败时返回 503，进程继续提供服务
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthCheck>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthCheck {
                app_status: ComponentStatus::Ok,
                database_status: ComponentStatus::Ok,
                timestamp: Utc::now(),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthCheck {
                    app_status: ComponentStatus::Error,
                    database_status: ComponentStatus::Error,
                    timestamp: Utc::now(),
                }),
            )
        }
    }
}

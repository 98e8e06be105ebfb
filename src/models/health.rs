//! Health check models

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 组件状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Ok,
    Error,
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub app_status: ComponentStatus,
    pub database_status: ComponentStatus,
    pub timestamp: DateTime<Utc>,
}

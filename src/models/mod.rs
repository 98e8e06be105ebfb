//! 数据模型模块
//! 用户、待办事项、认证与健康检查的请求/响应模型

pub mod auth;
pub mod health;
pub mod todo;
pub mod user;

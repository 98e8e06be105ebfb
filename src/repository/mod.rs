//! Database repository layer
//!
//! 存储抽象：用户凭据与待办事项的持久化接口，提供 PostgreSQL 与内存两种实现。
//! 唯一性约束（用户名、邮箱）由存储层负责，违反时返回 `AppError::Conflict`。

pub mod memory;
pub mod pg_store;
pub mod todo_repo;
pub mod user_repo;

pub use memory::MemoryStore;
pub use pg_store::PgStore;

use crate::{
    error::AppError,
    models::{
        todo::{CreateTodoRequest, Todo, TodoFilter, UpdateTodoRequest},
        user::{NewUser, User, UserChanges},
    },
};
use async_trait::async_trait;

pub const USERNAME_TAKEN: &str = "Username already exists";
pub const EMAIL_TAKEN: &str = "Email already exists";

/// 用户凭据存储
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// 按 id 升序分页列出用户
    async fn list_users(&self, offset: i64, limit: Option<i64>) -> Result<Vec<User>, AppError>;

    /// 创建用户，用户名或邮箱重复时返回 Conflict
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError>;

    /// 部分更新，用户不存在时返回 None
    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<Option<User>, AppError>;

    /// 删除用户及其全部待办事项
    async fn delete_user(&self, id: i64) -> Result<bool, AppError>;
}

/// 待办事项存储，所有查询都限定在 owner 范围内
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn create_todo(&self, owner_id: i64, req: &CreateTodoRequest) -> Result<Todo, AppError>;

    /// 过滤后按 id 升序分页
    async fn list_todos(&self, owner_id: i64, filter: &TodoFilter) -> Result<Vec<Todo>, AppError>;

    async fn update_todo(
        &self,
        owner_id: i64,
        id: i64,
        changes: &UpdateTodoRequest,
    ) -> Result<Option<Todo>, AppError>;

    async fn delete_todo(&self, owner_id: i64, id: i64) -> Result<bool, AppError>;
}

/// 完整的存储后端
#[async_trait]
pub trait Store: UserRepository + TodoRepository {
    /// 轻量连通性检查
    async fn ping(&self) -> Result<(), AppError>;
}

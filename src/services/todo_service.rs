//! 待办事项服务，所有操作限定在当前用户范围内

use crate::{
    error::AppError,
    models::{todo::*, user::User},
    repository::Store,
};
use std::sync::Arc;
use validator::Validate;

const TASK_NOT_FOUND: &str = "Task not found.";

pub struct TodoService {
    store: Arc<dyn Store>,
}

impl TodoService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// 创建待办事项，所有者始终为当前用户
    pub async fn create(
        &self,
        req: CreateTodoRequest,
        current_user: &User,
    ) -> Result<TodoPublic, AppError> {
        req.validate()?;

        let todo = self.store.create_todo(current_user.id, &req).await?;
        tracing::debug!(todo_id = todo.id, owner_id = current_user.id, "Todo created");

        Ok(todo.into())
    }

    /// 列出当前用户的待办事项
    pub async fn list(&self, filter: TodoFilter, current_user: &User) -> Result<TodoList, AppError> {
        filter.validate()?;

        let todos = self.store.list_todos(current_user.id, &filter).await?;

        Ok(TodoList {
            todos: todos.into_iter().map(TodoPublic::from).collect(),
        })
    }

    /// 部分更新
    pub async fn update(
        &self,
        id: i64,
        req: UpdateTodoRequest,
        current_user: &User,
    ) -> Result<TodoPublic, AppError> {
        req.validate()?;

        let todo = self
            .store
            .update_todo(current_user.id, id, &req)
            .await?
            .ok_or_else(|| AppError::not_found(TASK_NOT_FOUND))?;

        tracing::debug!(todo_id = todo.id, "Todo updated");

        Ok(todo.into())
    }

    /// 删除待办事项
    pub async fn delete(&self, id: i64, current_user: &User) -> Result<(), AppError> {
        if !self.store.delete_todo(current_user.id, id).await? {
            return Err(AppError::not_found(TASK_NOT_FOUND));
        }

        tracing::debug!(todo_id = id, "Todo deleted");

        Ok(())
    }
}

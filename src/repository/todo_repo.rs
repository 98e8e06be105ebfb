//! Todo repository (数据库访问层)

use super::{pg_store::like_pattern, PgStore, TodoRepository};
use crate::{error::AppError, models::todo::*};
use async_trait::async_trait;

/// 空字符串过滤条件视为未提供
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[async_trait]
impl TodoRepository for PgStore {
    /// 创建待办事项
    async fn create_todo(&self, owner_id: i64, req: &CreateTodoRequest) -> Result<Todo, AppError> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (title, description, state, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.state)
        .bind(owner_id)
        .fetch_one(&self.db)
        .await?;

        Ok(todo)
    }

    /// 列出待办事项
    async fn list_todos(&self, owner_id: i64, filter: &TodoFilter) -> Result<Vec<Todo>, AppError> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT * FROM todos
            WHERE owner_id = $1
              AND ($2::text IS NULL OR title ILIKE $2)
              AND ($3::text IS NULL OR description ILIKE $3)
              AND ($4::text IS NULL OR state = $4)
            ORDER BY id ASC
            OFFSET $5
            LIMIT $6
            "#,
        )
        .bind(owner_id)
        .bind(non_empty(&filter.title).map(like_pattern))
        .bind(non_empty(&filter.description).map(like_pattern))
        .bind(filter.state)
        .bind(filter.offset.unwrap_or(0))
        .bind(filter.limit)
        .fetch_all(&self.db)
        .await?;

        Ok(todos)
    }

    /// 更新待办事项（仅更新提供的字段）
    async fn update_todo(
        &self,
        owner_id: i64,
        id: i64,
        changes: &UpdateTodoRequest,
    ) -> Result<Option<Todo>, AppError> {
        let mut tx = self.db.begin().await?;

        let todo = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                state = COALESCE($5, state),
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.state)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(todo)
    }

    /// 删除待办事项
    async fn delete_todo(&self, owner_id: i64, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

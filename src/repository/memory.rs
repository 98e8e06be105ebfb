//! 内存存储后端
//! 所有表由同一把读写锁保护，检查与写入在同一临界区内完成，保证唯一性约束

use super::{Store, TodoRepository, UserRepository, EMAIL_TAKEN, USERNAME_TAKEN};
use crate::{
    error::AppError,
    models::{
        todo::{CreateTodoRequest, Todo, TodoFilter, UpdateTodoRequest},
        user::{NewUser, User, UserChanges},
    },
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    todos: BTreeMap<i64, Todo>,
    last_user_id: i64,
    last_todo_id: i64,
}

impl Tables {
    /// 检查用户名/邮箱是否被其他用户占用
    fn check_unique(
        &self,
        exclude_id: Option<i64>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<(), AppError> {
        let others = self
            .users
            .values()
            .filter(|u| Some(u.id) != exclude_id);

        for user in others {
            if username == Some(user.username.as_str()) {
                return Err(AppError::conflict(USERNAME_TAKEN));
            }
            if email == Some(user.email.as_str()) {
                return Err(AppError::conflict(EMAIL_TAKEN));
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn paginate<T>(items: impl Iterator<Item = T>, offset: i64, limit: Option<i64>) -> Vec<T> {
    let skipped = items.skip(offset.max(0) as usize);
    match limit {
        Some(limit) => skipped.take(limit.max(0) as usize).collect(),
        None => skipped.collect(),
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn list_users(&self, offset: i64, limit: Option<i64>) -> Result<Vec<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(paginate(tables.users.values().cloned(), offset, limit))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        tables.check_unique(None, Some(&new_user.username), Some(&new_user.email))?;

        tables.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.last_user_id,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Ok(None);
        }
        tables.check_unique(Some(id), changes.username.as_deref(), changes.email.as_deref())?;

        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.todos.retain(|_, todo| todo.owner_id != id);
        Ok(true)
    }
}

#[async_trait]
impl TodoRepository for MemoryStore {
    async fn create_todo(&self, owner_id: i64, req: &CreateTodoRequest) -> Result<Todo, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&owner_id) {
            return Err(AppError::not_found("User ID not found"));
        }

        tables.last_todo_id += 1;
        let now = Utc::now();
        let todo = Todo {
            id: tables.last_todo_id,
            title: req.title.clone(),
            description: req.description.clone(),
            state: req.state,
            owner_id,
            created_at: now,
            updated_at: now,
        };
        tables.todos.insert(todo.id, todo.clone());

        Ok(todo)
    }

    async fn list_todos(&self, owner_id: i64, filter: &TodoFilter) -> Result<Vec<Todo>, AppError> {
        let tables = self.tables.read().await;
        let matching = tables
            .todos
            .values()
            .filter(|t| t.owner_id == owner_id && filter.matches(t))
            .cloned();

        Ok(paginate(matching, filter.offset.unwrap_or(0), filter.limit))
    }

    async fn update_todo(
        &self,
        owner_id: i64,
        id: i64,
        changes: &UpdateTodoRequest,
    ) -> Result<Option<Todo>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(todo) = tables.todos.get_mut(&id).filter(|t| t.owner_id == owner_id) else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            todo.title = title.clone();
        }
        if let Some(description) = &changes.description {
            todo.description = description.clone();
        }
        if let Some(state) = changes.state {
            todo.state = state;
        }
        todo.updated_at = Utc::now();

        Ok(Some(todo.clone()))
    }

    async fn delete_todo(&self, owner_id: i64, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .todos
            .get(&id)
            .is_some_and(|t| t.owner_id == owner_id);
        if owned {
            tables.todos.remove(&id);
        }
        Ok(owned)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

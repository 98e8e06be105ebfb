//! 用户服务：注册、查询、更新、删除

use crate::{
    auth::password::PasswordHasher,
    config::SecurityConfig,
    error::AppError,
    models::user::*,
    repository::{Store, EMAIL_TAKEN, USERNAME_TAKEN},
    services::AuthService,
};
use std::sync::Arc;
use validator::Validate;

const USER_NOT_FOUND: &str = "User ID not found";

pub struct UserService {
    store: Arc<dyn Store>,
    hasher: Arc<PasswordHasher>,
    auth_service: Arc<AuthService>,
    policy: SecurityConfig,
}

impl UserService {
    pub fn new(
        store: Arc<dyn Store>,
        hasher: Arc<PasswordHasher>,
        auth_service: Arc<AuthService>,
        policy: SecurityConfig,
    ) -> Self {
        Self {
            store,
            hasher,
            auth_service,
            policy,
        }
    }

    /// 注册用户
    pub async fn create(&self, req: CreateUserRequest) -> Result<UserPublic, AppError> {
        req.validate()?;
        PasswordHasher::validate_password_policy(&req.password, &self.policy)?;

        // 预检查给出明确提示，并发写入由存储层唯一约束兜底
        if self.store.find_user_by_username(&req.username).await?.is_some() {
            return Err(AppError::conflict(USERNAME_TAKEN));
        }
        if self.store.find_user_by_email(&req.email).await?.is_some() {
            return Err(AppError::conflict(EMAIL_TAKEN));
        }

        let new_user = NewUser {
            username: req.username,
            email: req.email,
            password_hash: self.hasher.hash(&req.password)?,
        };
        let user = self.store.create_user(new_user).await?;

        tracing::info!(user_id = user.id, username = %user.username, "User created");

        Ok(user.into())
    }

    /// 获取用户
    pub async fn get(&self, id: i64) -> Result<UserPublic, AppError> {
        self.store
            .find_user(id)
            .await?
            .map(UserPublic::from)
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))
    }

    /// 列出用户
    pub async fn list(&self, page: Pagination) -> Result<UserList, AppError> {
        if page.offset.is_some_and(|o| o < 0) || page.limit.is_some_and(|l| l < 0) {
            return Err(AppError::validation(
                "offset and limit must not be negative",
            ));
        }

        let users = self
            .store
            .list_users(page.offset.unwrap_or(0), page.limit)
            .await?;

        Ok(UserList {
            users: users.into_iter().map(UserPublic::from).collect(),
        })
    }

    /// 更新用户（仅本人）
    pub async fn update(
        &self,
        id: i64,
        req: UpdateUserRequest,
        current_user: &User,
    ) -> Result<UserPublic, AppError> {
        self.auth_service.authorize_owner(id, current_user)?;
        req.validate()?;

        let password_hash = match &req.password {
            Some(password) => {
                PasswordHasher::validate_password_policy(password, &self.policy)?;
                Some(self.hasher.hash(password)?)
            }
            None => None,
        };

        let changes = UserChanges {
            username: req.username,
            email: req.email,
            password_hash,
        };

        let user = self
            .store
            .update_user(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;

        tracing::info!(user_id = user.id, "User updated");

        Ok(user.into())
    }

    /// 删除用户（仅本人），其待办事项一并删除
    pub async fn delete(&self, id: i64, current_user: &User) -> Result<(), AppError> {
        self.auth_service.authorize_owner(id, current_user)?;

        if !self.store.delete_user(id).await? {
            return Err(AppError::not_found(USER_NOT_FOUND));
        }

        tracing::info!(user_id = id, "User deleted");

        Ok(())
    }
}

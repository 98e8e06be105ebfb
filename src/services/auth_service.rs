//! 认证服务：登录、令牌解析、令牌刷新、所有权校验

use crate::{
    auth::{jwt::JwtService, password::PasswordHasher},
    error::AppError,
    models::user::User,
    repository::Store,
};
use std::sync::Arc;

pub struct AuthService {
    store: Arc<dyn Store>,
    jwt_service: Arc<JwtService>,
    hasher: Arc<PasswordHasher>,
    /// 邮箱不存在时用于校验的占位哈希，使两种失败耗时一致
    dummy_hash: String,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn Store>,
        jwt_service: Arc<JwtService>,
        hasher: Arc<PasswordHasher>,
    ) -> Result<Self, AppError> {
        let dummy_hash = hasher.hash("dummy-password-for-unknown-email")?;

        Ok(Self {
            store,
            jwt_service,
            hasher,
            dummy_hash,
        })
    }

    /// 用户登录，邮箱不存在与密码错误返回同一错误
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String, AppError> {
        let Some(user) = self.store.find_user_by_email(email).await? else {
            self.hasher.verify(password, &self.dummy_hash);
            tracing::info!(email = %email, reason = "unknown_email", "Login failed");
            return Err(AppError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash) {
            tracing::info!(user_id = user.id, reason = "wrong_password", "Login failed");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.issue(&user.email)?;
        tracing::info!(user_id = user.id, "Login succeeded");

        Ok(token)
    }

    /// 将令牌解析为当前用户
    pub async fn resolve(&self, token: &str) -> Result<User, AppError> {
        let subject = self.jwt_service.validate(token).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            AppError::Unauthenticated
        })?;

        // 用户可能在令牌签发后被删除
        self.store
            .find_user_by_email(&subject)
            .await?
            .ok_or_else(|| {
                tracing::debug!(subject = %subject, "Token subject has no matching user");
                AppError::Unauthenticated
            })
    }

    /// 刷新令牌：先完整校验旧令牌，再为同一用户签发新令牌
    pub async fn refresh(&self, token: &str) -> Result<String, AppError> {
        let user = self.resolve(token).await?;
        let token = self.issue(&user.email)?;
        tracing::debug!(user_id = user.id, "Token refreshed");

        Ok(token)
    }

    /// 资源所有者必须是当前用户
    pub fn authorize_owner(&self, owner_id: i64, current_user: &User) -> Result<(), AppError> {
        if owner_id != current_user.id {
            tracing::warn!(
                user_id = current_user.id,
                owner_id = owner_id,
                "Ownership check failed"
            );
            return Err(AppError::Forbidden);
        }
        Ok(())
    }

    fn issue(&self, subject: &str) -> Result<String, AppError> {
        self.jwt_service
            .issue(subject)
            .map_err(|e| AppError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::user::NewUser,
        repository::{MemoryStore, UserRepository},
    };
    use chrono::{Duration, Utc};

    const SECRET: &str = "test_secret_key_32_characters_long!";

    async fn setup() -> (AuthService, Arc<JwtService>, User) {
        let store = Arc::new(MemoryStore::new());
        let hasher = Arc::new(PasswordHasher::with_params(8, 1, 1).unwrap());
        let jwt = Arc::new(JwtService::new(SECRET, 1800).unwrap());

        let user = store
            .create_user(NewUser {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password_hash: hasher.hash("secret").unwrap(),
            })
            .await
            .unwrap();

        let service = AuthService::new(store, jwt.clone(), hasher).unwrap();
        (service, jwt, user)
    }

    #[tokio::test]
    async fn test_authenticate_and_resolve() {
        let (service, _, user) = setup().await;

        let token = service.authenticate("alice@example.com", "secret").await.unwrap();
        let resolved = service.resolve(&token).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_alike() {
        let (service, _, _) = setup().await;

        let wrong = service.authenticate("alice@example.com", "nope").await.unwrap_err();
        let unknown = service.authenticate("bob@example.com", "secret").await.unwrap_err();

        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unknown_email_still_runs_verification() {
        let (service, _, _) = setup().await;

        // 占位哈希是合法的 PHC 串，校验会真正执行 Argon2
        assert!(service.dummy_hash.starts_with("$argon2id$"));
        assert!(!service.hasher.verify("secret", &service.dummy_hash));
        assert!(service
            .hasher
            .verify("dummy-password-for-unknown-email", &service.dummy_hash));
    }

    #[tokio::test]
    async fn test_expired_token_cannot_refresh() {
        let (service, jwt, _) = setup().await;
        let stale = jwt
            .issue_at("alice@example.com", Utc::now() - Duration::hours(1))
            .unwrap();

        assert!(matches!(
            service.refresh(&stale).await,
            Err(AppError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_token_for_unknown_subject_rejected() {
        let (service, jwt, _) = setup().await;
        let token = jwt.issue("ghost@example.com").unwrap();

        assert!(matches!(
            service.resolve(&token).await,
            Err(AppError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_authorize_owner() {
        let (service, _, user) = setup().await;

        assert!(service.authorize_owner(user.id, &user).is_ok());
        assert!(matches!(
            service.authorize_owner(user.id + 1, &user),
            Err(AppError::Forbidden)
        ));
    }
}

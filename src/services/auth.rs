use crate::{
    error::{AppError, AppResult},
    models::{CreateUserRequest, LoginRequest, RegisterRequest, UserInfo},
    repositories::UserRepository,
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tokio::task;

pub const DEMO_USER_NAME: &str = "Demo User";
pub const DEMO_USER_EMAIL: &str = "demo@test.com";
pub const DEMO_USER_PASSWORD: &str = "demo123";

/// 生成加盐的argon2密码哈希
pub fn hash_password(plain: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("密码哈希失败: {}", e)))
}

/// 校验密码，哈希格式无效时视为不匹配
pub fn verify_password(plain: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// 认证服务
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
}

impl AuthService {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    /// 注册新用户，邮箱重复时返回 `Ok(None)`
    pub async fn register(&self, request: RegisterRequest) -> AppResult<Option<UserInfo>> {
        let name = request.name.trim().to_string();
        let email = request.email.trim().to_string();

        if name.is_empty() || email.is_empty() || request.password.is_empty() {
            return Err(AppError::bad_request("Name, email and password are required"));
        }

        let password = request.password;
        let password_hash = task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))??;

        let user = self
            .users
            .create(CreateUserRequest {
                name,
                email,
                password_hash,
            })
            .await?;

        if let Some(user) = &user {
            tracing::info!("新用户注册成功: {} (ID: {})", user.email, user.id);
        }

        Ok(user.map(UserInfo::from))
    }

    /// 校验登录凭据，失败时返回 `Ok(None)`
    pub async fn login(&self, request: LoginRequest) -> AppResult<Option<UserInfo>> {
        let email = request.email.trim();
        if email.is_empty() || request.password.is_empty() {
            return Ok(None);
        }

        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::debug!("登录失败，用户不存在: {}", email);
            return Ok(None);
        };

        let password = request.password;
        let stored_hash = user.password.clone();
        let matches = task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

        if !matches {
            tracing::debug!("登录失败，密码错误: {}", email);
            return Ok(None);
        }

        tracing::info!("用户登录成功: {} (ID: {})", user.email, user.id);
        Ok(Some(user.into()))
    }

    /// 用户ID是否存在
    pub async fn user_exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.users.find_by_id(id).await?.is_some())
    }

    /// 确保演示账号存在
    pub async fn ensure_demo_user(&self) -> AppResult<()> {
        if self.users.find_by_email(DEMO_USER_EMAIL).await?.is_some() {
            return Ok(());
        }

        let created = self
            .register(RegisterRequest {
                name: DEMO_USER_NAME.to_string(),
                email: DEMO_USER_EMAIL.to_string(),
                password: DEMO_USER_PASSWORD.to_string(),
            })
            .await?;

        if let Some(user) = created {
            tracing::info!("已创建演示账号: {} (ID: {})", user.email, user.id);
        }
        Ok(())
    }
}

use crate::{
    database::Database,
    error::AppResult,
    models::{CreateUserRequest, User},
};

/// 用户仓库
#[derive(Clone)]
pub struct UserRepository {
    db: Database,
}

impl UserRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 创建用户
    ///
    /// 邮箱已存在时返回 `Ok(None)`，不会写入任何记录。
    pub async fn create(&self, request: CreateUserRequest) -> AppResult<Option<User>> {
        let now = chrono::Utc::now();

        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, email, password, created_at
            "#,
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.password_hash)
        .bind(now)
        .fetch_one(self.db.pool())
        .await;

        match result {
            Ok(user) => Ok(Some(user)),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                tracing::debug!("邮箱已被注册: {}", request.email);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 根据邮箱查找用户
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(user)
    }

    /// 根据ID查找用户
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(user)
    }

    /// 列出所有用户，按ID倒序
    pub async fn list_all(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, created_at
            FROM users
            ORDER BY id DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(users)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }
}

use crate::{
    database::Database,
    error::AppResult,
    models::{AnalysisRecord, CreateAnalysisRecord},
};

/// 每个用户默认返回的历史记录条数
pub const DEFAULT_HISTORY_LIMIT: i64 = 10;

/// 分析历史仓库
#[derive(Clone)]
pub struct AnalysisHistoryRepository {
    db: Database,
}

impl AnalysisHistoryRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 追加一条分析记录
    pub async fn create(&self, request: CreateAnalysisRecord) -> AppResult<AnalysisRecord> {
        let now = chrono::Utc::now();

        let record = sqlx::query_as::<_, AnalysisRecord>(
            r#"
            INSERT INTO analysis_history (
                user_id, file_name, file_size, file_type, is_ai, confidence, verdict, timestamp
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id, user_id, file_name, file_size, file_type, is_ai, confidence, verdict, timestamp
            "#,
        )
        .bind(request.user_id)
        .bind(request.file_name)
        .bind(request.file_size)
        .bind(request.file_type)
        .bind(request.is_ai)
        .bind(request.confidence)
        .bind(request.verdict)
        .bind(now)
        .fetch_one(self.db.pool())
        .await?;

        Ok(record)
    }

    /// 查询用户最近的分析记录，最新的在前
    pub async fn list_recent(&self, user_id: i64, limit: i64) -> AppResult<Vec<AnalysisRecord>> {
        let records = sqlx::query_as::<_, AnalysisRecord>(
            r#"
            SELECT id, user_id, file_name, file_size, file_type, is_ai, confidence, verdict, timestamp
            FROM analysis_history
            WHERE user_id = ?
            ORDER BY timestamp DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        Ok(records)
    }

    /// 列出全部记录（运维工具使用）
    pub async fn list_all(&self) -> AppResult<Vec<AnalysisRecord>> {
        let records = sqlx::query_as::<_, AnalysisRecord>(
            r#"
            SELECT id, user_id, file_name, file_size, file_type, is_ai, confidence, verdict, timestamp
            FROM analysis_history
            ORDER BY id DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(records)
    }

    pub async fn count_for_user(&self, user_id: i64) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM analysis_history WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_one(self.db.pool())
        .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateUserRequest;
    use crate::repositories::UserRepository;

    async fn setup() -> (AnalysisHistoryRepository, i64, i64) {
        let db = Database::in_memory().await.unwrap();
        let users = UserRepository::new(db.clone());
        let mut ids = Vec::new();
        for email in ["a@example.com", "b@example.com"] {
            let user = users
                .create(CreateUserRequest {
                    name: "User".to_string(),
                    email: email.to_string(),
                    password_hash: "hash".to_string(),
                })
                .await
                .unwrap()
                .unwrap();
            ids.push(user.id);
        }
        (AnalysisHistoryRepository::new(db), ids[0], ids[1])
    }

    fn record(user_id: i64, name: &str) -> CreateAnalysisRecord {
        CreateAnalysisRecord {
            user_id,
            file_name: name.to_string(),
            file_size: "1.00 KB".to_string(),
            file_type: "image/png".to_string(),
            is_ai: Some(true),
            confidence: 91.25,
            verdict: "AI Generated".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_record() {
        let (repo, alice, _) = setup().await;

        let saved = repo.create(record(alice, "x.png")).await.unwrap();
        assert_eq!(saved.user_id, Some(alice));
        assert_eq!(saved.is_ai, Some(true));
        assert_eq!(saved.confidence, Some(91.25));
        assert_eq!(repo.count_for_user(alice).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_history_is_newest_first_and_capped() {
        let (repo, alice, bob) = setup().await;

        for i in 0..12 {
            repo.create(record(alice, &format!("file{}.png", i)))
                .await
                .unwrap();
        }
        repo.create(record(bob, "other.png")).await.unwrap();

        let history = repo.list_recent(alice, DEFAULT_HISTORY_LIMIT).await.unwrap();
        assert_eq!(history.len(), 10);
        assert_eq!(history[0].file_name, "file11.png");
        assert_eq!(history[9].file_name, "file2.png");
        assert!(history.iter().all(|r| r.user_id == Some(alice)));
    }
}

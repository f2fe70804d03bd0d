pub mod analyze;
pub mod auth;
pub mod health;
pub mod history;

pub use analyze::analyze_upload;
pub use auth::{login, logout, register};
pub use health::{db_health_check, health_check, model_health_check};
pub use history::get_history;

use crate::{
    config::Config,
    database::Database,
    detection::Detector,
    error::AppResult,
    repositories::{AnalysisHistoryRepository, UserRepository},
    services::{AuthService, session_key},
};
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    /// 模型加载失败时为None，分析接口返回503
    pub detector: Option<Detector>,
    pub auth: AuthService,
    pub history: AnalysisHistoryRepository,
    pub config: Config,
    session_key: Key,
}

impl AppState {
    pub fn new(database: Database, detector: Option<Detector>, config: Config) -> AppResult<Self> {
        let session_key = session_key(&config.auth.session_secret)?;
        Ok(Self {
            auth: AuthService::new(UserRepository::new(database.clone())),
            history: AnalysisHistoryRepository::new(database.clone()),
            database,
            detector,
            config,
            session_key,
        })
    }

    /// 匿名回退用户不存在时禁用回退
    pub async fn check_anonymous_user(&mut self) -> AppResult<()> {
        let Some(id) = self.config.auth.anonymous_user_id else {
            return Ok(());
        };

        if !self.auth.user_exists(id).await? {
            tracing::warn!(
                "匿名回退用户 (ID: {}) 不存在，未登录请求将要求登录。请启用 seed_demo_user 或修改 anonymous_user_id",
                id
            );
            self.config.auth.anonymous_user_id = None;
        }
        Ok(())
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.session_key.clone()
    }
}

use crate::{
    docs::{ApiDoc, swagger_ui_page},
    handlers::{
        AppState, analyze_upload, db_health_check, get_history, health_check, login, logout,
        model_health_check, register,
    },
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::Json,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use utoipa::OpenApi;

/// 创建API路由
pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        // 内容检测
        .route("/api/analyze", post(analyze_upload))
        // 用户认证
        .route("/api/login", post(login))
        .route("/api/register", post(register))
        .route("/api/logout", post(logout))
        // 分析历史
        .route("/api/history", get(get_history))
        // 健康检查
        .route("/api/health", get(health_check))
        .route("/api/health/db", get(db_health_check))
        .route("/api/health/model", get(model_health_check))
}

/// 创建完整应用：API、文档页面以及前端静态文件
pub fn create_app(app_state: AppState) -> Router {
    let max_body = usize::try_from(app_state.config.upload.max_size).unwrap_or(usize::MAX);
    let static_dir = app_state.config.server.static_dir.clone();

    Router::new()
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .route("/swagger-ui", get(swagger_ui_page))
        .route("/swagger-ui/", get(swagger_ui_page))
        .merge(create_api_routes())
        .fallback_service(ServeDir::new(static_dir))
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(max_body))
}

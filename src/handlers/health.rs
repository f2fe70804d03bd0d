use super::AppState;
use crate::{
    error::{AppError, AppResult},
    response::StatusResponse,
};
use axum::{extract::State, response::Json};
use serde::Serialize;
use utoipa::ToSchema;

/// 数据库健康状态
#[derive(Debug, Serialize, ToSchema)]
pub struct DbHealthResponse {
    pub database: String,
    pub timestamp: String,
}

/// 模型加载状态
#[derive(Debug, Serialize, ToSchema)]
pub struct ModelHealthResponse {
    pub model: String,
    pub input_size: u32,
}

/// 服务存活检查
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "系统监控",
    responses((status = 200, description = "服务正常", body = StatusResponse))
)]
pub async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}

/// 数据库健康检查
#[utoipa::path(
    get,
    path = "/api/health/db",
    tag = "系统监控",
    responses(
        (status = 200, description = "数据库可用", body = DbHealthResponse),
        (status = 503, description = "数据库不可用", body = crate::response::ErrorResponse)
    )
)]
pub async fn db_health_check(State(app_state): State<AppState>) -> AppResult<Json<DbHealthResponse>> {
    match app_state.database.health_check().await {
        Ok(true) => Ok(Json(DbHealthResponse {
            database: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        })),
        Ok(false) => Err(AppError::service_unavailable("Database unavailable")),
        Err(e) => {
            tracing::error!("数据库健康检查失败: {}", e);
            Err(AppError::service_unavailable("Database unavailable"))
        }
    }
}

/// 模型加载状态检查
#[utoipa::path(
    get,
    path = "/api/health/model",
    tag = "系统监控",
    responses(
        (status = 200, description = "模型已加载", body = ModelHealthResponse),
        (status = 503, description = "模型未加载", body = crate::response::ErrorResponse)
    )
)]
pub async fn model_health_check(
    State(app_state): State<AppState>,
) -> AppResult<Json<ModelHealthResponse>> {
    let detector = app_state
        .detector
        .as_ref()
        .ok_or_else(|| AppError::service_unavailable("Model not loaded"))?;

    Ok(Json(ModelHealthResponse {
        model: detector.describe(),
        input_size: detector.settings().input_size,
    }))
}

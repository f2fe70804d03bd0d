use super::AppState;
use crate::{
    error::AppResult,
    models::HistoryResponse,
    repositories::DEFAULT_HISTORY_LIMIT,
    services::acting_user_id,
};
use axum::{extract::State, response::Json};
use axum_extra::extract::SignedCookieJar;

/// 当前用户最近的分析记录（最新在前，最多10条）
#[utoipa::path(
    get,
    path = "/api/history",
    tag = "分析历史",
    responses(
        (status = 200, description = "查询成功", body = HistoryResponse),
        (status = 401, description = "未登录且未启用匿名用户", body = crate::response::ErrorResponse),
        (status = 500, description = "服务器内部错误", body = crate::response::ErrorResponse)
    )
)]
pub async fn get_history(
    State(app_state): State<AppState>,
    jar: SignedCookieJar,
) -> AppResult<Json<HistoryResponse>> {
    let user_id = acting_user_id(&jar, app_state.config.auth.anonymous_user_id)?;
    let history = app_state
        .history
        .list_recent(user_id, DEFAULT_HISTORY_LIMIT)
        .await?;

    Ok(Json(HistoryResponse { history }))
}

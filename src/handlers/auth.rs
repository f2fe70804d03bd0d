use super::AppState;
use crate::{
    error::{AppError, AppResult},
    models::{LoginRequest, RegisterRequest, UserResponse},
    response::StatusResponse,
    services::{removal_cookie, session_cookie},
};
use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};
use axum_extra::extract::SignedCookieJar;

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

/// 用户登录，成功后写入会话Cookie
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "用户认证",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "登录成功", body = UserResponse),
        (status = 400, description = "请求体格式错误", body = crate::response::ErrorResponse),
        (status = 401, description = "邮箱或密码错误", body = crate::response::ErrorResponse)
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    jar: SignedCookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<(SignedCookieJar, Json<UserResponse>)> {
    let request = json_body(payload)?;

    let user = app_state
        .auth
        .login(request)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    let jar = jar.add(session_cookie(user.id));
    Ok((jar, Json(UserResponse { user })))
}

/// 注册新用户并直接登录
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "用户认证",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "注册成功", body = UserResponse),
        (status = 400, description = "缺少字段或邮箱已存在", body = crate::response::ErrorResponse)
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    jar: SignedCookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(SignedCookieJar, Json<UserResponse>)> {
    let request = json_body(payload)?;

    let user = app_state
        .auth
        .register(request)
        .await?
        .ok_or_else(|| AppError::bad_request("Email already exists"))?;

    let jar = jar.add(session_cookie(user.id));
    Ok((jar, Json(UserResponse { user })))
}

/// 退出登录，清除会话Cookie
#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "用户认证",
    responses((status = 200, description = "已退出", body = StatusResponse))
)]
pub async fn logout(jar: SignedCookieJar) -> (SignedCookieJar, Json<StatusResponse>) {
    (jar.remove(removal_cookie()), Json(StatusResponse::ok()))
}

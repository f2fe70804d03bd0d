//! 基于签名Cookie的会话：Cookie中只保存用户ID

use crate::{
    config::MIN_SESSION_SECRET_LEN,
    error::{AppError, AppResult},
};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};

/// 会话Cookie名称
pub const SESSION_COOKIE: &str = "session";

/// 由配置的密钥构造签名Key
pub fn session_key(secret: &str) -> AppResult<Key> {
    if secret.len() < MIN_SESSION_SECRET_LEN {
        return Err(AppError::config(format!(
            "会话密钥长度不能少于{}字节",
            MIN_SESSION_SECRET_LEN
        )));
    }
    Key::try_from(secret.as_bytes())
        .map_err(|e| AppError::config(format!("无效的会话密钥: {}", e)))
}

/// 构造写入用户ID的会话Cookie
pub fn session_cookie(user_id: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, user_id.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// 用于清除会话的Cookie（路径需与写入时一致）
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// 读取会话中的用户ID，签名无效或内容异常时返回None
pub fn session_user_id(jar: &SignedCookieJar) -> Option<i64> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse::<i64>().ok())
}

/// 当前请求的操作用户
///
/// 没有会话时退回到配置的匿名用户ID；未配置时要求登录。
pub fn acting_user_id(jar: &SignedCookieJar, anonymous_user_id: Option<i64>) -> AppResult<i64> {
    session_user_id(jar)
        .or(anonymous_user_id)
        .ok_or_else(|| AppError::unauthorized("Not logged in"))
}

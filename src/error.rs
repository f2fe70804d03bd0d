use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::detection::DetectionError;
use crate::response::ErrorResponse;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("数据库迁移错误: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("File too large: maximum allowed size is {max_size} bytes")]
    FileTooLarge { max_size: u64 },

    #[error("Unsupported file type")]
    UnsupportedFileType { file_type: String },

    /// 分析过程中的运行时错误，原样返回给客户端
    #[error("{0}")]
    Analysis(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("内部错误: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// 错误对应的HTTP状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_)
            | AppError::UnsupportedFileType { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Analysis(_)
            | AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Serialization(_)
            | AppError::Io(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回给客户端的错误消息
    ///
    /// 基础设施错误只返回概要描述，具体细节写入日志。
    pub fn client_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Migration(_) => "Database error".to_string(),
            AppError::Serialization(_) => "Serialization error".to_string(),
            AppError::Io(_) => "File IO error".to_string(),
            AppError::Config(_) => "Configuration error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("应用错误: {}", self);
        } else {
            tracing::warn!("请求被拒绝 ({}): {}", status.as_u16(), self);
        }

        ErrorResponse::new(self.client_message()).with_status(status)
    }
}

impl From<DetectionError> for AppError {
    fn from(err: DetectionError) -> Self {
        AppError::Analysis(err.to_string())
    }
}

/// 应用程序Result类型别名
pub type AppResult<T> = Result<T, AppError>;

/// 错误构造辅助函数
impl AppError {
    pub fn bad_request<T: Into<String>>(msg: T) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn service_unavailable<T: Into<String>>(msg: T) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    pub fn file_too_large(max_size: u64) -> Self {
        Self::FileTooLarge { max_size }
    }

    pub fn unsupported_file_type<T: Into<String>>(file_type: T) -> Self {
        Self::UnsupportedFileType {
            file_type: file_type.into(),
        }
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = AppError::bad_request("Uploaded file is empty");
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.to_string(), "Uploaded file is empty");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_file_too_large_error() {
        let err = AppError::file_too_large(200 * 1024 * 1024);
        assert!(matches!(err, AppError::FileTooLarge { .. }));
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_unsupported_type_is_bad_request() {
        let err = AppError::unsupported_file_type("txt");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_message(), "Unsupported file type");
    }

    #[test]
    fn test_analysis_error_keeps_raw_text() {
        let err: AppError = DetectionError::NoFrames.into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "No frames extracted from video");
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = AppError::Internal(anyhow::anyhow!("secret connection string"));
        assert_eq!(err.client_message(), "Internal server error");
    }
}

use super::AppState;
use crate::{
    error::{AppError, AppResult},
    file_processing::{FileAnalyzer, FileValidator, format_file_size, secure_filename},
    models::{AnalysisResponse, CreateAnalysisRecord},
    services::acting_user_id,
};
use axum::{
    extract::{
        State,
        multipart::{Field, Multipart, MultipartError},
    },
    http::StatusCode,
    response::Json,
};
use axum_extra::extract::SignedCookieJar;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

/// 将multipart读取错误映射为应用错误，超出请求体限制时返回413
fn map_multipart_error(err: MultipartError, max_size: u64) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::file_too_large(max_size)
    } else {
        AppError::bad_request(format!("Invalid upload: {}", err.body_text()))
    }
}

/// 将上传字段流式写入临时文件，返回写入的字节数
async fn stream_to_file(
    field: &mut Field<'_>,
    temp: &NamedTempFile,
    max_size: u64,
) -> AppResult<u64> {
    let mut file = tokio::fs::File::from_std(temp.as_file().try_clone()?);
    let mut written: u64 = 0;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| map_multipart_error(e, max_size))?
    {
        written += chunk.len() as u64;
        if written > max_size {
            return Err(AppError::file_too_large(max_size));
        }
        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    Ok(written)
}

/// 上传图片或视频并检测是否为AI生成
///
/// 图片直接分类；视频每10帧采样一帧并对分数取平均。
/// 成功的分析会为当前用户写入一条历史记录。
#[utoipa::path(
    post,
    path = "/api/analyze",
    tag = "内容检测",
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "表单字段 `file`：png/jpg/jpeg/gif/mp4/avi/mov"),
    responses(
        (status = 200, description = "检测完成", body = AnalysisResponse),
        (status = 400, description = "缺少文件、文件名为空、类型不支持或文件为空", body = crate::response::ErrorResponse),
        (status = 401, description = "未登录且未启用匿名用户", body = crate::response::ErrorResponse),
        (status = 413, description = "文件超过大小限制", body = crate::response::ErrorResponse),
        (status = 500, description = "检测失败", body = crate::response::ErrorResponse),
        (status = 503, description = "模型未加载", body = crate::response::ErrorResponse)
    )
)]
pub async fn analyze_upload(
    State(app_state): State<AppState>,
    jar: SignedCookieJar,
    mut multipart: Multipart,
) -> AppResult<Json<AnalysisResponse>> {
    let user_id = acting_user_id(&jar, app_state.config.auth.anonymous_user_id)?;
    let detector = app_state
        .detector
        .as_ref()
        .ok_or_else(|| AppError::service_unavailable("Model not loaded"))?;
    let max_size = app_state.config.upload.max_size;

    // 找到 `file` 字段，忽略其余字段
    let mut field = loop {
        match multipart
            .next_field()
            .await
            .map_err(|e| map_multipart_error(e, max_size))?
        {
            Some(field) if field.name() == Some("file") => break field,
            Some(_) => continue,
            None => return Err(AppError::bad_request("No file uploaded")),
        }
    };

    let original_name = field.file_name().unwrap_or_default().to_string();
    let declared_type = field.content_type().map(str::to_string);

    let validator = FileValidator::new();
    let (extension, kind) = validator.validate_filename(&original_name)?;
    let file_name = secure_filename(&original_name, &extension);

    let upload_dir = &app_state.config.upload.upload_dir;
    tokio::fs::create_dir_all(upload_dir).await?;
    let temp = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(&format!(".{}", extension))
        .tempfile_in(upload_dir)?;

    let size = stream_to_file(&mut field, &temp, max_size).await?;
    validator.validate_size(size, max_size)?;

    tracing::info!(
        "开始分析: {} ({:?}, {} 字节, 用户ID: {})",
        file_name,
        kind,
        size,
        user_id
    );

    let file_type = FileAnalyzer::new().content_type(declared_type.as_deref(), temp.path());

    let result = detector
        .analyze(temp.path().to_path_buf(), kind)
        .await
        .map_err(|e| {
            tracing::error!("分析失败 {}: {}", file_name, e);
            AppError::from(e)
        })?;

    let response = AnalysisResponse {
        result,
        file_name,
        file_size: format_file_size(size),
        file_type,
    };

    app_state
        .history
        .create(CreateAnalysisRecord::from_response(user_id, &response))
        .await?;

    tracing::info!(
        "分析完成: {} -> {} ({:.2}%)",
        response.file_name,
        response.result.verdict,
        response.result.confidence
    );

    if let Err(e) = temp.close() {
        tracing::warn!("删除临时文件失败: {}", e);
    }

    Ok(Json(response))
}

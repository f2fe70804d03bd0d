use super::MediaKind;
use crate::error::{AppError, AppResult};

/// 允许上传的扩展名
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "mp4", "avi", "mov"];

/// 上传文件验证器
#[derive(Debug, Clone, Default)]
pub struct FileValidator;

impl FileValidator {
    pub fn new() -> Self {
        Self
    }

    /// 根据原始文件名校验上传，返回小写扩展名与媒体类型
    ///
    /// 在写入磁盘之前调用。
    pub fn validate_filename(&self, filename: &str) -> AppResult<(String, MediaKind)> {
        if filename.is_empty() {
            return Err(AppError::bad_request("No file selected"));
        }

        let extension = extract_extension(filename).ok_or_else(|| {
            AppError::unsupported_file_type(filename.to_string())
        })?;

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::unsupported_file_type(extension));
        }

        let kind = MediaKind::from_extension(&extension)
            .ok_or_else(|| AppError::unsupported_file_type(extension.clone()))?;

        Ok((extension, kind))
    }

    /// 校验已落盘文件的大小
    pub fn validate_size(&self, size: u64, max_size: u64) -> AppResult<()> {
        if size == 0 {
            return Err(AppError::bad_request("Uploaded file is empty"));
        }
        if size > max_size {
            return Err(AppError::file_too_large(max_size));
        }
        Ok(())
    }
}

/// 取最后一个点之后的部分作为扩展名（小写）
pub fn extract_extension(filename: &str) -> Option<String> {
    let (_, extension) = filename.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    Some(extension.to_lowercase())
}

/// 生成安全的存储文件名
///
/// 路径分隔符和空白变为 `_`，只保留ASCII字母、数字以及 `.` `_` `-`，
/// 并去掉首尾的点和下划线。结果为空或丢失扩展名时使用 `upload.<ext>`。
pub fn secure_filename(filename: &str, extension: &str) -> String {
    let spaced: String = filename
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '.' || c == '_');

    if cleaned.is_empty() || extract_extension(cleaned).is_none() {
        format!("upload.{}", extension)
    } else {
        cleaned.to_string()
    }
}

use std::path::Path;

/// 上传内容的媒体类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "gif" => Some(Self::Image),
            "mp4" | "avi" | "mov" => Some(Self::Video),
            _ => None,
        }
    }
}

/// 上传文件分析器
#[derive(Debug, Clone, Default)]
pub struct FileAnalyzer;

impl FileAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// 确定文件的MIME类型
    ///
    /// 优先使用客户端声明的类型，其次按文件头识别。
    pub fn content_type(&self, declared: Option<&str>, path: &Path) -> String {
        if let Some(declared) = declared.map(str::trim).filter(|s| !s.is_empty()) {
            return declared.to_string();
        }

        match infer::get_from_path(path) {
            Ok(Some(kind)) => kind.mime_type().to_string(),
            Ok(None) => "application/octet-stream".to_string(),
            Err(e) => {
                tracing::debug!("无法识别文件类型 {}: {}", path.display(), e);
                "application/octet-stream".to_string()
            }
        }
    }
}

/// 以KB为单位格式化文件大小，保留两位小数
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

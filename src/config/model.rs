use serde::{Deserialize, Serialize};

/// 分类模型配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// ONNX模型文件路径
    pub path: String,
    /// 模型输入边长（正方形，像素）
    pub input_size: u32,
    /// 视频采样间隔（每N帧取一帧）
    pub frame_interval: u32,
    /// ffmpeg可执行文件
    pub ffmpeg_bin: String,
    /// ffprobe可执行文件
    pub ffprobe_bin: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "ai_image_model.onnx".to_string(),
            input_size: 224,
            frame_interval: 10,
            ffmpeg_bin: "ffmpeg".to_string(),
            ffprobe_bin: "ffprobe".to_string(),
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.path.is_empty() {
            return Err("模型路径不能为空".into());
        }
        if self.input_size == 0 || self.input_size > 4096 {
            return Err("模型输入尺寸应在1-4096之间".into());
        }
        if self.frame_interval == 0 {
            return Err("视频采样间隔不能为0".into());
        }
        if self.ffmpeg_bin.is_empty() || self.ffprobe_bin.is_empty() {
            return Err("ffmpeg/ffprobe路径不能为空".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_config() {
        let config = ModelConfig::default();
        assert_eq!(config.input_size, 224);
        assert_eq!(config.frame_interval, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_threshold_key_is_ignored() {
        // 判定阈值固定为0.5，旧配置中的threshold不再生效
        let config: ModelConfig = toml::from_str(
            r#"
            path = "model.onnx"
            input_size = 224
            threshold = 0.7
            frame_interval = 10
            ffmpeg_bin = "ffmpeg"
            ffprobe_bin = "ffprobe"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
        assert!(!toml::to_string(&config).unwrap().contains("threshold"));
    }
}

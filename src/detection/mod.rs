//! AI生成内容检测：图片直接分类，视频按间隔抽帧后取平均分

pub mod model;
pub mod preprocess;
pub mod verdict;
pub mod video;

pub use model::{OnnxModel, ScoreModel};
pub use video::{FfmpegFrameSource, FrameSource};

use crate::{
    config::model::ModelConfig, file_processing::MediaKind, models::ClassificationResult,
};
use image::RgbImage;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;

pub const IMAGE_DETAILS: &str = "CNN-based image classification result";
pub const VIDEO_DETAILS: &str = "Video frame-based CNN analysis";

/// 检测过程中的错误
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("{0}")]
    Model(String),

    #[error("{0}")]
    Decoder(String),

    #[error("No frames extracted from video")]
    NoFrames,

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Analysis task failed: {0}")]
    Task(String),
}

/// 检测参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorSettings {
    pub input_size: u32,
    pub frame_interval: usize,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self::from(&ModelConfig::default())
    }
}

impl From<&ModelConfig> for DetectorSettings {
    fn from(config: &ModelConfig) -> Self {
        Self {
            input_size: config.input_size,
            frame_interval: config.frame_interval.max(1) as usize,
        }
    }
}

/// 检测器，进程内共享一份模型
#[derive(Clone)]
pub struct Detector {
    model: Arc<dyn ScoreModel>,
    frames: Arc<dyn FrameSource>,
    settings: DetectorSettings,
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("model", &self.model.describe())
            .field("settings", &self.settings)
            .finish()
    }
}

impl Detector {
    pub fn new(
        model: Arc<dyn ScoreModel>,
        frames: Arc<dyn FrameSource>,
        settings: DetectorSettings,
    ) -> Self {
        Self {
            model,
            frames,
            settings,
        }
    }

    /// 按配置加载ONNX模型并使用ffmpeg抽帧
    pub fn from_config(config: &ModelConfig) -> Result<Self, DetectionError> {
        let model = OnnxModel::load(&config.path, config.input_size)?;
        let frames = FfmpegFrameSource::new(&config.ffmpeg_bin, &config.ffprobe_bin);
        Ok(Self::new(
            Arc::new(model),
            Arc::new(frames),
            DetectorSettings::from(config),
        ))
    }

    pub fn settings(&self) -> &DetectorSettings {
        &self.settings
    }

    pub fn describe(&self) -> String {
        self.model.describe()
    }

    fn score_frame(&self, frame: &RgbImage) -> Result<f32, DetectionError> {
        let input = preprocess::to_model_input(frame, self.settings.input_size);
        self.model.score(&input)
    }

    /// 对单张图片分类
    pub fn classify_image(&self, path: &Path) -> Result<ClassificationResult, DetectionError> {
        let image = preprocess::load_rgb(path)?;
        let score = self.score_frame(&image)?;
        tracing::debug!("图片模型输出: {:.4} ({})", score, path.display());
        Ok(verdict::classify_score(score as f64, IMAGE_DETAILS))
    }

    /// 对视频抽帧分类，取采样帧分数的平均值
    pub fn classify_video(&self, path: &Path) -> Result<ClassificationResult, DetectionError> {
        let frames = self.frames.frames(path)?;
        let scores = video::sample_scores(frames, self.settings.frame_interval, |frame| {
            self.score_frame(frame)
        })?;

        let mean = verdict::mean_score(&scores).ok_or(DetectionError::NoFrames)?;
        tracing::debug!(
            "视频采样{}帧，平均模型输出: {:.4} ({})",
            scores.len(),
            mean,
            path.display()
        );
        Ok(verdict::classify_score(mean, VIDEO_DETAILS))
    }

    pub fn classify(
        &self,
        path: &Path,
        kind: MediaKind,
    ) -> Result<ClassificationResult, DetectionError> {
        match kind {
            MediaKind::Image => self.classify_image(path),
            MediaKind::Video => self.classify_video(path),
        }
    }

    /// 在阻塞线程池中执行分类，避免推理阻塞异步运行时
    pub async fn analyze(
        &self,
        path: PathBuf,
        kind: MediaKind,
    ) -> Result<ClassificationResult, DetectionError> {
        let detector = self.clone();
        tokio::task::spawn_blocking(move || detector.classify(&path, kind))
            .await
            .map_err(|e| DetectionError::Task(e.to_string()))?
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::models::Verdict;
    use std::sync::atomic::Ordering;

    fn write_png(dir: &Path, value: u8) -> PathBuf {
        let path = dir.join("sample.png");
        RgbImage::from_pixel(16, 16, image::Rgb([value, value, value]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_classify_image_ai() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), 0);
        let detector = detector(FixedModel::new(0.1), vec![]);

        let result = detector.classify_image(&path).unwrap();
        assert!(result.is_ai);
        assert_eq!(result.verdict, Verdict::AiGenerated);
        assert_eq!(result.confidence, 90.0);
        assert_eq!(result.details, IMAGE_DETAILS);
    }

    #[test]
    fn test_classify_image_real() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), 0);
        let detector = detector(FixedModel::new(0.9), vec![]);

        let result = detector.classify_image(&path).unwrap();
        assert!(!result.is_ai);
        assert_eq!(result.confidence, 90.0);
    }

    #[test]
    fn test_classify_undecodable_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"not a jpeg").unwrap();
        let detector = detector(FixedModel::new(0.9), vec![]);

        assert!(detector.classify_image(&path).is_err());
    }

    #[test]
    fn test_video_samples_every_tenth_frame() {
        let model = Arc::new(FixedModel::new(0.8));
        let detector = Detector::new(
            model.clone(),
            Arc::new(StubFrames(vec![0; 25])),
            DetectorSettings {
                input_size: 4,
                frame_interval: 10,
            },
        );

        let result = detector.classify_video(Path::new("clip.mp4")).unwrap();
        assert_eq!(model.calls.load(Ordering::SeqCst), 3);
        assert_eq!(result.verdict, Verdict::Real);
        assert_eq!(result.confidence, 80.0);
        assert_eq!(result.details, VIDEO_DETAILS);
    }

    #[test]
    fn test_video_score_is_mean_of_sampled_frames() {
        // 采样下标0、10、20 -> 像素 0、255、255，平均约0.667
        let mut values = vec![0u8; 21];
        values[10] = 255;
        values[20] = 255;
        let detector = detector(PixelModel, values);

        let result = detector.classify_video(Path::new("clip.mp4")).unwrap();
        assert_eq!(result.verdict, Verdict::Real);
        assert_eq!(result.confidence, 66.67);
    }

    #[test]
    fn test_video_without_frames() {
        let detector = detector(FixedModel::new(0.5), vec![]);
        let err = detector.classify_video(Path::new("clip.mp4")).unwrap_err();
        assert!(matches!(err, DetectionError::NoFrames));
        assert_eq!(err.to_string(), "No frames extracted from video");
    }

    #[tokio::test]
    async fn test_analyze_dispatches_by_kind() {
        let detector = detector(FixedModel::new(0.3), vec![1, 2, 3]);
        let result = detector
            .analyze(PathBuf::from("clip.mov"), MediaKind::Video)
            .await
            .unwrap();
        assert!(result.is_ai);
        assert_eq!(result.details, VIDEO_DETAILS);
    }

    #[test]
    fn test_settings_from_config() {
        let config = ModelConfig {
            frame_interval: 0,
            ..ModelConfig::default()
        };
        let settings = DetectorSettings::from(&config);
        assert_eq!(settings.frame_interval, 1);
        assert_eq!(settings.input_size, 224);
    }
}

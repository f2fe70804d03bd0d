//! 视频抽帧：通过ffprobe获取尺寸，ffmpeg输出rgb24原始帧流

use super::DetectionError;
use image::RgbImage;
use std::{
    io::{ErrorKind, Read},
    path::{Path, PathBuf},
    process::{Child, ChildStdout, Command, Stdio},
};

/// 帧迭代器，解码失败的帧以Err返回
pub type Frames = Box<dyn Iterator<Item = Result<RgbImage, DetectionError>> + Send>;

/// 视频帧来源
pub trait FrameSource: Send + Sync {
    /// 按顺序解码全部帧；无法打开的视频返回空迭代器
    fn frames(&self, path: &Path) -> Result<Frames, DetectionError>;
}

/// 基于外部ffmpeg进程的帧来源
#[derive(Debug, Clone)]
pub struct FfmpegFrameSource {
    ffmpeg_bin: PathBuf,
    ffprobe_bin: PathBuf,
}

impl FfmpegFrameSource {
    pub fn new(ffmpeg_bin: impl Into<PathBuf>, ffprobe_bin: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
            ffprobe_bin: ffprobe_bin.into(),
        }
    }

    /// 探测第一路视频流的宽高
    fn probe_dimensions(&self, path: &Path) -> Result<Option<(u32, u32)>, DetectionError> {
        let output = Command::new(&self.ffprobe_bin)
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=width,height",
                "-of",
                "csv=p=0:s=x",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                DetectionError::Decoder(format!(
                    "Failed to run {}: {}",
                    self.ffprobe_bin.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            tracing::warn!(
                "ffprobe无法读取视频 {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(None);
        }

        Ok(parse_dimensions(&String::from_utf8_lossy(&output.stdout)))
    }
}

impl FrameSource for FfmpegFrameSource {
    fn frames(&self, path: &Path) -> Result<Frames, DetectionError> {
        let Some((width, height)) = self.probe_dimensions(path)? else {
            return Ok(Box::new(std::iter::empty()));
        };

        tracing::debug!("视频尺寸 {}x{}: {}", width, height, path.display());

        let mut child = Command::new(&self.ffmpeg_bin)
            .args(["-v", "error", "-noautorotate", "-i"])
            .arg(path)
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                DetectionError::Decoder(format!(
                    "Failed to run {}: {}",
                    self.ffmpeg_bin.display(),
                    e
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DetectionError::Decoder("ffmpeg stdout unavailable".to_string()))?;

        Ok(Box::new(RawFrameStream {
            child,
            stdout,
            width,
            height,
            done: false,
        }))
    }
}

/// 解析 `WIDTHxHEIGHT` 格式的ffprobe输出
fn parse_dimensions(output: &str) -> Option<(u32, u32)> {
    let line = output.lines().map(str::trim).find(|line| !line.is_empty())?;
    let (width, height) = line.split_once('x')?;
    let width = width.trim().parse::<u32>().ok()?;
    let height = height.trim().parse::<u32>().ok()?;
    (width > 0 && height > 0).then_some((width, height))
}

struct RawFrameStream {
    child: Child,
    stdout: ChildStdout,
    width: u32,
    height: u32,
    done: bool,
}

impl Iterator for RawFrameStream {
    type Item = Result<RgbImage, DetectionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let frame_len = self.width as usize * self.height as usize * 3;
        let mut buffer = vec![0u8; frame_len];
        match self.stdout.read_exact(&mut buffer) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                self.done = true;
                return None;
            }
            Err(e) => {
                self.done = true;
                return Some(Err(DetectionError::Io(e)));
            }
        }

        match RgbImage::from_raw(self.width, self.height, buffer) {
            Some(frame) => Some(Ok(frame)),
            None => {
                self.done = true;
                Some(Err(DetectionError::Decoder(
                    "Frame buffer size mismatch".to_string(),
                )))
            }
        }
    }
}

impl Drop for RawFrameStream {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// 对下标满足 `index % interval == 0` 的帧打分
///
/// 解码失败的帧跳过并计入下标，打分失败直接返回错误。
pub fn sample_scores<I, F>(frames: I, interval: usize, mut score: F) -> Result<Vec<f32>, DetectionError>
where
    I: IntoIterator<Item = Result<RgbImage, DetectionError>>,
    F: FnMut(&RgbImage) -> Result<f32, DetectionError>,
{
    let interval = interval.max(1);
    let mut scores = Vec::new();

    for (index, frame) in frames.into_iter().enumerate() {
        if index % interval != 0 {
            continue;
        }
        match frame {
            Ok(frame) => scores.push(score(&frame)?),
            Err(e) => tracing::warn!("第{}帧解码失败，已跳过: {}", index, e),
        }
    }

    Ok(scores)
}

use super::DetectionError;
use image::{ImageReader, RgbImage, imageops::FilterType};
use std::path::Path;

/// 读取图片并转为RGB（GIF取第一帧）
pub fn load_rgb(path: &Path) -> Result<RgbImage, DetectionError> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(image.to_rgb8())
}

/// 缩放到 `size x size` 并归一化到 [0, 1]，按 NHWC 顺序展开
pub fn to_model_input(image: &RgbImage, size: u32) -> Vec<f32> {
    let resized = if image.dimensions() == (size, size) {
        image.clone()
    } else {
        image::imageops::resize(image, size, size, FilterType::Triangle)
    };

    resized
        .into_raw()
        .into_iter()
        .map(|value| value as f32 / 255.0)
        .collect()
}

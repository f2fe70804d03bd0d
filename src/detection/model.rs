use super::DetectionError;
use std::path::{Path, PathBuf};
use tract_onnx::prelude::*;

/// 打分模型：输入NHWC归一化像素，输出 [0, 1] 的单个分数
///
/// 约定 0 表示AI生成，1 表示真实拍摄/人工创作。
pub trait ScoreModel: Send + Sync {
    fn score(&self, input: &[f32]) -> Result<f32, DetectionError>;

    /// 用于健康检查的模型描述
    fn describe(&self) -> String {
        "custom".to_string()
    }
}

/// 基于tract加载的ONNX二分类模型
pub struct OnnxModel {
    plan: TypedRunnableModel<TypedModel>,
    input_size: usize,
    path: PathBuf,
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel")
            .field("path", &self.path)
            .field("input_size", &self.input_size)
            .finish()
    }
}

impl OnnxModel {
    /// 加载并优化模型，输入固定为 `[1, size, size, 3]`
    pub fn load<P: AsRef<Path>>(path: P, input_size: u32) -> Result<Self, DetectionError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DetectionError::Model(format!(
                "Model file not found: {}",
                path.display()
            )));
        }

        tracing::info!("正在加载分类模型: {}", path.display());

        let size = input_size as usize;
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, size, size, 3]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| DetectionError::Model(format!("Failed to load model: {}", e)))?;

        tracing::info!("分类模型加载成功");

        Ok(Self {
            plan,
            input_size: size,
            path: path.to_path_buf(),
        })
    }
}

impl ScoreModel for OnnxModel {
    fn score(&self, input: &[f32]) -> Result<f32, DetectionError> {
        let size = self.input_size;
        let expected = size * size * 3;
        if input.len() != expected {
            return Err(DetectionError::Model(format!(
                "Expected {} input values, got {}",
                expected,
                input.len()
            )));
        }

        let tensor = Tensor::from_shape(&[1, size, size, 3], input)
            .map_err(|e| DetectionError::Model(format!("Failed to build input tensor: {}", e)))?;

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| DetectionError::Model(format!("Inference failed: {}", e)))?;

        let output = outputs
            .first()
            .ok_or_else(|| DetectionError::Model("Model produced no output".to_string()))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| DetectionError::Model(format!("Unexpected output type: {}", e)))?;

        view.iter()
            .next()
            .copied()
            .ok_or_else(|| DetectionError::Model("Model output is empty".to_string()))
    }

    fn describe(&self) -> String {
        format!("onnx:{}", self.path.display())
    }
}

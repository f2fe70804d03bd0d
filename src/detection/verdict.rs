use crate::models::{ClassificationResult, Verdict};

/// 判定阈值：模型输出 0 = AI生成，1 = 真实
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 将模型输出映射为判定结果
///
/// 低于 0.5 判为AI生成。置信度为 `max(score, 1-score)*100`，
/// 始终落在 [50, 100]。
pub fn classify_score(score: f64, details: &str) -> ClassificationResult {
    let verdict = if score < DEFAULT_THRESHOLD {
        Verdict::AiGenerated
    } else {
        Verdict::Real
    };

    let confidence = f64::max(score, 1.0 - score) * 100.0;

    ClassificationResult {
        is_ai: verdict.is_ai(),
        confidence: round2(confidence),
        verdict,
        details: details.to_string(),
        indicators: Vec::new(),
    }
}

/// 多个帧分数的平均值，空输入返回None
pub fn mean_score(scores: &[f32]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum: f64 = scores.iter().map(|&s| s as f64).sum();
    Some(sum / scores.len() as f64)
}

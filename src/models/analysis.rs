use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// 判定结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Verdict {
    #[serde(rename = "AI Generated")]
    AiGenerated,
    #[serde(rename = "Real/Human Created")]
    Real,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::AiGenerated => "AI Generated",
            Verdict::Real => "Real/Human Created",
        }
    }

    pub fn is_ai(&self) -> bool {
        matches!(self, Verdict::AiGenerated)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 单次分类结果（不单独持久化）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClassificationResult {
    #[serde(rename = "isAI")]
    pub is_ai: bool,
    /// 距离判定边界的置信度百分比（0-100，两位小数）
    pub confidence: f64,
    pub verdict: Verdict,
    pub details: String,
    pub indicators: Vec<String>,
}

/// `/api/analyze` 的响应：分类结果加上文件元数据
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResponse {
    #[serde(flatten)]
    pub result: ClassificationResult,
    #[serde(rename = "fileName")]
    pub file_name: String,
    /// 形如 `"12.34 KB"`
    #[serde(rename = "fileSize")]
    pub file_size: String,
    #[serde(rename = "fileType")]
    pub file_type: String,
}

/// 分析历史记录
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AnalysisRecord {
    pub id: i64,
    pub user_id: Option<i64>,
    pub file_name: String,
    pub file_size: Option<String>,
    pub file_type: Option<String>,
    pub is_ai: Option<bool>,
    pub confidence: Option<f64>,
    pub verdict: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// 新增历史记录请求
#[derive(Debug, Clone)]
pub struct CreateAnalysisRecord {
    pub user_id: i64,
    pub file_name: String,
    pub file_size: String,
    pub file_type: String,
    pub is_ai: Option<bool>,
    pub confidence: f64,
    pub verdict: String,
}

impl CreateAnalysisRecord {
    /// 由分析响应生成历史记录
    pub fn from_response(user_id: i64, response: &AnalysisResponse) -> Self {
        Self {
            user_id,
            file_name: response.file_name.clone(),
            file_size: response.file_size.clone(),
            file_type: response.file_type.clone(),
            is_ai: Some(response.result.is_ai),
            confidence: response.result.confidence,
            verdict: response.result.verdict.label().to_string(),
        }
    }
}

/// 历史查询响应：`{"history": [...]}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub history: Vec<AnalysisRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_analysis_response_wire_format() {
        let response = AnalysisResponse {
            result: ClassificationResult {
                is_ai: true,
                confidence: 87.5,
                verdict: Verdict::AiGenerated,
                details: "CNN-based image classification result".to_string(),
                indicators: vec![],
            },
            file_name: "cat.png".to_string(),
            file_size: "1.00 KB".to_string(),
            file_type: "image/png".to_string(),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "isAI": true,
                "confidence": 87.5,
                "verdict": "AI Generated",
                "details": "CNN-based image classification result",
                "indicators": [],
                "fileName": "cat.png",
                "fileSize": "1.00 KB",
                "fileType": "image/png"
            })
        );
    }

    #[test]
    fn test_verdict_labels() {
        assert_eq!(Verdict::Real.to_string(), "Real/Human Created");
        assert!(Verdict::AiGenerated.is_ai());
        assert!(!Verdict::Real.is_ai());
    }
}

use crate::{
    handlers::health::{DbHealthResponse, ModelHealthResponse},
    models::{
        AnalysisRecord, AnalysisResponse, ClassificationResult, HistoryResponse, LoginRequest,
        RegisterRequest, UserInfo, UserResponse, Verdict,
    },
    response::{ErrorResponse, StatusResponse},
};
use axum::response::Html;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        // 内容检测API
        crate::handlers::analyze::analyze_upload,
        // 用户认证API
        crate::handlers::auth::login,
        crate::handlers::auth::register,
        crate::handlers::auth::logout,
        // 分析历史API
        crate::handlers::history::get_history,
        // 健康检查
        crate::handlers::health::health_check,
        crate::handlers::health::db_health_check,
        crate::handlers::health::model_health_check,
    ),
    components(
        schemas(
            // 检测结果
            Verdict,
            ClassificationResult,
            AnalysisResponse,
            AnalysisRecord,
            HistoryResponse,
            // 用户
            UserInfo,
            UserResponse,
            LoginRequest,
            RegisterRequest,
            // 通用响应
            ErrorResponse,
            StatusResponse,
            DbHealthResponse,
            ModelHealthResponse,
        )
    ),
    tags(
        (name = "内容检测", description = "上传图片或视频，判断是否为AI生成"),
        (name = "用户认证", description = "注册、登录与退出"),
        (name = "分析历史", description = "当前用户最近的检测记录"),
        (name = "系统监控", description = "服务、数据库与模型的健康状态")
    ),
    info(
        title = "AI Detector API",
        version = "1.0.0",
        description = "AI生成图片/视频检测服务 REST API 文档"
    ),
    servers(
        (url = "http://localhost:5000", description = "开发环境")
    )
)]
pub struct ApiDoc;

/// Swagger UI 页面（访问路径：/swagger-ui）
/// OpenAPI JSON 路径：/api-docs/openapi.json
pub async fn swagger_ui_page() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset=UTF-8>
  <title>AI Detector API 文档</title>
  <link rel=stylesheet href=https://cdn.jsdelivr.net/npm/swagger-ui-dist@5.11.0/swagger-ui.css>
  <style>
    body { margin: 0; font-family: Arial, sans-serif; }
  </style>
</head>
<body>
  <div id=swagger-ui>
    <div style="padding: 50px; text-align: center;">正在加载 API 文档...</div>
  </div>
  <script src=https://cdn.jsdelivr.net/npm/swagger-ui-dist@5.11.0/swagger-ui-bundle.js></script>
  <script>
    window.onload = function() {
      window.ui = SwaggerUIBundle({
        url: '/api-docs/openapi.json',
        dom_id: '#swagger-ui',
        deepLinking: true,
        validatorUrl: null
      });
    };
  </script>
</body>
</html>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_all_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/analyze",
            "/api/login",
            "/api/register",
            "/api/logout",
            "/api/history",
            "/api/health",
            "/api/health/db",
            "/api/health/model",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_analyze_accepts_multipart() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let content = &doc["paths"]["/api/analyze"]["post"]["requestBody"]["content"];
        assert!(content["multipart/form-data"].is_object());
    }
}

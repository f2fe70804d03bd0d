/*
 * AI Detector - AI-Generated Image and Video Detection Service
 * Copyright (c) 2024 AI Detector Project
 *
 * This work is licensed under CC BY-NC-SA 4.0
 * https://creativecommons.org/licenses/by-nc-sa/4.0/
 */

use ai_detector_backend::{
    config::Config,
    database::Database,
    detection::Detector,
    error::AppResult,
    handlers::AppState,
    routes::create_app,
};
use axum::http::Method;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CONFIG_FILE: &str = "config.toml";

/// 加载配置文件，文件不存在时写出默认配置
fn load_config() -> AppResult<Config> {
    match Config::load_if_exists(CONFIG_FILE)? {
        Some(config) => {
            tracing::info!("已加载配置文件: {}", CONFIG_FILE);
            Ok(config)
        }
        None => {
            tracing::warn!("未找到配置文件，使用默认配置");
            let default_config = Config::default();
            if let Err(e) = default_config.save_to_file(CONFIG_FILE) {
                tracing::warn!("保存默认配置失败: {}", e);
            }
            Ok(default_config)
        }
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ai_detector_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config()?;
    tracing::info!("服务器配置: {}", config.server_addr());

    // 初始化数据库并执行迁移
    let database = Database::new(&config.database).await?;
    database.migrate().await?;

    // 加载分类模型（失败时服务继续启动，分析接口返回503）
    let detector = match Detector::from_config(&config.model) {
        Ok(detector) => {
            tracing::info!("检测器初始化成功: {}", detector.describe());
            Some(detector)
        }
        Err(e) => {
            tracing::warn!("模型加载失败，分析功能将不可用: {}", e);
            None
        }
    };

    tokio::fs::create_dir_all(&config.upload.upload_dir).await?;

    let mut app_state = AppState::new(database, detector, config.clone())?;

    if config.auth.seed_demo_user {
        app_state.auth.ensure_demo_user().await?;
    }
    app_state.check_anonymous_user().await?;

    // 创建CORS中间件
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let app = create_app(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // 启动服务器
    let listener = tokio::net::TcpListener::bind(&config.server_addr()).await?;
    tracing::info!("🚀 服务器启动成功，监听地址: {}", config.server_addr());

    axum::serve(listener, app).await?;

    Ok(())
}

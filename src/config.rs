use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod model;

pub use model::ModelConfig;

/// 签名会话Cookie所需的最小密钥长度（字节）
pub const MIN_SESSION_SECRET_LEN: usize = 64;

/// 应用程序配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub upload: UploadConfig,
    pub model: ModelConfig,
    pub auth: AuthConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 前端静态文件目录
    pub static_dir: String,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// 上传配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_size: u64,
    /// 上传文件的临时存放目录
    pub upload_dir: String,
}

/// 认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// 会话Cookie签名密钥，至少64字节
    pub session_secret: String,
    /// 无会话时使用的用户ID，为空时要求登录
    pub anonymous_user_id: Option<i64>,
    /// 启动时创建演示账号
    pub seed_demo_user: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                static_dir: "static".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://aidetector.db".to_string(),
                max_connections: 5,
            },
            upload: UploadConfig {
                max_size: 200 * 1024 * 1024, // 200MB
                upload_dir: "uploads".to_string(),
            },
            model: ModelConfig::default(),
            auth: AuthConfig {
                session_secret:
                    "change-this-in-production-change-this-in-production-change-this-in-production"
                        .to_string(),
                anonymous_user_id: Some(1),
                seed_demo_user: true,
            },
        }
    }
}

impl Config {
    /// 从配置文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| AppError::config(format!("解析配置文件失败: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// 加载配置文件，文件不存在时返回 `None`，存在但无效时返回错误
    pub fn load_if_exists<P: AsRef<Path>>(path: P) -> AppResult<Option<Self>> {
        if !path.as_ref().exists() {
            return Ok(None);
        }
        Self::from_file(path).map(Some)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> AppResult<()> {
        if self.server.port == 0 {
            return Err(AppError::config("服务器端口不能为0"));
        }

        if self.database.url.is_empty() {
            return Err(AppError::config("数据库URL不能为空"));
        }

        if self.database.max_connections == 0 {
            return Err(AppError::config("数据库最大连接数不能为0"));
        }

        if self.upload.max_size == 0 {
            return Err(AppError::config("上传文件最大大小不能为0"));
        }

        if self.upload.upload_dir.is_empty() {
            return Err(AppError::config("上传目录不能为空"));
        }

        if let Err(e) = self.model.validate() {
            return Err(AppError::config(format!("模型配置无效: {}", e)));
        }

        if self.auth.session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(AppError::config(format!(
                "会话密钥长度不能少于{}字节",
                MIN_SESSION_SECRET_LEN
            )));
        }

        Ok(())
    }

    /// 获取服务器监听地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> AppResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::config(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.upload.max_size, 200 * 1024 * 1024);
        assert_eq!(config.auth.anonymous_user_id, Some(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.auth.session_secret = "too-short".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.model.frame_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn test_load_if_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(Config::load_if_exists(&path).unwrap().is_none());

        std::fs::write(&path, "[server]\nport = \"not a number\"\n").unwrap();
        assert!(matches!(
            Config::load_if_exists(&path),
            Err(AppError::Config(_))
        ));

        let mut invalid = Config::default();
        invalid.model.frame_interval = 0;
        invalid.save_to_file(&path).unwrap();
        assert!(Config::load_if_exists(&path).is_err());

        Config::default().save_to_file(&path).unwrap();
        let loaded = Config::load_if_exists(&path).unwrap().unwrap();
        assert_eq!(loaded.server.port, 5000);
    }

    #[test]
    fn test_save_and_load_config() {
        let mut original_config = Config::default();
        original_config.auth.anonymous_user_id = None;
        let temp_file = NamedTempFile::new().unwrap();

        original_config.save_to_file(temp_file.path()).unwrap();
        let loaded_config = Config::from_file(temp_file.path()).unwrap();

        assert_eq!(original_config.server.port, loaded_config.server.port);
        assert_eq!(loaded_config.auth.anonymous_user_id, None);
        assert_eq!(
            original_config.model.frame_interval,
            loaded_config.model.frame_interval
        );
    }
}

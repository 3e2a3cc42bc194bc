//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 合成引擎配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 存储目录配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 下载链接使用的外部地址
    /// 未设置时返回相对路径
    #[serde(default)]
    pub base_url: Option<String>,

    /// 上传请求体上限（字节）
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_max_upload_size() -> u64 {
    100 * 1024 * 1024 // 100 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
            max_upload_size: default_max_upload_size(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取用于日志展示的 Base URL
    pub fn display_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }
}

/// 合成引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// 合成服务基础 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// 使用回声合成引擎（开发用）
    #[serde(default)]
    pub fake: bool,
}

fn default_tts_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_tts_timeout() -> u64 {
    120
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
            fake: false,
        }
    }
}

/// 存储目录配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 档案根目录（含 profiles.json）
    #[serde(default = "default_profiles_dir")]
    pub profiles_dir: PathBuf,

    /// 上传暂存目录
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,

    /// 合成输出目录
    #[serde(default = "default_outputs_dir")]
    pub outputs_dir: PathBuf,
}

fn default_profiles_dir() -> PathBuf {
    PathBuf::from("voice_profiles")
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_outputs_dir() -> PathBuf {
    PathBuf::from("outputs")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            profiles_dir: default_profiles_dir(),
            uploads_dir: default_uploads_dir(),
            outputs_dir: default_outputs_dir(),
        }
    }
}

impl StorageConfig {
    /// 索引文档路径
    pub fn index_path(&self) -> PathBuf {
        self.profiles_dir.join("profiles.json")
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别（`RUST_LOG` 优先）
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

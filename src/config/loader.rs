//! Configuration Loader
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml / config.local.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// # 环境变量示例
/// - `VOXFILE_SERVER__PORT=8080`
/// - `VOXFILE_TTS__URL=http://tts-server:8000`
/// - `VOXFILE_TTS__FAKE=true`
/// - `VOXFILE_STORAGE__PROFILES_DIR=/data/voice_profiles`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置，`None` 时搜索默认文件名
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5001)?
        .set_default("server.max_upload_size", 100_u64 * 1024 * 1024)?
        .set_default("tts.url", "http://localhost:8000")?
        .set_default("tts.timeout_secs", 120)?
        .set_default("tts.fake", false)?
        .set_default("storage.profiles_dir", "voice_profiles")?
        .set_default("storage.uploads_dir", "uploads")?
        .set_default("storage.outputs_dir", "outputs")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 例如: VOXFILE_TTS__URL=http://tts-server:8000
    builder = builder.add_source(
        Environment::with_prefix("VOXFILE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let app_config: AppConfig = builder.build()?.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.tts.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS URL cannot be empty".to_string(),
        ));
    }

    let dirs = [
        ("storage.profiles_dir", &config.storage.profiles_dir),
        ("storage.uploads_dir", &config.storage.uploads_dir),
        ("storage.outputs_dir", &config.storage.outputs_dir),
    ];
    if let Some((key, _)) = dirs.iter().find(|(_, dir)| dir.as_os_str().is_empty()) {
        return Err(ConfigError::ValidationError(format!(
            "{} cannot be empty",
            key
        )));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Public Base URL: {}", config.server.display_base_url());
    tracing::info!("Max Upload Size: {} bytes", config.server.max_upload_size);
    if config.tts.fake {
        tracing::info!("TTS: fake (echoes reference sample)");
    } else {
        tracing::info!("TTS URL: {}", config.tts.url);
        tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    }
    tracing::info!("Profiles Directory: {:?}", config.storage.profiles_dir);
    tracing::info!("Uploads Directory: {:?}", config.storage.uploads_dir);
    tracing::info!("Outputs Directory: {:?}", config.storage.outputs_dir);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validation_passes_for_valid_config() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_tts_url() {
        let mut config = AppConfig::default();
        config.tts.url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_dir() {
        let mut config = AppConfig::default();
        config.storage.uploads_dir = PathBuf::new();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("storage.uploads_dir"));
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voxfile.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 6100

[tts]
fake = true

[storage]
profiles_dir = "/srv/voices"
"#,
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();
        assert_eq!(config.server.port, 6100);
        assert!(config.tts.fake);
        assert_eq!(config.storage.profiles_dir, PathBuf::from("/srv/voices"));
        assert_eq!(config.storage.uploads_dir, PathBuf::from("uploads"));
    }
}

//! Voxfile - 音色档案存储与语音克隆服务
//!
//! - Domain: profile/ (Bounded Context), language
//! - Application: profile_manager, commands, queries, ports
//! - Infrastructure: http, persistence, adapters

use std::sync::Arc;

use voxfile::application::{ProfileManager, TtsEnginePort};
use voxfile::config::{load_config, print_config, AppConfig};
use voxfile::infrastructure::adapters::{
    FakeTtsClient, FakeTtsClientConfig, FsSampleStore, HttpTtsClient, HttpTtsClientConfig,
    SystemClock,
};
use voxfile::infrastructure::http::{AppState, HttpServer, ServerConfig};
use voxfile::infrastructure::persistence::JsonProfileIndex;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Voxfile - 音色档案与语音克隆服务");
    print_config(&config);

    // 确保数据目录存在
    tokio::fs::create_dir_all(&config.storage.uploads_dir).await?;
    tokio::fs::create_dir_all(&config.storage.outputs_dir).await?;

    // 档案存储：索引文档 + 样本目录
    let index = Arc::new(JsonProfileIndex::new(config.storage.index_path()));
    let samples = Arc::new(FsSampleStore::new(&config.storage.profiles_dir)?);
    let uploads_dir = config.storage.uploads_dir.clone();
    let manager = tokio::task::spawn_blocking(move || {
        ProfileManager::open(index, samples, uploads_dir, Arc::new(SystemClock))
    })
    .await?;
    tracing::info!(profiles = manager.count(), "Profile store ready");

    // 合成引擎
    let tts_engine: Arc<dyn TtsEnginePort> = if config.tts.fake {
        Arc::new(FakeTtsClient::new(FakeTtsClientConfig::default()))
    } else {
        let tts_config =
            HttpTtsClientConfig::new(&config.tts.url).with_timeout(config.tts.timeout_secs);
        Arc::new(HttpTtsClient::new(tts_config)?)
    };

    let state = AppState::new(
        Arc::new(manager),
        tts_engine,
        &config.storage.outputs_dir,
    )
    .with_public_base_url(config.server.base_url.clone());

    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_max_body_bytes(config.server.max_upload_size as usize);
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志，`RUST_LOG` 优先于配置中的级别
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},voxfile={},tower_http=debug",
        config.log.level, config.log.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

//! Voxfile - 音色档案存储与语音克隆服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Profile: 音色档案聚合与值对象
//! - Language: 支持的合成语言
//!
//! 应用层 (application/):
//! - ProfileManager: 锁保护的档案存储
//! - Ports: 端口定义（ProfileIndex, SampleStore, Clock, TtsEngine）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Persistence: JSON 索引文档
//! - Adapters: 样本文件存储, 时钟, TTS Client

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};

//! TTS Engine Port - 语音合成引擎抽象
//!
//! 合成引擎视为黑盒：文本 + 参考样本路径 + 语言 → 音频数据

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::Language;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Reference sample unreadable: {0}")]
    ReferenceUnreadable(String),
}

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// 要合成的文本
    pub text: String,
    /// 参考样本路径（来自 primary_sample）
    pub reference_sample_path: PathBuf,
    /// 合成语言
    pub language: Language,
}

/// 合成响应
#[derive(Debug, Clone)]
pub struct SynthesisResponse {
    /// WAV 音频数据
    pub audio_data: Vec<u8>,
    /// 音频时长（毫秒）
    pub duration_ms: Option<u64>,
    /// 采样率
    pub sample_rate: Option<u32>,
}

/// TTS Engine Port
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 执行语音合成
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError>;

    /// 检查合成服务是否可用
    async fn health_check(&self) -> bool {
        true
    }
}

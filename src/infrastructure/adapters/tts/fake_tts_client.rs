//! Fake TTS Client - 用于开发和测试的合成引擎
//!
//! 不实际合成，直接返回参考样本的内容

use async_trait::async_trait;
use std::time::Duration;

use crate::application::ports::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 模拟推理延迟（毫秒）
    pub latency_ms: u64,
    /// 固定返回的音频时长（毫秒）
    pub duration_ms: u64,
    /// 采样率
    pub sample_rate: u32,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            latency_ms: 0,
            duration_ms: 5000,
            sample_rate: 22050,
        }
    }
}

/// Fake TTS Client
#[derive(Debug, Default)]
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Self {
        tracing::info!(
            latency_ms = config.latency_ms,
            duration_ms = config.duration_ms,
            "FakeTtsClient initialized"
        );
        Self { config }
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError> {
        tracing::debug!(
            text_len = request.text.len(),
            language = %request.language,
            reference = %request.reference_sample_path.display(),
            "FakeTtsClient: echoing reference sample"
        );

        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }

        let audio_data = tokio::fs::read(&request.reference_sample_path)
            .await
            .map_err(|e| TtsError::ReferenceUnreadable(e.to_string()))?;

        Ok(SynthesisResponse {
            audio_data,
            duration_ms: Some(self.config.duration_ms),
            sample_rate: Some(self.config.sample_rate),
        })
    }
}

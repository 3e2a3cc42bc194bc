//! HTTP TTS Client - 调用外部语音克隆合成服务
//!
//! 外部 TTS API:
//! POST {base_url}/api/tts/synthesize  (multipart/form-data)
//! - `text`: 要合成的文本
//! - `language`: 语言代码
//! - `speaker_wav`: 参考样本文件
//!
//! 响应体为 WAV 音频，元数据在 `X-TTS-Duration-Ms` / `X-TTS-Sample-Rate` 头中

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

use crate::application::ports::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};

const DURATION_HEADER: &str = "X-TTS-Duration-Ms";
const SAMPLE_RATE_HEADER: &str = "X-TTS-Sample-Rate";

/// HTTP TTS 客户端配置
#[derive(Debug, Clone)]
pub struct HttpTtsClientConfig {
    /// TTS 服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒），合成长文本可能较慢
    pub timeout_secs: u64,
}

impl Default for HttpTtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
        }
    }
}

impl HttpTtsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP TTS 客户端
pub struct HttpTtsClient {
    client: Client,
    base_url: String,
}

impl HttpTtsClient {
    pub fn new(config: HttpTtsClientConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// 读取参考样本并包装为 multipart 文件字段
async fn reference_part(path: &Path) -> Result<Part, TtsError> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| TtsError::ReferenceUnreadable(format!("{}: {}", path.display(), e)))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "reference.wav".to_string());

    Ok(Part::bytes(data).file_name(file_name))
}

fn send_error(e: reqwest::Error) -> TtsError {
    if e.is_timeout() {
        TtsError::Timeout
    } else if e.is_connect() {
        TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
    } else {
        TtsError::NetworkError(e.to_string())
    }
}

/// 从响应头提取 (时长, 采样率)，缺失或无法解析时为 None
fn audio_metadata(headers: &HeaderMap) -> (Option<u64>, Option<u32>) {
    let value = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    (
        value(DURATION_HEADER).and_then(|v| v.trim().parse().ok()),
        value(SAMPLE_RATE_HEADER).and_then(|v| v.trim().parse().ok()),
    )
}

#[async_trait]
impl TtsEnginePort for HttpTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError> {
        let url = self.endpoint("/api/tts/synthesize");
        let speaker_wav = reference_part(&request.reference_sample_path).await?;

        tracing::debug!(
            url = %url,
            text_len = request.text.len(),
            reference = %request.reference_sample_path.display(),
            language = %request.language,
            "Sending TTS synthesize request"
        );

        let form = Form::new()
            .text("text", request.text)
            .text("language", request.language.code())
            .part("speaker_wav", speaker_wav);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError(format!("HTTP {}: {}", status, detail)));
        }

        let (duration_ms, sample_rate) = audio_metadata(response.headers());
        let audio_data = response
            .bytes()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .to_vec();

        if audio_data.is_empty() {
            return Err(TtsError::InvalidResponse("Empty audio body".to_string()));
        }

        tracing::info!(
            duration_ms = ?duration_ms,
            sample_rate = ?sample_rate,
            audio_size = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(SynthesisResponse {
            audio_data,
            duration_ms,
            sample_rate,
        })
    }

    async fn health_check(&self) -> bool {
        self.client
            .get(self.endpoint("/health"))
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Language;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_endpoint_ignores_trailing_slash() {
        let client = HttpTtsClient::new(HttpTtsClientConfig::new("http://tts:8000/")).unwrap();
        assert_eq!(
            client.endpoint("/api/tts/synthesize"),
            "http://tts:8000/api/tts/synthesize"
        );
    }

    #[test]
    fn test_audio_metadata() {
        let mut headers = HeaderMap::new();
        assert_eq!(audio_metadata(&headers), (None, None));

        headers.insert(DURATION_HEADER, HeaderValue::from_static("1500"));
        headers.insert(SAMPLE_RATE_HEADER, HeaderValue::from_static("not-a-number"));
        assert_eq!(audio_metadata(&headers), (Some(1500), None));
    }

    #[tokio::test]
    async fn test_unreadable_reference_fails_before_request() {
        let client = HttpTtsClient::new(HttpTtsClientConfig::new("http://127.0.0.1:1")).unwrap();
        let result = client
            .synthesize(SynthesisRequest {
                text: "hello".to_string(),
                reference_sample_path: "/nonexistent/voice.wav".into(),
                language: Language::default(),
            })
            .await;

        assert!(matches!(result, Err(TtsError::ReferenceUnreadable(_))));
    }

    #[tokio::test]
    async fn test_health_check_unreachable_service() {
        let client =
            HttpTtsClient::new(HttpTtsClientConfig::new("http://127.0.0.1:1").with_timeout(2))
                .unwrap();
        assert!(!client.health_check().await);
    }
}

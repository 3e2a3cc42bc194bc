//! Clone Command Handlers - 语音合成
//!
//! 档案流程: 解析语言 → 在档案锁内解析主样本路径 → 锁外调用合成引擎 → 写出输出文件
//!
//! 参考音频流程跳过档案，直接使用上传区中的文件

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use uuid::Uuid;

use crate::application::blocking::run_blocking;
use crate::application::commands::{CloneWithProfile, CloneWithReference};
use crate::application::error::ApplicationError;
use crate::application::ports::{SynthesisRequest, TtsEnginePort};
use crate::application::profile_manager::ProfileManager;
use crate::domain::profile::SampleName;
use crate::domain::Language;

/// 克隆响应
#[derive(Debug, Clone)]
pub struct CloneResponse {
    /// 使用档案合成时为档案 ID
    pub profile_id: Option<String>,
    /// 输出文件名（位于输出目录下）
    pub output_file: String,
    pub output_path: PathBuf,
    pub language: Language,
    pub duration_ms: Option<u64>,
}

/// CloneWithProfile Handler
pub struct CloneWithProfileHandler {
    manager: Arc<ProfileManager>,
    tts_engine: Arc<dyn TtsEnginePort>,
    outputs_dir: PathBuf,
}

impl CloneWithProfileHandler {
    pub fn new(
        manager: Arc<ProfileManager>,
        tts_engine: Arc<dyn TtsEnginePort>,
        outputs_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            manager,
            tts_engine,
            outputs_dir: outputs_dir.into(),
        }
    }

    pub async fn handle(&self, cmd: CloneWithProfile) -> Result<CloneResponse, ApplicationError> {
        if cmd.text.trim().is_empty() {
            return Err(ApplicationError::validation("No text provided"));
        }

        let language = parse_language(cmd.language.as_deref())?;

        // 区分档案不存在与档案没有可用样本
        let manager = self.manager.clone();
        let profile_id = cmd.profile_id.clone();
        let resolved = run_blocking(move || {
            Ok(manager
                .get(&profile_id)
                .map(|_| manager.primary_sample(&profile_id)))
        })
        .await?;

        let reference_sample_path = match resolved {
            None => {
                return Err(ApplicationError::not_found(
                    "Profile",
                    cmd.profile_id.as_str(),
                ))
            }
            Some(None) => {
                return Err(ApplicationError::validation(format!(
                    "Profile '{}' has no usable samples",
                    cmd.profile_id
                )))
            }
            Some(Some(path)) => path,
        };

        tracing::info!(
            profile_id = %cmd.profile_id,
            language = %language,
            text_len = cmd.text.len(),
            reference = %reference_sample_path.display(),
            "Generating speech with profile"
        );

        let response = synthesize_to_output(
            self.tts_engine.as_ref(),
            &self.outputs_dir,
            SynthesisRequest {
                text: cmd.text,
                reference_sample_path,
                language,
            },
        )
        .await?;

        tracing::info!(
            profile_id = %cmd.profile_id,
            output_file = %response.output_file,
            "Voice cloned"
        );

        Ok(CloneResponse {
            profile_id: Some(cmd.profile_id.to_string()),
            ..response
        })
    }
}

/// CloneWithReference Handler
pub struct CloneWithReferenceHandler {
    tts_engine: Arc<dyn TtsEnginePort>,
    uploads_dir: PathBuf,
    outputs_dir: PathBuf,
}

impl CloneWithReferenceHandler {
    pub fn new(
        tts_engine: Arc<dyn TtsEnginePort>,
        uploads_dir: impl Into<PathBuf>,
        outputs_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            tts_engine,
            uploads_dir: uploads_dir.into(),
            outputs_dir: outputs_dir.into(),
        }
    }

    pub async fn handle(&self, cmd: CloneWithReference) -> Result<CloneResponse, ApplicationError> {
        if cmd.reference_file.is_empty() {
            return Err(ApplicationError::validation("No reference file specified"));
        }
        if cmd.text.trim().is_empty() {
            return Err(ApplicationError::validation("No text provided"));
        }

        let language = parse_language(cmd.language.as_deref())?;

        // 只接受上传区内的单级文件名
        let reference = SampleName::new(&cmd.reference_file)
            .map_err(|_| ApplicationError::validation("Reference file not found"))?;
        let reference_sample_path = self.uploads_dir.join(reference.as_str());
        let is_file = fs::metadata(&reference_sample_path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(ApplicationError::validation("Reference file not found"));
        }

        tracing::info!(
            reference = %reference,
            language = %language,
            text_len = cmd.text.len(),
            "Generating speech with reference file"
        );

        let response = synthesize_to_output(
            self.tts_engine.as_ref(),
            &self.outputs_dir,
            SynthesisRequest {
                text: cmd.text,
                reference_sample_path,
                language,
            },
        )
        .await?;

        tracing::info!(
            reference = %reference,
            output_file = %response.output_file,
            "Voice cloned"
        );

        Ok(response)
    }
}

/// 空值取默认语言，其余必须是支持的语言代码
fn parse_language(code: Option<&str>) -> Result<Language, ApplicationError> {
    match code {
        None | Some("") => Ok(Language::default()),
        Some(code) => Language::parse(code)
            .ok_or_else(|| ApplicationError::validation(format!("Unsupported language: {}", code))),
    }
}

/// 调用合成引擎并把音频写入输出目录
async fn synthesize_to_output(
    tts_engine: &dyn TtsEnginePort,
    outputs_dir: &Path,
    request: SynthesisRequest,
) -> Result<CloneResponse, ApplicationError> {
    let language = request.language;
    let response = tts_engine.synthesize(request).await?;

    fs::create_dir_all(outputs_dir)
        .await
        .map_err(|e| ApplicationError::StorageError(e.to_string()))?;

    let output_file = output_filename();
    let output_path = outputs_dir.join(&output_file);
    fs::write(&output_path, &response.audio_data)
        .await
        .map_err(|e| ApplicationError::StorageError(e.to_string()))?;

    tracing::debug!(
        output_file = %output_file,
        audio_size = response.audio_data.len(),
        "Synthesized audio written"
    );

    Ok(CloneResponse {
        profile_id: None,
        output_file,
        output_path,
        language,
        duration_ms: response.duration_ms,
    })
}

/// `cloned_<unix 秒>_<8 位十六进制>.wav`
fn output_filename() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("cloned_{}_{}.wav", Utc::now().timestamp(), &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::ProfileId;
    use crate::infrastructure::adapters::{FakeTtsClient, FsSampleStore, SystemClock};
    use crate::infrastructure::persistence::JsonProfileIndex;
    use tempfile::{tempdir, TempDir};

    fn setup() -> (TempDir, Arc<ProfileManager>, CloneWithProfileHandler) {
        let dir = tempdir().unwrap();
        let profiles_dir = dir.path().join("voice_profiles");
        let uploads_dir = dir.path().join("uploads");
        std::fs::create_dir_all(&uploads_dir).unwrap();

        let manager = Arc::new(ProfileManager::open(
            Arc::new(JsonProfileIndex::new(profiles_dir.join("profiles.json"))),
            Arc::new(FsSampleStore::new(&profiles_dir).unwrap()),
            uploads_dir,
            Arc::new(SystemClock),
        ));
        let handler = CloneWithProfileHandler::new(
            manager.clone(),
            Arc::new(FakeTtsClient::default()),
            dir.path().join("outputs"),
        );
        (dir, manager, handler)
    }

    fn reference_command(reference_file: &str) -> CloneWithReference {
        CloneWithReference {
            reference_file: reference_file.to_string(),
            text: "Bonjour".to_string(),
            language: Some("fr".to_string()),
        }
    }

    fn command(profile_id: &ProfileId, language: Option<&str>) -> CloneWithProfile {
        CloneWithProfile {
            profile_id: profile_id.clone(),
            text: "Hello there".to_string(),
            language: language.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_clone_writes_output() {
        let (dir, manager, handler) = setup();
        let profile = manager.create("Ada").unwrap();
        std::fs::write(dir.path().join("uploads/voice1.wav"), b"reference audio").unwrap();
        manager.add_sample(profile.id(), "voice1.wav").unwrap();

        let result = handler.handle(command(profile.id(), Some("fr"))).await.unwrap();

        assert!(result.output_file.starts_with("cloned_"));
        assert!(result.output_file.ends_with(".wav"));
        assert_eq!(result.profile_id.as_deref(), Some(profile.id().as_str()));
        assert_eq!(result.language.code(), "fr");
        assert_eq!(
            std::fs::read(&result.output_path).unwrap(),
            b"reference audio"
        );
    }

    #[tokio::test]
    async fn test_clone_rejects_bad_input() {
        let (_dir, manager, handler) = setup();
        let profile = manager.create("Ada").unwrap();

        let no_samples = handler.handle(command(profile.id(), None)).await;
        assert!(matches!(no_samples, Err(ApplicationError::ValidationError(_))));

        let unknown = handler
            .handle(command(&ProfileId::from("missing"), None))
            .await;
        assert!(matches!(unknown, Err(ApplicationError::NotFound { .. })));

        let bad_lang = handler.handle(command(profile.id(), Some("xx"))).await;
        assert!(matches!(bad_lang, Err(ApplicationError::ValidationError(_))));

        let mut empty_text = command(profile.id(), None);
        empty_text.text = "   ".to_string();
        assert!(matches!(
            handler.handle(empty_text).await,
            Err(ApplicationError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_clone_with_reference_file() {
        let (dir, _manager, _handler) = setup();
        std::fs::write(dir.path().join("uploads/reference_1.wav"), b"raw reference").unwrap();
        let handler = CloneWithReferenceHandler::new(
            Arc::new(FakeTtsClient::default()),
            dir.path().join("uploads"),
            dir.path().join("outputs"),
        );

        let result = handler.handle(reference_command("reference_1.wav")).await.unwrap();

        assert!(result.profile_id.is_none());
        assert!(result.output_file.starts_with("cloned_"));
        assert_eq!(result.output_path, dir.path().join("outputs").join(&result.output_file));
        assert_eq!(std::fs::read(&result.output_path).unwrap(), b"raw reference");
    }

    #[tokio::test]
    async fn test_clone_with_reference_rejects_bad_input() {
        let (dir, _manager, _handler) = setup();
        std::fs::write(dir.path().join("secret.wav"), b"outside uploads").unwrap();
        let handler = CloneWithReferenceHandler::new(
            Arc::new(FakeTtsClient::default()),
            dir.path().join("uploads"),
            dir.path().join("outputs"),
        );

        let message = |r: Result<CloneResponse, ApplicationError>| match r {
            Err(ApplicationError::ValidationError(m)) => m,
            other => panic!("expected validation error, got {:?}", other),
        };

        assert_eq!(
            message(handler.handle(reference_command("")).await),
            "No reference file specified"
        );
        assert_eq!(
            message(handler.handle(reference_command("missing.wav")).await),
            "Reference file not found"
        );
        assert_eq!(
            message(handler.handle(reference_command("../secret.wav")).await),
            "Reference file not found"
        );

        let mut no_text = reference_command("missing.wav");
        no_text.text = String::new();
        assert_eq!(message(handler.handle(no_text).await), "No text provided");

        assert!(!dir.path().join("outputs").exists());
    }
}

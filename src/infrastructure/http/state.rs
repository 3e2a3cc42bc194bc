//! Application State
//!
//! 持有合成引擎、文件目录与所有 Command/Query Handlers

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::{
    // Command handlers
    AddSampleHandler, CloneWithProfileHandler, CloneWithReferenceHandler, CreateProfileHandler,
    DeleteProfileHandler, RemoveSampleHandler, RenameProfileHandler,
    // Query handlers
    GetProfileHandler, ListProfilesHandler,
    // Core
    ProfileManager, TtsEnginePort,
};

/// 应用状态
pub struct AppState {
    // ========== Core ==========
    pub tts_engine: Arc<dyn TtsEnginePort>,
    pub uploads_dir: PathBuf,
    pub outputs_dir: PathBuf,
    /// 生成下载链接时使用的外部地址，缺省为相对路径
    pub public_base_url: Option<String>,

    // ========== Command Handlers ==========
    pub create_profile_handler: CreateProfileHandler,
    pub add_sample_handler: AddSampleHandler,
    pub remove_sample_handler: RemoveSampleHandler,
    pub rename_profile_handler: RenameProfileHandler,
    pub delete_profile_handler: DeleteProfileHandler,
    pub clone_handler: CloneWithProfileHandler,
    pub clone_reference_handler: CloneWithReferenceHandler,

    // ========== Query Handlers ==========
    pub get_profile_handler: GetProfileHandler,
    pub list_profiles_handler: ListProfilesHandler,
}

impl AppState {
    /// 创建应用状态，上传目录取自档案存储
    pub fn new(
        manager: Arc<ProfileManager>,
        tts_engine: Arc<dyn TtsEnginePort>,
        outputs_dir: impl Into<PathBuf>,
    ) -> Self {
        let outputs_dir = outputs_dir.into();
        let uploads_dir = manager.uploads_dir().to_path_buf();

        Self {
            uploads_dir: uploads_dir.clone(),
            outputs_dir: outputs_dir.clone(),
            public_base_url: None,
            tts_engine: tts_engine.clone(),

            // Command handlers
            create_profile_handler: CreateProfileHandler::new(manager.clone()),
            add_sample_handler: AddSampleHandler::new(manager.clone()),
            remove_sample_handler: RemoveSampleHandler::new(manager.clone()),
            rename_profile_handler: RenameProfileHandler::new(manager.clone()),
            delete_profile_handler: DeleteProfileHandler::new(manager.clone()),
            clone_handler: CloneWithProfileHandler::new(
                manager.clone(),
                tts_engine.clone(),
                outputs_dir.clone(),
            ),
            clone_reference_handler: CloneWithReferenceHandler::new(
                tts_engine,
                uploads_dir,
                outputs_dir,
            ),

            // Query handlers
            get_profile_handler: GetProfileHandler::new(manager.clone()),
            list_profiles_handler: ListProfilesHandler::new(manager),
        }
    }

    /// 设置下载链接前缀（去掉末尾的 `/`）
    pub fn with_public_base_url(mut self, base_url: Option<String>) -> Self {
        self.public_base_url = base_url.map(|url| url.trim_end_matches('/').to_string());
        self
    }

    /// 输出文件的下载链接
    pub fn download_url(&self, filename: &str) -> String {
        format!(
            "{}/download/{}",
            self.public_base_url.as_deref().unwrap_or_default(),
            filename
        )
    }
}

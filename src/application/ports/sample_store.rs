//! Sample Store Port - 样本文件存储抽象
//!
//! 负责把上传区的音频复制进档案私有目录，以及删除样本/整个目录。
//! 除文件系统本身外不持有任何状态。

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::profile::{ProfileId, SampleName};

/// 样本存储错误
#[derive(Debug, Error)]
pub enum SampleStoreError {
    #[error("Profile directory not found: {0}")]
    ProfileDirMissing(ProfileId),

    #[error("Source file not found: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("Invalid sample filename: {0}")]
    InvalidFilename(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Sample Store Port
///
/// 同步接口：只在 ProfileManager 的临界区内调用
pub trait SampleStorePort: Send + Sync {
    /// 档案样本目录
    fn profile_dir(&self, profile_id: &ProfileId) -> PathBuf;

    /// 创建档案样本目录（已存在时不报错）
    fn create_profile_dir(&self, profile_id: &ProfileId) -> Result<(), SampleStoreError>;

    /// 复制源文件到档案目录，返回存储的文件名（与源文件同名）
    fn add(&self, profile_id: &ProfileId, source: &Path) -> Result<SampleName, SampleStoreError>;

    /// 删除单个样本文件，文件不存在时不报错
    fn remove(&self, profile_id: &ProfileId, sample: &SampleName) -> Result<(), SampleStoreError>;

    /// 递归删除整个档案目录，目录不存在时不报错
    fn delete_all(&self, profile_id: &ProfileId) -> Result<(), SampleStoreError>;

    /// 样本文件路径
    fn sample_path(&self, profile_id: &ProfileId, sample: &str) -> PathBuf {
        self.profile_dir(profile_id).join(sample)
    }

    fn profile_dir_exists(&self, profile_id: &ProfileId) -> bool {
        self.profile_dir(profile_id).is_dir()
    }

    fn sample_exists(&self, profile_id: &ProfileId, sample: &str) -> bool {
        self.sample_path(profile_id, sample).is_file()
    }
}

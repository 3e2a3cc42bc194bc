//! Sample Store - 文件系统样本存储实现
//!
//! 实现 SampleStorePort trait
//!
//! 目录布局: `<base_dir>/<profile_id>/<sample 文件名>`

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::application::ports::{SampleStoreError, SampleStorePort};
use crate::domain::profile::{ProfileId, SampleName};

/// 文件系统样本存储
pub struct FsSampleStore {
    /// 档案根目录（同时存放索引文档）
    base_dir: PathBuf,
}

impl FsSampleStore {
    /// 创建新的样本存储，确保根目录存在
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, SampleStoreError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        fs::create_dir_all(&base_dir).map_err(|e| SampleStoreError::IoError(e.to_string()))?;

        Ok(Self { base_dir })
    }
}

impl SampleStorePort for FsSampleStore {
    fn profile_dir(&self, profile_id: &ProfileId) -> PathBuf {
        self.base_dir.join(profile_id.as_str())
    }

    fn create_profile_dir(&self, profile_id: &ProfileId) -> Result<(), SampleStoreError> {
        fs::create_dir_all(self.profile_dir(profile_id))
            .map_err(|e| SampleStoreError::IoError(e.to_string()))
    }

    fn add(&self, profile_id: &ProfileId, source: &Path) -> Result<SampleName, SampleStoreError> {
        let profile_dir = self.profile_dir(profile_id);
        if !profile_dir.is_dir() {
            return Err(SampleStoreError::ProfileDirMissing(profile_id.clone()));
        }

        if !source.is_file() {
            return Err(SampleStoreError::SourceMissing(source.to_path_buf()));
        }

        let filename = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SampleStoreError::InvalidFilename(source.display().to_string()))?;
        let sample = SampleName::new(filename).map_err(SampleStoreError::InvalidFilename)?;

        // 复制而非移动，上传区保持不变；同名文件被覆盖
        let dest = profile_dir.join(sample.as_str());
        let bytes =
            fs::copy(source, &dest).map_err(|e| SampleStoreError::IoError(e.to_string()))?;

        tracing::debug!(
            profile_id = %profile_id,
            sample = %sample,
            size = bytes,
            "Copied sample into profile directory"
        );

        Ok(sample)
    }

    fn remove(&self, profile_id: &ProfileId, sample: &SampleName) -> Result<(), SampleStoreError> {
        let path = self.sample_path(profile_id, sample.as_str());

        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(profile_id = %profile_id, sample = %sample, "Deleted sample file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SampleStoreError::IoError(e.to_string())),
        }
    }

    fn delete_all(&self, profile_id: &ProfileId) -> Result<(), SampleStoreError> {
        let profile_dir = self.profile_dir(profile_id);

        match fs::remove_dir_all(&profile_dir) {
            Ok(()) => {
                tracing::debug!(profile_id = %profile_id, "Deleted profile directory");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SampleStoreError::IoError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_add_copies_and_keeps_source() {
        let temp_dir = tempdir().unwrap();
        let store = FsSampleStore::new(temp_dir.path().join("profiles")).unwrap();
        let source = temp_dir.path().join("voice1.wav");
        fs::write(&source, b"fake wav data").unwrap();

        let id = ProfileId::from("profile_20240101_120000");
        store.create_profile_dir(&id).unwrap();

        let sample = store.add(&id, &source).unwrap();
        assert_eq!(sample.as_str(), "voice1.wav");
        assert!(source.exists());
        assert!(store.sample_exists(&id, "voice1.wav"));
        assert_eq!(
            fs::read(store.sample_path(&id, "voice1.wav")).unwrap(),
            b"fake wav data"
        );
    }

    #[test]
    fn test_add_failures() {
        let temp_dir = tempdir().unwrap();
        let store = FsSampleStore::new(temp_dir.path()).unwrap();
        let source = temp_dir.path().join("voice1.wav");
        let id = ProfileId::from("profile_20240101_120000");

        assert!(matches!(
            store.add(&id, &source),
            Err(SampleStoreError::ProfileDirMissing(_))
        ));

        store.create_profile_dir(&id).unwrap();
        assert!(matches!(
            store.add(&id, &source),
            Err(SampleStoreError::SourceMissing(_))
        ));
    }

    #[test]
    fn test_remove_and_delete_all_are_idempotent() {
        let temp_dir = tempdir().unwrap();
        let store = FsSampleStore::new(temp_dir.path()).unwrap();
        let source = temp_dir.path().join("voice1.wav");
        fs::write(&source, b"data").unwrap();

        let id = ProfileId::from("profile_20240101_120000");
        store.create_profile_dir(&id).unwrap();
        let sample = store.add(&id, &source).unwrap();

        store.remove(&id, &sample).unwrap();
        store.remove(&id, &sample).unwrap();
        assert!(!store.sample_exists(&id, "voice1.wav"));

        store.delete_all(&id).unwrap();
        store.delete_all(&id).unwrap();
        assert!(!store.profile_dir_exists(&id));
    }
}

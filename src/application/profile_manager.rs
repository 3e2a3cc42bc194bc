//! Profile Manager - 音色档案管理核心
//!
//! 组合 Profile Index 与 Sample Store，对外提供档案的增删改查。
//!
//! 并发模型:
//! - 内存映射与索引文档视为同一个共享资源，由一把读写锁保护
//! - 所有写操作在写锁内完成: 唯一性检查 → 文件操作 → 内存更新 → 持久化
//! - 读操作持读锁，彼此可并发，但不会观察到进行到一半的写操作
//!
//! 持久化策略: 每个写操作在返回成功前都会保存整个索引文档

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::application::ports::{
    Clock, IndexError, ProfileIndexPort, ProfileMap, SampleStoreError, SampleStorePort,
};
use crate::domain::profile::{Profile, ProfileError, ProfileId, ProfileName, SampleName};

/// 锁内共享状态
#[derive(Default)]
struct ProfileState {
    profiles: ProfileMap,
    /// 本进程内已删除的档案 ID，不再分配
    retired: HashSet<ProfileId>,
}

/// 音色档案管理器
///
/// 每个进程构造一次，以 `Arc<ProfileManager>` 的形式交给请求处理器。
/// 所有方法都是同步阻塞的，异步上下文中应通过 `spawn_blocking` 调用。
pub struct ProfileManager {
    state: RwLock<ProfileState>,
    index: Arc<dyn ProfileIndexPort>,
    samples: Arc<dyn SampleStorePort>,
    uploads_dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl ProfileManager {
    /// 构造管理器并从索引文档重建内存映射
    ///
    /// 索引文档不可读或无法解析时不会失败：记录错误日志并以空索引启动
    pub fn open(
        index: Arc<dyn ProfileIndexPort>,
        samples: Arc<dyn SampleStorePort>,
        uploads_dir: impl Into<PathBuf>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let profiles = load_or_empty(index.as_ref());

        Self {
            state: RwLock::new(ProfileState {
                profiles,
                retired: HashSet::new(),
            }),
            index,
            samples,
            uploads_dir: uploads_dir.into(),
            clock,
        }
    }

    /// 上传暂存目录
    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    // ========================================================================
    // 写操作
    // ========================================================================

    /// 创建空档案
    pub fn create(&self, name: &str) -> Result<Profile, ProfileError> {
        let name = ProfileName::new(name).map_err(ProfileError::InvalidName)?;
        let mut state = self.write_state();

        if state.profiles.values().any(|p| p.name() == &name) {
            return Err(ProfileError::DuplicateName(name.to_string()));
        }

        let created_at = self.clock.now();
        let profile_id = self.next_id(&state, ProfileId::generate(created_at));
        self.samples.create_profile_dir(&profile_id)?;

        let profile = Profile::new(profile_id.clone(), name, created_at);
        state.profiles.insert(profile_id.clone(), profile.clone());

        if let Err(e) = self.persist(&state) {
            state.profiles.remove(&profile_id);
            if let Err(cleanup) = self.samples.delete_all(&profile_id) {
                tracing::warn!(
                    profile_id = %profile_id,
                    error = %cleanup,
                    "Failed to remove directory of unsaved profile"
                );
            }
            return Err(e);
        }

        tracing::info!(
            profile_id = %profile_id,
            name = %profile.name(),
            "Profile created"
        );

        Ok(profile)
    }

    /// 从上传区复制样本并附加到档案
    ///
    /// 同名样本只记录一次，但文件会被重新复制
    pub fn add_sample(
        &self,
        profile_id: &ProfileId,
        audio_file: &str,
    ) -> Result<Profile, ProfileError> {
        let sample = SampleName::new(audio_file).map_err(ProfileError::InvalidFilename)?;
        let mut state = self.write_state();

        if !state.profiles.contains_key(profile_id) {
            return Err(ProfileError::NotFound(profile_id.clone()));
        }

        let source = self.uploads_dir.join(sample.as_str());
        let stored = self.samples.add(profile_id, &source)?;

        let appended = match state.profiles.get_mut(profile_id) {
            Some(profile) => profile.add_sample(&stored),
            None => return Err(ProfileError::NotFound(profile_id.clone())),
        };

        if appended {
            if let Err(e) = self.persist(&state) {
                if let Some(profile) = state.profiles.get_mut(profile_id) {
                    profile.remove_sample(stored.as_str());
                }
                if let Err(cleanup) = self.samples.remove(profile_id, &stored) {
                    tracing::warn!(
                        profile_id = %profile_id,
                        sample = %stored,
                        error = %cleanup,
                        "Failed to remove unrecorded sample"
                    );
                }
                return Err(e);
            }

            tracing::info!(profile_id = %profile_id, sample = %stored, "Sample added");
        } else {
            tracing::debug!(
                profile_id = %profile_id,
                sample = %stored,
                "Sample already attached, file refreshed"
            );
        }

        state
            .profiles
            .get(profile_id)
            .cloned()
            .ok_or_else(|| ProfileError::NotFound(profile_id.clone()))
    }

    /// 移除样本，档案或样本不存在时返回 false
    pub fn remove_sample(
        &self,
        profile_id: &ProfileId,
        audio_file: &str,
    ) -> Result<bool, ProfileError> {
        let Ok(sample) = SampleName::new(audio_file) else {
            return Ok(false);
        };
        let mut state = self.write_state();

        let recorded = state
            .profiles
            .get(profile_id)
            .is_some_and(|p| p.has_sample(sample.as_str()));
        if !recorded {
            return Ok(false);
        }

        // 先删文件再解除记录；文件已删除，保存失败时不回滚内存
        self.samples.remove(profile_id, &sample)?;
        if let Some(profile) = state.profiles.get_mut(profile_id) {
            profile.remove_sample(sample.as_str());
        }
        self.persist(&state)?;

        tracing::info!(profile_id = %profile_id, sample = %sample, "Sample removed");

        Ok(true)
    }

    /// 删除档案及其整个样本目录，档案不存在时返回 false
    pub fn delete(&self, profile_id: &ProfileId) -> Result<bool, ProfileError> {
        let mut state = self.write_state();

        if !state.profiles.contains_key(profile_id) {
            return Ok(false);
        }

        self.samples.delete_all(profile_id)?;
        let removed = state.profiles.remove(profile_id);
        state.retired.insert(profile_id.clone());
        self.persist(&state)?;

        tracing::info!(
            profile_id = %profile_id,
            name = %removed.as_ref().map(|p| p.name().as_str()).unwrap_or_default(),
            "Profile deleted"
        );

        Ok(true)
    }

    /// 重命名档案，档案不存在时返回 false
    ///
    /// 改为自己当前的名字视为成功
    pub fn rename(&self, profile_id: &ProfileId, new_name: &str) -> Result<bool, ProfileError> {
        let new_name = ProfileName::new(new_name).map_err(ProfileError::InvalidName)?;
        let mut state = self.write_state();

        if !state.profiles.contains_key(profile_id) {
            return Ok(false);
        }

        if state
            .profiles
            .iter()
            .any(|(id, p)| id != profile_id && p.name() == &new_name)
        {
            return Err(ProfileError::DuplicateName(new_name.to_string()));
        }

        let old_name = match state.profiles.get_mut(profile_id) {
            Some(profile) => {
                let old = profile.name().clone();
                profile.rename(new_name.clone());
                old
            }
            None => return Ok(false),
        };

        if let Err(e) = self.persist(&state) {
            if let Some(profile) = state.profiles.get_mut(profile_id) {
                profile.rename(old_name);
            }
            return Err(e);
        }

        tracing::info!(
            profile_id = %profile_id,
            old_name = %old_name,
            new_name = %new_name,
            "Profile renamed"
        );

        Ok(true)
    }

    // ========================================================================
    // 读操作
    // ========================================================================

    pub fn get(&self, profile_id: &ProfileId) -> Option<Profile> {
        self.read_state().profiles.get(profile_id).cloned()
    }

    pub fn get_by_name(&self, name: &str) -> Option<Profile> {
        self.read_state()
            .profiles
            .values()
            .find(|p| p.name().as_str() == name)
            .cloned()
    }

    /// 所有档案，按 ID 排序
    pub fn list(&self) -> Vec<Profile> {
        self.read_state().profiles.values().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.read_state().profiles.len()
    }

    /// 主样本路径
    ///
    /// 档案不存在、没有样本或主样本文件缺失时返回 None
    pub fn primary_sample(&self, profile_id: &ProfileId) -> Option<PathBuf> {
        let state = self.read_state();
        let sample = state.profiles.get(profile_id)?.primary_sample()?;

        if self.samples.sample_exists(profile_id, sample) {
            Some(self.samples.sample_path(profile_id, sample))
        } else {
            tracing::warn!(
                profile_id = %profile_id,
                sample = %sample,
                "Primary sample recorded in index but missing on disk"
            );
            None
        }
    }

    /// 所有现存样本路径，文件缺失的条目被跳过
    pub fn all_samples(&self, profile_id: &ProfileId) -> Vec<PathBuf> {
        let state = self.read_state();
        let Some(profile) = state.profiles.get(profile_id) else {
            return Vec::new();
        };

        profile
            .samples()
            .iter()
            .filter_map(|sample| {
                if self.samples.sample_exists(profile_id, sample) {
                    Some(self.samples.sample_path(profile_id, sample))
                } else {
                    tracing::warn!(
                        profile_id = %profile_id,
                        sample = %sample,
                        "Sample recorded in index but missing on disk"
                    );
                    None
                }
            })
            .collect()
    }

    // ========================================================================
    // 内部
    // ========================================================================

    // 写操作在释放锁前总会完成或回滚，中毒的锁内状态仍然一致
    fn read_state(&self) -> RwLockReadGuard<'_, ProfileState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ProfileState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, state: &ProfileState) -> Result<(), ProfileError> {
        self.index.save(&state.profiles).map_err(|e| {
            tracing::error!(error = %e, "Failed to save profile index");
            ProfileError::Storage(e.to_string())
        })
    }

    /// 分配档案 ID，同一秒内冲突时追加数字后缀
    fn next_id(&self, state: &ProfileState, base: ProfileId) -> ProfileId {
        let taken = |id: &ProfileId| {
            state.profiles.contains_key(id)
                || state.retired.contains(id)
                || self.samples.profile_dir_exists(id)
        };

        if !taken(&base) {
            return base;
        }

        let mut n = 2;
        loop {
            let candidate = base.with_suffix(n);
            if !taken(&candidate) {
                tracing::warn!(
                    base = %base,
                    profile_id = %candidate,
                    "Profile id collision, using suffixed id"
                );
                return candidate;
            }
            n += 1;
        }
    }
}

impl From<SampleStoreError> for ProfileError {
    fn from(err: SampleStoreError) -> Self {
        match err {
            SampleStoreError::ProfileDirMissing(id) => ProfileError::NotFound(id),
            SampleStoreError::SourceMissing(path) => ProfileError::SourceMissing(
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
            ),
            SampleStoreError::InvalidFilename(name) => ProfileError::InvalidFilename(name),
            SampleStoreError::IoError(msg) => ProfileError::Storage(msg),
        }
    }
}

/// 读取索引文档，失败时以空索引启动
fn load_or_empty(index: &dyn ProfileIndexPort) -> ProfileMap {
    match index.load() {
        Ok(Some(profiles)) => {
            tracing::info!(count = profiles.len(), "Profile index loaded");
            profiles
        }
        Ok(None) => {
            tracing::info!("No profile index found, starting empty");
            ProfileMap::new()
        }
        Err(IndexError::Corrupt(msg)) => {
            let err = ProfileError::IndexCorrupt(msg);
            tracing::error!(error = %err, "Starting with an empty profile index");
            match index.quarantine() {
                Ok(Some(path)) => tracing::warn!(
                    path = %path.display(),
                    "Corrupt profile index moved aside for inspection"
                ),
                Ok(None) => {}
                Err(e) => tracing::error!(error = %e, "Failed to move corrupt profile index aside"),
            }
            ProfileMap::new()
        }
        Err(e) => {
            let err = ProfileError::IndexCorrupt(e.to_string());
            tracing::error!(error = %err, "Starting with an empty profile index");
            ProfileMap::new()
        }
    }
}

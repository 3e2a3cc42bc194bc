//! Profile Commands

use crate::domain::profile::ProfileId;

/// 创建档案命令
#[derive(Debug, Clone)]
pub struct CreateProfile {
    pub name: String,
}

/// 附加样本命令（`audio_file` 为上传区中的文件名）
#[derive(Debug, Clone)]
pub struct AddSample {
    pub profile_id: ProfileId,
    pub audio_file: String,
}

/// 移除样本命令
#[derive(Debug, Clone)]
pub struct RemoveSample {
    pub profile_id: ProfileId,
    pub audio_file: String,
}

/// 重命名档案命令
#[derive(Debug, Clone)]
pub struct RenameProfile {
    pub profile_id: ProfileId,
    pub name: String,
}

/// 删除档案命令
#[derive(Debug, Clone)]
pub struct DeleteProfile {
    pub profile_id: ProfileId,
}

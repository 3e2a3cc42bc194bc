//! Clone Commands - 基于档案的语音克隆

use crate::domain::profile::ProfileId;

/// 使用档案主样本合成语音
#[derive(Debug, Clone)]
pub struct CloneWithProfile {
    pub profile_id: ProfileId,
    pub text: String,
    /// 语言代码，缺省为 `en`
    pub language: Option<String>,
}

/// 直接使用上传区中的参考音频合成语音
#[derive(Debug, Clone)]
pub struct CloneWithReference {
    /// 上传区中的文件名
    pub reference_file: String,
    pub text: String,
    /// 语言代码，缺省为 `en`
    pub language: Option<String>,
}

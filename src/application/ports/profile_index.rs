//! Profile Index Port - 档案索引文档抽象
//!
//! 持久化单位是整个索引文档，不存在局部更新

use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::profile::{Profile, ProfileId};

/// 档案 ID → 档案
pub type ProfileMap = BTreeMap<ProfileId, Profile>;

/// 索引错误
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Corrupt index document: {0}")]
    Corrupt(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Profile Index Port
pub trait ProfileIndexPort: Send + Sync {
    /// 读取整个索引文档，文档不存在时返回 `Ok(None)`
    fn load(&self) -> Result<Option<ProfileMap>, IndexError>;

    /// 序列化整个映射并原子替换索引文档
    fn save(&self, profiles: &ProfileMap) -> Result<(), IndexError>;

    /// 把无法解析的索引文档移到一旁，返回新路径
    fn quarantine(&self) -> Result<Option<PathBuf>, IndexError>;
}

//! Profile Context - Errors
//!
//! 错误信息会原样返回给 HTTP 调用方，保持英文措辞与旧客户端兼容

use thiserror::Error;

use super::ProfileId;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Profile with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Profile '{0}' not found")]
    NotFound(ProfileId),

    #[error("Audio file '{0}' not found")]
    SourceMissing(String),

    #[error("Invalid profile name: {0}")]
    InvalidName(&'static str),

    #[error("Invalid sample filename: {0}")]
    InvalidFilename(String),

    #[error("Profile index is corrupt: {0}")]
    IndexCorrupt(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

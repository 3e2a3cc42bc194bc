//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::TtsError;
use crate::domain::profile::ProfileError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} '{id}' not found")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("{0}")]
    ValidationError(String),

    /// 资源冲突（如重名）
    #[error("{0}")]
    Conflict(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<ProfileError> for ApplicationError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::NotFound(id) => Self::not_found("Profile", id.as_str()),
            ProfileError::DuplicateName(_) => Self::Conflict(err.to_string()),
            ProfileError::SourceMissing(_)
            | ProfileError::InvalidName(_)
            | ProfileError::InvalidFilename(_) => Self::ValidationError(err.to_string()),
            ProfileError::IndexCorrupt(_) | ProfileError::Storage(_) => {
                Self::StorageError(err.to_string())
            }
        }
    }
}

impl From<TtsError> for ApplicationError {
    fn from(err: TtsError) -> Self {
        Self::ExternalServiceError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::ProfileId;

    #[test]
    fn test_caller_errors_keep_domain_message() {
        let dup: ApplicationError = ProfileError::DuplicateName("Ada".into()).into();
        assert_eq!(dup.to_string(), "Profile with name 'Ada' already exists");

        let missing: ApplicationError = ProfileError::SourceMissing("a.wav".into()).into();
        assert_eq!(missing.to_string(), "Audio file 'a.wav' not found");

        let not_found: ApplicationError = ProfileError::NotFound(ProfileId::from("p1")).into();
        assert_eq!(not_found.to_string(), "Profile 'p1' not found");
    }
}

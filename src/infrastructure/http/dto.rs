//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::application::ProfileView;
use crate::domain::Language;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
///
/// `{"success": bool, "message"?: string, ...data}`，数据字段平铺在顶层
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    /// 附带提示信息
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok(message: impl Into<String>) -> Self {
        Self::success(Empty {}).with_message(message)
    }

    /// 非错误的失败结果（如删除不存在的样本）
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: Empty {},
        }
    }
}

// ============================================================================
// Profile DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ProfileDto {
    pub name: String,
    pub profile_id: String,
    pub samples: Vec<String>,
    pub created_at: String,
    pub sample_count: usize,
}

impl From<ProfileView> for ProfileDto {
    fn from(view: ProfileView) -> Self {
        Self {
            name: view.name,
            profile_id: view.profile_id,
            samples: view.samples,
            created_at: view.created_at,
            sample_count: view.sample_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileData {
    pub profile: ProfileDto,
}

#[derive(Debug, Serialize)]
pub struct ProfilesData {
    pub profiles: Vec<ProfileDto>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameProfileRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SampleRequest {
    #[serde(default)]
    pub audio_file: String,
}

// ============================================================================
// Clone DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CloneWithProfileRequest {
    #[serde(default)]
    pub profile_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CloneWithReferenceRequest {
    #[serde(default)]
    pub reference_file: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CloneData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    pub output_file: String,
    pub download_url: String,
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

// ============================================================================
// Upload DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UploadData {
    pub filename: String,
    pub path: String,
}

// ============================================================================
// File listing DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
    /// 修改时间（Unix 秒，含小数）
    pub modified: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FilesData {
    pub uploads: Vec<FileEntry>,
    pub outputs: Vec<FileEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shape() {
        let body = serde_json::to_value(ApiResponse::success(UploadData {
            filename: "reference_1.wav".into(),
            path: "uploads/reference_1.wav".into(),
        }))
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "success": true,
                "filename": "reference_1.wav",
                "path": "uploads/reference_1.wav"
            })
        );

        let failed = serde_json::to_value(ApiResponse::failed("nope")).unwrap();
        assert_eq!(
            failed,
            serde_json::json!({"success": false, "message": "nope"})
        );
    }
}

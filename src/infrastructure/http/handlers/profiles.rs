//! Profile HTTP Handlers

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::application::{
    AddSample, CreateProfile, DeleteProfile, GetProfile, ListProfiles, RemoveSample,
    RenameProfile,
};
use crate::domain::profile::ProfileId;
use crate::infrastructure::http::dto::{
    ApiResponse, CreateProfileRequest, Empty, ProfileData, ProfileDto, ProfilesData,
    RenameProfileRequest, SampleRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 列出所有档案
pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ProfilesData>>, ApiError> {
    let profiles = state.list_profiles_handler.handle(ListProfiles).await?;

    Ok(Json(ApiResponse::success(ProfilesData {
        profiles: profiles.into_iter().map(ProfileDto::from).collect(),
    })))
}

/// 创建档案
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProfileRequest>,
) -> Result<Json<ApiResponse<ProfileData>>, ApiError> {
    let view = state
        .create_profile_handler
        .handle(CreateProfile { name: req.name })
        .await?;

    let message = format!("Profile '{}' created", view.name);
    Ok(Json(
        ApiResponse::success(ProfileData {
            profile: view.into(),
        })
        .with_message(message),
    ))
}

/// 获取档案详情
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<String>,
) -> Result<Json<ApiResponse<ProfileData>>, ApiError> {
    let view = state
        .get_profile_handler
        .handle(GetProfile {
            profile_id: ProfileId::from(profile_id),
        })
        .await?;

    Ok(Json(ApiResponse::success(ProfileData {
        profile: view.into(),
    })))
}

/// 从上传区附加样本
pub async fn add_sample(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<String>,
    Json(req): Json<SampleRequest>,
) -> Result<Json<ApiResponse<ProfileData>>, ApiError> {
    if req.audio_file.is_empty() {
        return Err(ApiError::BadRequest("No audio file specified".to_string()));
    }

    let message = format!("Sample '{}' added", req.audio_file);
    let view = state
        .add_sample_handler
        .handle(AddSample {
            profile_id: ProfileId::from(profile_id),
            audio_file: req.audio_file,
        })
        .await?;

    Ok(Json(
        ApiResponse::success(ProfileData {
            profile: view.into(),
        })
        .with_message(message),
    ))
}

/// 移除样本；样本不在档案中时 `success: false`
pub async fn remove_sample(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<String>,
    Json(req): Json<SampleRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let audio_file = req.audio_file.clone();
    let removed = state
        .remove_sample_handler
        .handle(RemoveSample {
            profile_id: ProfileId::from(profile_id),
            audio_file: req.audio_file,
        })
        .await?;

    if removed {
        Ok(Json(ApiResponse::ok(format!("Sample '{}' removed", audio_file))))
    } else {
        Ok(Json(ApiResponse::failed(format!(
            "Sample '{}' not found in profile",
            audio_file
        ))))
    }
}

/// 重命名档案
pub async fn rename_profile(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<String>,
    Json(req): Json<RenameProfileRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let message = format!("Profile renamed to '{}'", req.name);
    state
        .rename_profile_handler
        .handle(RenameProfile {
            profile_id: ProfileId::from(profile_id),
            name: req.name,
        })
        .await?;

    Ok(Json(ApiResponse::ok(message)))
}

/// 删除档案及其全部样本
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<String>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let profile_id = ProfileId::from(profile_id);
    state
        .delete_profile_handler
        .handle(DeleteProfile {
            profile_id: profile_id.clone(),
        })
        .await?;

    Ok(Json(ApiResponse::ok(format!(
        "Profile '{}' deleted",
        profile_id
    ))))
}

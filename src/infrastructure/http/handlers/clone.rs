//! Clone Handlers - 使用档案或参考音频合成语音

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{CloneResponse, CloneWithProfile, CloneWithReference};
use crate::domain::profile::ProfileId;
use crate::infrastructure::http::dto::{
    ApiResponse, CloneData, CloneWithProfileRequest, CloneWithReferenceRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 使用档案的主样本克隆语音
pub async fn clone_with_profile(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CloneWithProfileRequest>,
) -> Result<Json<ApiResponse<CloneData>>, ApiError> {
    if req.profile_id.is_empty() {
        return Err(ApiError::BadRequest("No profile selected".to_string()));
    }

    let result = state
        .clone_handler
        .handle(CloneWithProfile {
            profile_id: ProfileId::from(req.profile_id),
            text: req.text,
            language: req.language,
        })
        .await?;

    Ok(Json(clone_data(&state, result)))
}

/// 直接使用上传区中的参考音频克隆语音
pub async fn clone_with_reference(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CloneWithReferenceRequest>,
) -> Result<Json<ApiResponse<CloneData>>, ApiError> {
    let result = state
        .clone_reference_handler
        .handle(CloneWithReference {
            reference_file: req.reference_file,
            text: req.text,
            language: req.language,
        })
        .await?;

    Ok(Json(clone_data(&state, result)))
}

fn clone_data(state: &AppState, result: CloneResponse) -> ApiResponse<CloneData> {
    let download_url = state.download_url(&result.output_file);

    ApiResponse::success(CloneData {
        profile_id: result.profile_id,
        output_file: result.output_file,
        download_url,
        language: result.language,
        duration_ms: result.duration_ms,
    })
    .with_message("Voice cloned successfully")
}

//! System Handlers
//!
//! 健康检查、语言列表与合成引擎状态

use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::SUPPORTED_LANGUAGES;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::state::AppState;

/// Ping 响应
#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Ping endpoint - 健康检查
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize)]
pub struct LanguagesData {
    pub languages: BTreeMap<&'static str, &'static str>,
}

/// 支持的合成语言 `{code: name}`
pub async fn list_languages() -> Json<ApiResponse<LanguagesData>> {
    let languages = SUPPORTED_LANGUAGES.iter().copied().collect();

    Json(ApiResponse::success(LanguagesData { languages }))
}

#[derive(Debug, Serialize)]
pub struct EngineStatusData {
    pub status: &'static str,
}

/// 合成引擎状态
pub async fn engine_status(State(state): State<Arc<AppState>>) -> Json<ApiResponse<EngineStatusData>> {
    let (status, message) = if state.tts_engine.health_check().await {
        ("ready", "Synthesis engine is ready")
    } else {
        tracing::warn!("Synthesis engine health check failed");
        ("unavailable", "Synthesis engine is not reachable")
    };

    Json(ApiResponse::success(EngineStatusData { status }).with_message(message))
}

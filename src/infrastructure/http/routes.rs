//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                          GET   健康检查
//! - /api/status                        GET   合成引擎状态
//! - /api/languages                     GET   支持的语言
//! - /api/upload                        POST  上传参考音频（multipart `file`）
//! - /api/profiles                      GET   列出所有档案
//! - /api/profiles/create               POST  创建档案
//! - /api/profiles/:id                  GET   获取档案详情
//! - /api/profiles/:id/add_sample       POST  附加样本
//! - /api/profiles/:id/remove_sample    POST  移除样本
//! - /api/profiles/:id/rename           POST  重命名档案
//! - /api/profiles/:id/delete           POST  删除档案
//! - /api/clone_with_profile            POST  使用档案合成语音
//! - /api/clone                         POST  使用上传的参考音频合成语音
//! - /api/files                         GET   列出上传文件与合成结果
//! - /download/:filename                GET   下载合成结果

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/download/:filename", get(handlers::download_output))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/status", get(handlers::engine_status))
        .route("/languages", get(handlers::list_languages))
        .route("/upload", post(handlers::upload_audio))
        .route("/clone_with_profile", post(handlers::clone_with_profile))
        .route("/clone", post(handlers::clone_with_reference))
        .route("/files", get(handlers::list_files))
        .nest("/profiles", profile_routes())
}

/// Profile 路由
fn profile_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::list_profiles))
        .route("/create", post(handlers::create_profile))
        .route("/:profile_id", get(handlers::get_profile))
        .route("/:profile_id/add_sample", post(handlers::add_sample))
        .route("/:profile_id/remove_sample", post(handlers::remove_sample))
        .route("/:profile_id/rename", post(handlers::rename_profile))
        .route("/:profile_id/delete", post(handlers::delete_profile))
}

//! Files Handler - 列出上传区与输出目录中的音频文件

use axum::{extract::State, Json};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use std::time::UNIX_EPOCH;
use tokio::fs;

use super::upload::allowed_extension;
use crate::infrastructure::http::dto::{ApiResponse, FileEntry, FilesData};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 上传的参考音频与合成结果，各自按修改时间从新到旧排列
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<FilesData>>, ApiError> {
    let uploads = scan_dir(&state.uploads_dir, |name| allowed_extension(name).is_some()).await?;

    let mut outputs = scan_dir(&state.outputs_dir, |name| {
        allowed_extension(name).as_deref() == Some("wav")
    })
    .await?;
    for entry in &mut outputs {
        entry.download_url = Some(state.download_url(&entry.name));
    }

    Ok(Json(ApiResponse::success(FilesData { uploads, outputs })))
}

/// 读取目录中的普通文件，目录不存在时视为空
async fn scan_dir<F>(dir: &Path, keep: F) -> Result<Vec<FileEntry>, ApiError>
where
    F: Fn(&str) -> bool,
{
    let mut read_dir = match fs::read_dir(dir).await {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(ApiError::Internal(format!(
                "Failed to list {}: {}",
                dir.display(),
                e
            )))
        }
    };

    let mut entries = Vec::new();
    while let Some(item) = read_dir
        .next_entry()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to list {}: {}", dir.display(), e)))?
    {
        let Ok(name) = item.file_name().into_string() else {
            continue;
        };
        if !keep(&name) {
            continue;
        }

        // 列举期间被删除的文件直接跳过
        let Ok(metadata) = item.metadata().await else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }

        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();

        entries.push(FileEntry {
            name,
            size: metadata.len(),
            modified,
            download_url: None,
        });
    }

    entries.sort_by(|a, b| {
        b.modified
            .total_cmp(&a.modified)
            .then_with(|| a.name.cmp(&b.name))
    });

    Ok(entries)
}

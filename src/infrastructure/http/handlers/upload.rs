//! Upload Handler - 参考音频上传到暂存区

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::infrastructure::http::dto::{ApiResponse, UploadData};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 允许上传的音频扩展名
pub const ALLOWED_EXTENSIONS: &[&str] = &["wav", "mp3", "ogg", "flac", "m4a"];

/// 上传参考音频，保存为 `reference_<unix 秒>.<ext>`
pub async fn upload_audio(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadData>>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let original = field.file_name().unwrap_or_default().to_string();
        if original.is_empty() {
            return Err(ApiError::BadRequest("No file selected".to_string()));
        }

        let ext = allowed_extension(&original).ok_or_else(|| {
            ApiError::BadRequest(
                "Invalid file type. Allowed: WAV, MP3, OGG, FLAC, M4A".to_string(),
            )
        })?;

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;

        upload = Some((ext, data.to_vec()));
        break;
    }

    let (ext, data) = upload.ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;

    fs::create_dir_all(&state.uploads_dir)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to create uploads directory: {}", e)))?;

    let (filename, path) = write_unique(&state.uploads_dir, &ext, &data).await?;

    tracing::info!(
        filename = %filename,
        size = data.len(),
        "Reference audio uploaded"
    );

    Ok(Json(
        ApiResponse::success(UploadData {
            filename,
            path: path.display().to_string(),
        })
        .with_message("File uploaded successfully"),
    ))
}

/// 提取并校验扩展名（小写）
pub(super) fn allowed_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())?
        .to_lowercase();

    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// 以 create_new 占位写入，同一秒内的重名追加 `_<n>`
async fn write_unique(dir: &Path, ext: &str, data: &[u8]) -> Result<(String, PathBuf), ApiError> {
    let timestamp = Utc::now().timestamp();

    for n in 1u32.. {
        let filename = if n == 1 {
            format!("reference_{}.{}", timestamp, ext)
        } else {
            format!("reference_{}_{}.{}", timestamp, n, ext)
        };
        let path = dir.join(&filename);

        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(ApiError::Internal(format!(
                    "Failed to save uploaded file: {}",
                    e
                )))
            }
        };

        fill_or_discard(&path, file, data).await?;

        return Ok((filename, path));
    }

    Err(ApiError::Internal("No free upload filename".to_string()))
}

/// 写入刚占位的文件，失败时删除残缺文件
async fn fill_or_discard<W>(path: &Path, mut writer: W, data: &[u8]) -> Result<(), ApiError>
where
    W: AsyncWrite + Unpin,
{
    let written = match writer.write_all(data).await {
        Ok(()) => writer.flush().await,
        Err(e) => Err(e),
    };
    drop(writer);

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(path).await {
            tracing::warn!(
                path = %path.display(),
                error = %cleanup,
                "Failed to remove partial upload"
            );
        }
        return Err(ApiError::Internal(format!(
            "Failed to save uploaded file: {}",
            e
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    /// 每次写入都失败的写端
    struct FullDisk;

    impl AsyncWrite for FullDisk {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::Other, "no space left")))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_failed_write_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reference_1700000000.wav");
        std::fs::write(&path, b"").unwrap();

        let err = fill_or_discard(&path, FullDisk, b"RIFF").await.unwrap_err();
        assert!(matches!(err, ApiError::Internal(ref m) if m.contains("no space left")));
        assert!(!path.exists());
    }

    #[test]
    fn test_allowed_extension() {
        assert_eq!(allowed_extension("voice.WAV").as_deref(), Some("wav"));
        assert_eq!(allowed_extension("clip.m4a").as_deref(), Some("m4a"));
        assert_eq!(allowed_extension("notes.txt"), None);
        assert_eq!(allowed_extension("noext"), None);
    }

    #[tokio::test]
    async fn test_write_unique_suffixes() {
        let dir = tempfile::tempdir().unwrap();

        let (first, _) = write_unique(dir.path(), "wav", b"a").await.unwrap();
        let (second, path) = write_unique(dir.path(), "wav", b"b").await.unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with("reference_"));
        assert_eq!(std::fs::read(path).unwrap(), b"b");
    }
}

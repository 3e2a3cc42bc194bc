//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::request_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 请求体上限（字节），作用于音频上传
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            max_body_bytes: 100 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 构建 Router
    fn build_router(&self) -> Router {
        // 允许所有来源的跨域请求
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
            .expose_headers(Any)
            .max_age(std::time::Duration::from_secs(3600));

        create_routes()
            .layer(DefaultBodyLimit::max(self.config.max_body_bytes))
            .layer(middleware::from_fn(request_logging_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let addr = self.config.addr();

        info!(
            addr = %addr,
            max_body_bytes = self.config.max_body_bytes,
            "Starting HTTP server (with graceful shutdown)"
        );

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ProfileManager;
    use crate::infrastructure::adapters::{FakeTtsClient, FsSampleStore, SystemClock};
    use crate::infrastructure::persistence::JsonProfileIndex;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::{tempdir, TempDir};
    use tower::util::ServiceExt;

    const BOUNDARY: &str = "voxfile-test-boundary";

    fn setup() -> (TempDir, Router) {
        let dir = tempdir().unwrap();
        let profiles_dir = dir.path().join("voice_profiles");

        let manager = Arc::new(ProfileManager::open(
            Arc::new(JsonProfileIndex::new(profiles_dir.join("profiles.json"))),
            Arc::new(FsSampleStore::new(&profiles_dir).unwrap()),
            dir.path().join("uploads"),
            Arc::new(SystemClock),
        ));
        let state = AppState::new(
            manager,
            Arc::new(FakeTtsClient::default()),
            dir.path().join("outputs"),
        );

        let router = HttpServer::new(ServerConfig::default(), state).build_router();
        (dir, router)
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_json(router: &Router, uri: &str) -> Value {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&body).unwrap()
    }

    async fn post_json(router: &Router, uri: &str, payload: Value) -> Value {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();
        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&body).unwrap()
    }

    async fn upload(router: &Router, filename: &str, data: &[u8]) -> Value {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                b = BOUNDARY,
                f = filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/upload")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_ping_and_languages() {
        let (_dir, router) = setup();

        let ping = get_json(&router, "/api/ping").await;
        assert_eq!(ping["status"], "ok");

        let languages = get_json(&router, "/api/languages").await;
        assert_eq!(languages["success"], true);
        assert_eq!(languages["languages"]["en"], "English");

        let status = get_json(&router, "/api/status").await;
        assert_eq!(status["status"], "ready");
    }

    #[tokio::test]
    async fn test_profile_lifecycle() {
        let (_dir, router) = setup();

        let created = post_json(&router, "/api/profiles/create", json!({"name": "Ada"})).await;
        assert_eq!(created["success"], true);
        assert_eq!(created["profile"]["name"], "Ada");
        assert_eq!(created["profile"]["sample_count"], 0);
        let id = created["profile"]["profile_id"].as_str().unwrap().to_string();

        let duplicate = post_json(&router, "/api/profiles/create", json!({"name": "Ada"})).await;
        assert_eq!(duplicate["success"], false);
        assert_eq!(duplicate["message"], "Profile with name 'Ada' already exists");

        let listed = get_json(&router, "/api/profiles").await;
        assert_eq!(listed["profiles"].as_array().unwrap().len(), 1);

        let renamed = post_json(
            &router,
            &format!("/api/profiles/{}/rename", id),
            json!({"name": "Grace"}),
        )
        .await;
        assert_eq!(renamed["success"], true);

        let fetched = get_json(&router, &format!("/api/profiles/{}", id)).await;
        assert_eq!(fetched["profile"]["name"], "Grace");

        let deleted = post_json(&router, &format!("/api/profiles/{}/delete", id), json!({})).await;
        assert_eq!(deleted["success"], true);

        let missing = get_json(&router, &format!("/api/profiles/{}", id)).await;
        assert_eq!(missing["success"], false);
    }

    #[tokio::test]
    async fn test_upload_sample_and_clone() {
        let (dir, router) = setup();

        let rejected = upload(&router, "notes.txt", b"text").await;
        assert_eq!(rejected["success"], false);

        let uploaded = upload(&router, "voice.wav", b"reference audio").await;
        assert_eq!(uploaded["success"], true);
        let filename = uploaded["filename"].as_str().unwrap().to_string();
        assert!(filename.starts_with("reference_"));
        assert!(dir.path().join("uploads").join(&filename).exists());

        let created = post_json(&router, "/api/profiles/create", json!({"name": "Ada"})).await;
        let id = created["profile"]["profile_id"].as_str().unwrap().to_string();

        let added = post_json(
            &router,
            &format!("/api/profiles/{}/add_sample", id),
            json!({"audio_file": filename}),
        )
        .await;
        assert_eq!(added["success"], true);
        assert_eq!(added["profile"]["samples"], json!([filename]));

        let cloned = post_json(
            &router,
            "/api/clone_with_profile",
            json!({"profile_id": id, "text": "Hello", "language": "en"}),
        )
        .await;
        assert_eq!(cloned["success"], true);
        let download_url = cloned["download_url"].as_str().unwrap().to_string();
        assert!(download_url.starts_with("/download/cloned_"));

        let request = Request::builder()
            .uri(&download_url)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"reference audio");

        let removed = post_json(
            &router,
            &format!("/api/profiles/{}/remove_sample", id),
            json!({"audio_file": filename}),
        )
        .await;
        assert_eq!(removed["success"], true);

        let removed_again = post_json(
            &router,
            &format!("/api/profiles/{}/remove_sample", id),
            json!({"audio_file": filename}),
        )
        .await;
        assert_eq!(removed_again["success"], false);
    }

    #[tokio::test]
    async fn test_download_unknown_file_is_404() {
        let (_dir, router) = setup();

        let request = Request::builder()
            .uri("/download/missing.wav")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&router, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_clone_with_reference_file() {
        let (dir, router) = setup();

        let missing = post_json(
            &router,
            "/api/clone",
            json!({"reference_file": "nope.wav", "text": "Hello"}),
        )
        .await;
        assert_eq!(missing["success"], false);
        assert_eq!(missing["message"], "Reference file not found");

        let no_text = post_json(
            &router,
            "/api/clone",
            json!({"reference_file": "nope.wav", "text": ""}),
        )
        .await;
        assert_eq!(no_text["message"], "No text provided");

        let uploaded = upload(&router, "voice.wav", b"reference audio").await;
        let filename = uploaded["filename"].as_str().unwrap().to_string();

        let cloned = post_json(
            &router,
            "/api/clone",
            json!({"reference_file": filename, "text": "Hola", "language": "es"}),
        )
        .await;
        assert_eq!(cloned["success"], true);
        assert_eq!(cloned["message"], "Voice cloned successfully");
        assert_eq!(cloned["language"], "es");
        assert!(cloned.get("profile_id").is_none());

        let output_file = cloned["output_file"].as_str().unwrap();
        assert_eq!(
            cloned["download_url"],
            format!("/download/{}", output_file)
        );
        assert_eq!(
            std::fs::read(dir.path().join("outputs").join(output_file)).unwrap(),
            b"reference audio"
        );
    }

    #[tokio::test]
    async fn test_list_files() {
        let (_dir, router) = setup();

        let empty = get_json(&router, "/api/files").await;
        assert_eq!(empty["success"], true);
        assert_eq!(empty["uploads"], json!([]));
        assert_eq!(empty["outputs"], json!([]));

        let uploaded = upload(&router, "voice.wav", b"reference audio").await;
        let filename = uploaded["filename"].as_str().unwrap().to_string();
        let cloned = post_json(
            &router,
            "/api/clone",
            json!({"reference_file": filename, "text": "Hello"}),
        )
        .await;
        let output_file = cloned["output_file"].as_str().unwrap().to_string();

        let files = get_json(&router, "/api/files").await;
        let uploads = files["uploads"].as_array().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0]["name"], filename);
        assert_eq!(uploads[0]["size"], 15);
        assert!(uploads[0]["modified"].as_f64().unwrap() > 0.0);
        assert!(uploads[0].get("download_url").is_none());

        let outputs = files["outputs"].as_array().unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0]["name"], output_file);
        assert_eq!(
            outputs[0]["download_url"],
            format!("/download/{}", output_file)
        );
    }
}

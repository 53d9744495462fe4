//! Common test utilities for in-process API testing.
//!
//! The fixture builds a real library over a temporary video directory,
//! with an in-memory backup store so tests can observe writes.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use tagr_core::testing::MemoryBackupStore;
use tagr_core::{
    Catalog, Config, FsScanner, HealthState, LibraryConfig, LibraryService, Persistence,
    ServerConfig,
};

/// Re-export fixtures for test convenience
pub use tagr_core::testing::fixtures;

pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// The shared catalog behind the router
    pub catalog: Arc<Catalog>,
    /// In-memory backup artifact
    pub store: Arc<MemoryBackupStore>,
    pub persistence: Arc<Persistence>,
    /// Temporary directory holding the video dir
    pub temp_dir: TempDir,
    pub video_dir: PathBuf,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Fixture with `a.mp4` and `b.mp4` on disk and no prior backup.
    pub async fn new() -> Self {
        Self::with_files(&["a.mp4", "b.mp4"]).await
    }

    pub async fn with_files(files: &[&str]) -> Self {
        let store = Arc::new(MemoryBackupStore::new());
        Self::build(files, store)
    }

    /// Fixture whose backup store already holds `contents`.
    pub async fn with_backup(files: &[&str], contents: Vec<u8>) -> Self {
        let store = Arc::new(MemoryBackupStore::new());
        store.set_contents(contents);
        Self::build(files, store)
    }

    fn build(files: &[&str], store: Arc<MemoryBackupStore>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let video_dir = temp_dir.path().join("video");
        std::fs::create_dir_all(&video_dir).expect("Failed to create video dir");
        for file in files {
            std::fs::write(video_dir.join(file), b"fake video").expect("Failed to write file");
        }

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 8080,
            },
            library: LibraryConfig {
                video_dir: video_dir.clone(),
                backup_path: temp_dir.path().join("tagr.json"),
                static_dir: temp_dir.path().join("static"),
                ..Default::default()
            },
        };

        let scanner = Arc::new(FsScanner::new(&video_dir).expect("Failed to create scanner"));
        let persistence = Arc::new(Persistence::new(
            store.clone(),
            Arc::new(HealthState::new()),
        ));
        let library = LibraryService::open(Arc::clone(&persistence), scanner)
            .expect("Failed to open library");
        let catalog = Arc::clone(library.catalog());

        let state = Arc::new(tagr_server::state::AppState::new(config, library));
        let router = tagr_server::api::create_router(state);

        Self {
            router,
            catalog,
            store,
            persistence,
            temp_dir,
            video_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a request with a raw body and explicit content type.
    pub async fn send_raw(
        &self,
        method: &str,
        path: &str,
        body: &str,
        content_type: &str,
    ) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}

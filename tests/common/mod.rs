//! Shared helpers for router integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, header::CONTENT_TYPE},
    response::Response,
};
use song_catalog::{
    AppState, build_router,
    config::AppConfig,
    db::SongStore,
    error::StoreError,
    models::song::{Song, SongFields, SongId},
    views::HtmlViews,
};
use tempfile::TempDir;

/// In-memory stand-in for the `songs` table.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Song>>,
    next_id: Mutex<SongId>,
}

impl MemoryStore {
    pub fn rows(&self) -> Vec<Song> {
        self.rows.lock().unwrap().clone()
    }

    pub fn find(&self, id: SongId) -> Option<Song> {
        self.rows().into_iter().find(|s| s.id == id)
    }
}

#[async_trait]
impl SongStore for MemoryStore {
    async fn list_songs(&self) -> Result<Vec<Song>, StoreError> {
        Ok(self.rows())
    }

    async fn get_song(&self, id: SongId) -> Result<Option<Song>, StoreError> {
        Ok(self.find(id))
    }

    async fn insert_song(&self, fields: SongFields) -> Result<SongId, StoreError> {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let id = *next_id;
        self.rows.lock().unwrap().push(fields.into_song(id));
        Ok(id)
    }

    async fn update_song(&self, id: SongId, fields: SongFields) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|s| s.id == id) {
            *row = fields.into_song(id);
        }
        Ok(())
    }

    async fn delete_song(&self, id: SongId) -> Result<(), StoreError> {
        self.rows.lock().unwrap().retain(|s| s.id != id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Store whose every call fails, like a dropped database connection.
pub struct FailingStore;

fn down() -> StoreError {
    StoreError::Other("connection refused".to_string())
}

#[async_trait]
impl SongStore for FailingStore {
    async fn list_songs(&self) -> Result<Vec<Song>, StoreError> {
        Err(down())
    }

    async fn get_song(&self, _id: SongId) -> Result<Option<Song>, StoreError> {
        Err(down())
    }

    async fn insert_song(&self, _fields: SongFields) -> Result<SongId, StoreError> {
        Err(down())
    }

    async fn update_song(&self, _id: SongId, _fields: SongFields) -> Result<(), StoreError> {
        Err(down())
    }

    async fn delete_song(&self, _id: SongId) -> Result<(), StoreError> {
        Err(down())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(down())
    }
}

/// A router over `store` with a throwaway public root.
pub struct TestApp {
    pub router: Router,
    pub public_dir: TempDir,
}

pub async fn setup_app(store: Arc<dyn SongStore>) -> TestApp {
    setup_app_with(store, &[]).await
}

pub async fn setup_app_with(store: Arc<dyn SongStore>, vars: &[(&str, &str)]) -> TestApp {
    let public_dir = tempfile::tempdir().expect("Should create temp dir");
    let public_path = public_dir.path().to_string_lossy().to_string();
    let vars: Vec<(String, String)> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let config = AppConfig::from_lookup(|key| {
        if key == "PUBLIC_DIR" {
            return Some(public_path.clone());
        }
        vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    });

    let state = AppState::new(store, Arc::new(HtmlViews), &config);
    state.uploads.ensure_dir().await.expect("Should create upload dir");

    TestApp {
        router: build_router(state, &config),
        public_dir,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

/// Hand-built `multipart/form-data` body.
pub struct MultipartForm {
    boundary: &'static str,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: "----song-catalog-test-boundary",
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                self.boundary, name, filename
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", self.boundary),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).expect("Body should be UTF-8")
}

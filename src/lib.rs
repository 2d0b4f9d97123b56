//! Song catalog: a small server-rendered CRUD app over a PostgreSQL `songs` table.

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod models;
pub mod routers;
pub mod upload;
pub mod views;

use config::AppConfig;
use controllers::SongController;
use db::SongStore;
use routers::{
    add_song_form_route, add_song_route, delete_song_route, edit_song_form_route, edit_song_route,
    health_check_route, list_songs_route, show_song_route,
};
use upload::ImageUploader;
use views::ViewRenderer;

/// Dependencies shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub songs: Arc<SongController>,
    pub uploads: Arc<ImageUploader>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn SongStore>,
        views: Arc<dyn ViewRenderer>,
        config: &AppConfig,
    ) -> Self {
        AppState {
            songs: Arc::new(SongController::new(store, views)),
            uploads: Arc::new(ImageUploader::new(config.upload_dir(), config.image_naming)),
        }
    }
}

pub fn build_router(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .route("/", get(list_songs_route))
        .route("/health", get(health_check_route))
        .route("/song/{id}", get(show_song_route))
        .route("/addSong", get(add_song_form_route).post(add_song_route))
        .route("/editSong/{id}", get(edit_song_form_route).post(edit_song_route))
        .route("/deleteSong/{id}", get(delete_song_route).post(delete_song_route))
        // Anything else is a file under the public root, uploaded images included
        .fallback_service(ServeDir::new(&config.public_dir))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::AppState;
use crate::upload::SongSubmission;

pub async fn list_songs_route(State(state): State<AppState>) -> Response {
    state.songs.list().await.into_response()
}

pub async fn show_song_route(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    state.songs.show(&id).await.into_response()
}

pub async fn add_song_form_route(State(state): State<AppState>) -> Response {
    state.songs.add_form()
}

pub async fn add_song_route(State(state): State<AppState>, submission: SongSubmission) -> Response {
    state.songs.create(submission).await.into_response()
}

pub async fn edit_song_form_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    state.songs.edit_form(&id).await.into_response()
}

pub async fn edit_song_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
    submission: SongSubmission,
) -> Response {
    state.songs.update(&id, submission).await.into_response()
}

pub async fn delete_song_route(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    state.songs.delete(&id).await.into_response()
}

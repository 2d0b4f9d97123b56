use std::sync::Arc;

use axum::response::{Html, IntoResponse, Redirect, Response};
use tracing::info;

use crate::{
    db::SongStore,
    error::AppError,
    models::song::parse_song_id,
    upload::SongSubmission,
    views::{View, ViewRenderer},
};

pub struct SongController {
    store: Arc<dyn SongStore>,
    views: Arc<dyn ViewRenderer>,
}

impl SongController {
    pub fn new(store: Arc<dyn SongStore>, views: Arc<dyn ViewRenderer>) -> Self {
        SongController { store, views }
    }

    pub fn store(&self) -> &dyn SongStore {
        self.store.as_ref()
    }

    fn render(&self, view: View<'_>) -> Response {
        Html(self.views.render(view)).into_response()
    }

    pub async fn list(&self) -> Result<Response, AppError> {
        let songs = self
            .store
            .list_songs()
            .await
            .map_err(AppError::store("Error retrieving songs"))?;
        Ok(self.render(View::Index { songs: &songs }))
    }

    /// A missing song still renders the detail page, in its not-found state.
    pub async fn show(&self, raw_id: &str) -> Result<Response, AppError> {
        let song = match parse_song_id(raw_id) {
            Some(id) => self
                .store
                .get_song(id)
                .await
                .map_err(AppError::store("Error retrieving song by ID"))?,
            None => None,
        };
        Ok(self.render(View::Song { song: song.as_ref() }))
    }

    pub fn add_form(&self) -> Response {
        self.render(View::AddSong)
    }

    pub async fn create(&self, submission: SongSubmission) -> Result<Response, AppError> {
        let id = self
            .store
            .insert_song(submission.into_new_fields())
            .await
            .map_err(AppError::store("Error adding song"))?;
        info!("Added song {}", id);
        Ok(Redirect::to("/").into_response())
    }

    /// Unlike [`SongController::show`], a missing song is a hard 404 here.
    pub async fn edit_form(&self, raw_id: &str) -> Result<Response, AppError> {
        let Some(id) = parse_song_id(raw_id) else {
            return Err(AppError::NotFound("Song not found"));
        };
        match self
            .store
            .get_song(id)
            .await
            .map_err(AppError::store("Error retrieving song for editing"))?
        {
            Some(song) => Ok(self.render(View::EditSong { song: &song })),
            None => Err(AppError::NotFound("Song not found")),
        }
    }

    pub async fn update(
        &self,
        raw_id: &str,
        submission: SongSubmission,
    ) -> Result<Response, AppError> {
        let fields = submission.into_edit_fields();
        if let Some(id) = parse_song_id(raw_id) {
            self.store
                .update_song(id, fields)
                .await
                .map_err(AppError::store("Error updating song"))?;
            info!("Updated song {}", id);
        }
        Ok(Redirect::to("/").into_response())
    }

    pub async fn delete(&self, raw_id: &str) -> Result<Response, AppError> {
        if let Some(id) = parse_song_id(raw_id) {
            self.store
                .delete_song(id)
                .await
                .map_err(AppError::store("Error deleting song"))?;
            info!("Deleted song {}", id);
        }
        Ok(Redirect::to("/").into_response())
    }
}

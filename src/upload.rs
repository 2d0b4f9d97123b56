//! Song image uploads.
//!
//! The add and edit forms post either `multipart/form-data` (with an optional
//! `image` file) or `application/x-www-form-urlencoded`. Files are written to
//! the public images directory before the handler touches the database, so the
//! stored filename is final by the time the row is written.

use std::io;
use std::path::{Path, PathBuf};

use axum::{
    Form,
    extract::{
        FromRequest, Multipart, Request,
        multipart::{Field, MultipartError},
    },
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::AppState;
use crate::error::AppError;
use crate::models::song::{SongFields, SongForm};

/// Multipart field carrying the song image.
pub const IMAGE_FIELD: &str = "image";

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),
}

/// How an uploaded file is named on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageNaming {
    /// The client's filename, overwriting any file already there.
    #[default]
    Original,
    /// A random v4 uuid plus the client's extension.
    Unique,
}

#[derive(Debug, Clone)]
pub struct ImageUploader {
    dir: PathBuf,
    naming: ImageNaming,
}

impl ImageUploader {
    pub fn new(dir: impl Into<PathBuf>, naming: ImageNaming) -> Self {
        Self {
            dir: dir.into(),
            naming,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Name the file is stored under, or `None` when the client sent no file.
    pub fn stored_name(&self, original: &str) -> Option<String> {
        // Browsers may send a full client path; only the last component counts.
        let base = original.rsplit(['/', '\\']).next().unwrap_or_default();
        if base.is_empty() || base == "." || base == ".." {
            return None;
        }
        match self.naming {
            ImageNaming::Original => Some(base.to_string()),
            ImageNaming::Unique => match Path::new(base).extension().and_then(|e| e.to_str()) {
                Some(ext) => Some(format!("{}.{}", Uuid::new_v4(), ext)),
                None => Some(Uuid::new_v4().to_string()),
            },
        }
    }

    /// Streams a multipart file field to disk and returns the stored filename.
    pub async fn save_field(&self, mut field: Field<'_>) -> Result<Option<String>, UploadError> {
        let Some(stored) = field.file_name().and_then(|name| self.stored_name(name)) else {
            return Ok(None);
        };
        let path = self.dir.join(&stored);

        let mut file = File::create(&path).await?;
        let written = match write_field(&mut field, &mut file).await {
            Ok(written) => written,
            Err(e) => {
                drop(file);
                if let Err(rm) = tokio::fs::remove_file(&path).await {
                    warn!("Could not remove partial upload {}: {}", path.display(), rm);
                }
                return Err(e);
            }
        };

        debug!("Stored image {} ({} bytes)", path.display(), written);
        Ok(Some(stored))
    }
}

async fn write_field(field: &mut Field<'_>, file: &mut File) -> Result<usize, UploadError> {
    let mut written = 0;
    while let Some(chunk) = field.chunk().await? {
        written += chunk.len();
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(written)
}

/// Body of the add/edit song forms, with the image already on disk.
#[derive(Debug, Clone, Default)]
pub struct SongSubmission {
    pub form: SongForm,
    /// Stored filename of the uploaded image, if one was sent.
    pub image: Option<String>,
}

impl SongSubmission {
    /// Fields for a new song: the upload or nothing.
    pub fn into_new_fields(self) -> SongFields {
        let image = self.image;
        Self::fields(self.form, image)
    }

    /// Fields for an edit: the upload, else the form's `currentImage`.
    pub fn into_edit_fields(self) -> SongFields {
        let image = self.image.or_else(|| self.form.current_image.clone());
        Self::fields(self.form, image)
    }

    fn fields(form: SongForm, image: Option<String>) -> SongFields {
        SongFields {
            name: form.name,
            artist: form.artist,
            album: form.album,
            lyrics: form.lyrics,
            meaning: form.meaning,
            image,
        }
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

impl FromRequest<AppState> for SongSubmission {
    type Rejection = Response;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let Form(form) = Form::<SongForm>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(SongSubmission { form, image: None });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let mut submission = SongSubmission::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(IntoResponse::into_response)?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == IMAGE_FIELD {
                if submission.image.is_some() {
                    warn!("Ignoring extra image field");
                    continue;
                }
                submission.image = state
                    .uploads
                    .save_field(field)
                    .await
                    .map_err(|e| AppError::from(e).into_response())?;
                continue;
            }

            let slot = match name.as_str() {
                "name" => &mut submission.form.name,
                "artist" => &mut submission.form.artist,
                "album" => &mut submission.form.album,
                "lyrics" => &mut submission.form.lyrics,
                "meaning" => &mut submission.form.meaning,
                "currentImage" => &mut submission.form.current_image,
                _ => continue,
            };
            *slot = Some(field.text().await.map_err(IntoResponse::into_response)?);
        }

        Ok(submission)
    }
}

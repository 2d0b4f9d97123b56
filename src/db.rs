use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::debug;

use crate::config::DbSettings;
use crate::error::StoreError;
use crate::models::song::{Song, SongFields, SongId};

/// Data access for the `songs` table.
#[async_trait]
pub trait SongStore: Send + Sync {
    async fn list_songs(&self) -> Result<Vec<Song>, StoreError>;

    async fn get_song(&self, id: SongId) -> Result<Option<Song>, StoreError>;

    /// Inserts a song and returns the id the store assigned.
    async fn insert_song(&self, fields: SongFields) -> Result<SongId, StoreError>;

    /// Rewrites every mutable column. Succeeds silently when no row matches.
    async fn update_song(&self, id: SongId, fields: SongFields) -> Result<(), StoreError>;

    /// Succeeds silently when no row matches.
    async fn delete_song(&self, id: SongId) -> Result<(), StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Builds the pool without opening a connection, so a database that is
    /// down at startup only fails the first queries.
    pub fn connect_lazy(settings: &DbSettings) -> Result<Self, StoreError> {
        let database_url = settings.database_url();
        debug!("Connecting to {}:{}/{}", settings.host, settings.port, settings.name);

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect_lazy(&database_url)?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SongStore for Database {
    async fn list_songs(&self) -> Result<Vec<Song>, StoreError> {
        let songs = sqlx::query_as::<_, Song>(
            "SELECT songid, name, artist, album, lyrics, meaning, image FROM songs",
        )
        .fetch_all(&self.pool)
        .await?;
        debug!("Listed {} songs", songs.len());
        Ok(songs)
    }

    async fn get_song(&self, id: SongId) -> Result<Option<Song>, StoreError> {
        let song = sqlx::query_as::<_, Song>(
            "SELECT songid, name, artist, album, lyrics, meaning, image FROM songs WHERE songid = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(song)
    }

    async fn insert_song(&self, fields: SongFields) -> Result<SongId, StoreError> {
        let id: SongId = sqlx::query_scalar(
            "INSERT INTO songs (name, artist, album, lyrics, meaning, image)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING songid",
        )
        .bind(fields.name)
        .bind(fields.artist)
        .bind(fields.album)
        .bind(fields.lyrics)
        .bind(fields.meaning)
        .bind(fields.image)
        .fetch_one(&self.pool)
        .await?;
        debug!("Inserted song {}", id);
        Ok(id)
    }

    async fn update_song(&self, id: SongId, fields: SongFields) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE songs SET name = $1, artist = $2, album = $3, lyrics = $4, meaning = $5, image = $6
             WHERE songid = $7",
        )
        .bind(fields.name)
        .bind(fields.artist)
        .bind(fields.album)
        .bind(fields.lyrics)
        .bind(fields.meaning)
        .bind(fields.image)
        .bind(id)
        .execute(&self.pool)
        .await?;
        debug!("Updated song {} ({} rows)", id, result.rows_affected());
        Ok(())
    }

    async fn delete_song(&self, id: SongId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM songs WHERE songid = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        debug!("Deleted song {} ({} rows)", id, result.rows_affected());
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

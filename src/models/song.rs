use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type SongId = i32;

/// A row of the `songs` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Song {
    #[sqlx(rename = "songid")]
    pub id: SongId,
    pub name: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub lyrics: Option<String>,
    pub meaning: Option<String>,
    pub image: Option<String>, // filename under the public images dir
}

/// Every mutable column of a song. Written wholesale on insert and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongFields {
    pub name: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub lyrics: Option<String>,
    pub meaning: Option<String>,
    pub image: Option<String>,
}

impl SongFields {
    pub fn into_song(self, id: SongId) -> Song {
        Song {
            id,
            name: self.name,
            artist: self.artist,
            album: self.album,
            lyrics: self.lyrics,
            meaning: self.meaning,
            image: self.image,
        }
    }
}

/// Text fields of the add/edit forms, as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongForm {
    pub name: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub lyrics: Option<String>,
    pub meaning: Option<String>,
    #[serde(rename = "currentImage")]
    pub current_image: Option<String>,
}

/// Parses a `{id}` path segment. Anything that is not an integer matches no song.
pub fn parse_song_id(raw: &str) -> Option<SongId> {
    raw.trim().parse().ok()
}

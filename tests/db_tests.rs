//! PostgreSQL tests for the `songs` table.
//!
//! These need a live database and run only when TEST_DATABASE_URL is set, e.g.
//! `TEST_DATABASE_URL=postgres://postgres@localhost/song_catalog_test`.

use song_catalog::{
    db::{Database, SongStore},
    models::song::SongFields,
};
use sqlx::postgres::PgPoolOptions;

async fn setup_test_db() -> Option<Database> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("Skipping test: TEST_DATABASE_URL not set");
        return None;
    };
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Should connect to test database");
    let database = Database::from_pool(pool);
    database.migrate().await.expect("Should run migrations");
    Some(database)
}

#[tokio::test]
async fn test_song_lifecycle() {
    let Some(db) = setup_test_db().await else {
        return;
    };

    let lyrics = "line\n".repeat(10_000);
    let fields = SongFields {
        name: Some(String::new()),
        artist: Some("O'Brien & \"Sons\"".to_string()),
        album: None,
        lyrics: Some(lyrics.clone()),
        meaning: Some("M".to_string()),
        image: None,
    };
    let id = db.insert_song(fields.clone()).await.unwrap();

    let song = db.get_song(id).await.unwrap().expect("Inserted song should exist");
    assert_eq!(song, fields.clone().into_song(id));
    assert!(db.list_songs().await.unwrap().iter().any(|s| s.id == id));

    let updated = SongFields {
        image: Some("cover.jpg".to_string()),
        ..fields
    };
    db.update_song(id, updated.clone()).await.unwrap();
    assert_eq!(db.get_song(id).await.unwrap(), Some(updated.into_song(id)));

    db.delete_song(id).await.unwrap();
    assert_eq!(db.get_song(id).await.unwrap(), None);

    // Missing rows are not errors
    db.update_song(id, SongFields::default()).await.unwrap();
    db.delete_song(id).await.unwrap();
}

#[tokio::test]
async fn test_ping() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    db.ping().await.unwrap();
}

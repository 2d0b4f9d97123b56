use axum::Json;
use serde::Serialize;
use tracing::warn;

use crate::db::SongStore;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
}

pub struct RootController;

impl RootController {
    pub async fn health_check(store: &dyn SongStore) -> Json<HealthResponse> {
        let database = match store.ping().await {
            Ok(()) => "up",
            Err(e) => {
                warn!("Health check could not reach the database: {}", e);
                "down"
            }
        };
        Json(HealthResponse {
            status: "ok",
            database,
            version: env!("CARGO_PKG_VERSION"),
        })
    }
}

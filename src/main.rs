use std::sync::Arc;

use anyhow::Context;
use tracing::{Level, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use song_catalog::{
    AppState, build_router,
    config::AppConfig,
    db::{Database, SongStore},
    views::HtmlViews,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_target(false)
        .init();

    let config = AppConfig::from_env();

    // A bad or unreachable database is logged, the server still starts
    let database = Database::connect_lazy(&config.db).context("Invalid database configuration")?;
    match database.ping().await {
        Ok(()) => {
            info!("📊 Connected to database {}", config.db.name);
            match database.migrate().await {
                Ok(()) => info!("📊 Database migrations completed"),
                Err(e) => error!("❌ Failed to run database migrations: {}", e),
            }
        }
        Err(e) => error!("❌ Failed to connect to database: {}", e),
    }

    let state = AppState::new(Arc::new(database), Arc::new(HtmlViews), &config);
    if let Err(e) = state.uploads.ensure_dir().await {
        warn!("Could not create upload dir {}: {}", state.uploads.dir().display(), e);
    }

    let app = build_router(state, &config);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;

    info!("🎵 Server started at http://localhost:{}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}

// configuration
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::upload::ImageNaming;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PUBLIC_DIR: &str = "public";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Dev,
    Prod,
}

/// Connection parameters for the songs database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    /// How long a query waits for a connection before failing.
    pub acquire_timeout: Duration,
    /// Full connection string, wins over the individual parameters when set.
    pub url: Option<String>,
}

impl DbSettings {
    pub fn database_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                urlencoding::encode(&self.user),
                urlencoding::encode(&self.password),
                self.host,
                self.port,
                self.name
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub public_dir: PathBuf,
    pub image_naming: ImageNaming,
    pub max_upload_bytes: usize,
    pub db: DbSettings,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let mode = match get("MODE") {
            Some(mode) if mode.to_lowercase() == "prod" => Mode::Prod,
            _ => Mode::Dev,
        };

        let max_connections = parse_or(
            get("DB_MAX_CONNECTIONS"),
            "DB_MAX_CONNECTIONS",
            DEFAULT_MAX_CONNECTIONS,
        );
        let acquire_timeout = Duration::from_secs(parse_or(
            get("DB_ACQUIRE_TIMEOUT_SECS"),
            "DB_ACQUIRE_TIMEOUT_SECS",
            DEFAULT_ACQUIRE_TIMEOUT_SECS,
        ));
        let db = match mode {
            Mode::Dev => DbSettings {
                host: "localhost".to_string(),
                port: 5432,
                user: "postgres".to_string(),
                password: String::new(),
                name: "song_catalog".to_string(),
                max_connections,
                acquire_timeout,
                url: get("DATABASE_URL"),
            },
            Mode::Prod => DbSettings {
                host: get("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
                port: parse_or(get("DB_PORT"), "DB_PORT", 5432),
                user: get("DB_USER").unwrap_or_default(),
                password: lookup("DB_PASSWORD").unwrap_or_default(),
                name: get("DB_NAME").unwrap_or_default(),
                max_connections,
                acquire_timeout,
                url: get("DATABASE_URL"),
            },
        };

        let image_naming = match get("IMAGE_NAMING").as_deref() {
            Some("unique") => ImageNaming::Unique,
            Some("original") | None => ImageNaming::Original,
            Some(other) => {
                warn!("Unknown IMAGE_NAMING value {:?}, keeping original names", other);
                ImageNaming::Original
            }
        };

        let config = AppConfig {
            port: parse_or(get("PORT"), "PORT", DEFAULT_PORT),
            public_dir: get("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR)),
            image_naming,
            max_upload_bytes: parse_or(
                get("MAX_UPLOAD_BYTES"),
                "MAX_UPLOAD_BYTES",
                DEFAULT_MAX_UPLOAD_BYTES,
            ),
            db,
        };

        // Log which keys came from the environment (NOT their values!)
        let configured: Vec<&str> = [
            "MODE",
            "PORT",
            "PUBLIC_DIR",
            "IMAGE_NAMING",
            "MAX_UPLOAD_BYTES",
            "DATABASE_URL",
            "DB_HOST",
            "DB_PORT",
            "DB_USER",
            "DB_PASSWORD",
            "DB_NAME",
            "DB_MAX_CONNECTIONS",
            "DB_ACQUIRE_TIMEOUT_SECS",
        ]
        .into_iter()
        .filter(|&key| get(key).is_some())
        .collect();
        info!("Config keys set ({:?} mode): {:?}", mode, configured);

        config
    }

    /// Directory uploaded song images are written to.
    pub fn upload_dir(&self) -> PathBuf {
        self.public_dir.join("images")
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> T {
    match value {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid {} value {:?}, using default", key, raw);
            default
        }),
        None => default,
    }
}

use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use youtube::PrivacyStatus;

pub const DEFAULT_YOUTUBE_SCOPE: &str = "https://www.googleapis.com/auth/youtube.upload";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub youtube: YoutubeConfig,
}

/// Settings for the Shorts uploader
#[derive(Debug, Clone)]
pub struct YoutubeConfig {
    pub client_secrets_file: PathBuf,
    pub scopes: Vec<String>,
    pub privacy_status: PrivacyStatus,
    pub category_id: String,
    pub redirect_uri: String,
    /// Bytes per resumable chunk; `None` uploads in a single request
    pub upload_chunk_size: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => database_url_from_parts(&lookup)?,
        };

        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse()
            .context("PORT must be a valid number")?;

        let scopes = lookup("YOUTUBE_OAUTH_SCOPES")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|scopes| !scopes.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_YOUTUBE_SCOPE.to_string()]);

        let privacy_status = lookup("YOUTUBE_PRIVACY_STATUS")
            .unwrap_or_else(|| "private".to_string())
            .parse::<PrivacyStatus>()
            .context("YOUTUBE_PRIVACY_STATUS must be one of private, unlisted, public")?;

        let upload_chunk_size = lookup("YOUTUBE_UPLOAD_CHUNK_SIZE")
            .map(|raw| raw.parse::<u64>())
            .transpose()
            .context("YOUTUBE_UPLOAD_CHUNK_SIZE must be a byte count")?;

        Ok(Self {
            database_url,
            port,
            youtube: YoutubeConfig {
                client_secrets_file: lookup("YOUTUBE_CLIENT_SECRETS_FILE")
                    .unwrap_or_else(|| "client_secret.json".to_string())
                    .into(),
                scopes,
                privacy_status,
                category_id: lookup("YOUTUBE_CATEGORY_ID").unwrap_or_else(|| "22".to_string()),
                redirect_uri: lookup("YOUTUBE_REDIRECT_URI").unwrap_or_else(|| {
                    format!("http://localhost:{}/uploads/auth/youtube/callback", port)
                }),
                upload_chunk_size,
            },
        })
    }
}

fn database_url_from_parts<F>(lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let host = lookup("DB_HOST").context("DATABASE_URL or DB_HOST must be set")?;
    let port: u16 = lookup("DB_PORT")
        .unwrap_or_else(|| "5432".to_string())
        .parse()
        .context("DB_PORT must be a valid number")?;
    let name = lookup("DB_NAME").context("DB_NAME must be set")?;
    let user = lookup("DB_USER").context("DB_USER must be set")?;
    let password = lookup("DB_PASSWORD").unwrap_or_default();

    Ok(format!(
        "postgres://{}:{}@{}:{}/{}",
        user, password, host, port, name
    ))
}

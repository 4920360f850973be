//! Minimal YouTube Data API v3 client
//!
//! Just enough of the API to publish Shorts from a server: OAuth2 credential
//! handling (code exchange and refresh) and resumable `videos.insert`
//! uploads. No server or storage concerns live here.
//!
//! # Example
//!
//! ```rust,ignore
//! use youtube::{Credentials, YoutubeClient, VideoInsert};
//!
//! let client = YoutubeClient::new()?;
//! let video = client
//!     .insert_video(&credentials, &body, Path::new("/videos/clip.mp4"), None)
//!     .await?;
//! println!("{}", video.watch_url());
//! ```

pub mod credentials;
pub mod error;
pub mod models;
pub mod oauth;
mod videos;

pub use credentials::{ClientSecrets, Credentials};
pub use error::{Result, YoutubeError};
pub use models::{PrivacyStatus, Snippet, Video, VideoInsert, VideoStatus};
pub use oauth::OAuthClient;
pub use videos::RESUMABLE_CHUNK_ALIGNMENT;

use reqwest::Client;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

/// YouTube Data API client.
#[derive(Debug, Clone)]
pub struct YoutubeClient {
    http_client: Client,
    base_url: String,
}

impl YoutubeClient {
    /// Build a client that never follows redirects.
    ///
    /// A `308` from an upload session means "resume incomplete", so a client
    /// that follows redirects cannot drive the resumable protocol.
    pub fn new() -> Result<Self> {
        let http_client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| YoutubeError::Config(format!("Cannot build HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different host (tests, proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

//! Server dependencies (using traits for testability)
//!
//! This module provides the central dependency container used by the HTTP
//! handlers and background uploads. External services sit behind traits so
//! tests can swap them out.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use youtube::{Credentials, OAuthClient, Video, VideoInsert, YoutubeClient, YoutubeError};

use crate::domains::uploads::{OAuthStateStore, ShortsUploader, UploaderSettings};
use crate::kernel::{BaseCredentialStore, BaseVideoPlatform};

// =============================================================================
// YoutubeClient Adapter (implements BaseVideoPlatform trait)
// =============================================================================

/// Wrapper around the YouTube client crate that implements BaseVideoPlatform.
///
/// `oauth` is `None` when no client secrets were configured; every OAuth
/// grant then fails with a configuration error while uploads with already
/// valid credentials still work.
pub struct YoutubeAdapter {
    client: YoutubeClient,
    oauth: Option<OAuthClient>,
    chunk_size: Option<u64>,
}

impl YoutubeAdapter {
    pub fn new(client: YoutubeClient, oauth: Option<OAuthClient>, chunk_size: Option<u64>) -> Self {
        Self {
            client,
            oauth,
            chunk_size,
        }
    }

    fn oauth(&self) -> youtube::Result<&OAuthClient> {
        self.oauth.as_ref().ok_or_else(|| {
            YoutubeError::Config("YouTube client secrets are not configured".into())
        })
    }
}

#[async_trait]
impl BaseVideoPlatform for YoutubeAdapter {
    fn authorization_url(&self, state: &str) -> youtube::Result<String> {
        self.oauth()?.authorization_url(state)
    }

    async fn exchange_code(&self, code: &str) -> youtube::Result<Credentials> {
        self.oauth()?.exchange_code(code).await
    }

    async fn refresh(&self, credentials: &mut Credentials) -> youtube::Result<()> {
        self.oauth()?.refresh(credentials).await
    }

    async fn insert_video(
        &self,
        credentials: &Credentials,
        body: &VideoInsert,
        media_path: &Path,
    ) -> youtube::Result<Video> {
        self.client
            .insert_video(credentials, body, media_path, self.chunk_size)
            .await
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to handlers (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub credential_store: Arc<dyn BaseCredentialStore>,
    pub video_platform: Arc<dyn BaseVideoPlatform>,
    /// Pending OAuth `state` values between consent and callback
    pub oauth_states: Arc<OAuthStateStore>,
    pub uploader_settings: UploaderSettings,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        credential_store: Arc<dyn BaseCredentialStore>,
        video_platform: Arc<dyn BaseVideoPlatform>,
        uploader_settings: UploaderSettings,
    ) -> Self {
        Self {
            db_pool,
            credential_store,
            video_platform,
            oauth_states: Arc::new(OAuthStateStore::new()),
            uploader_settings,
        }
    }

    /// A fresh uploader for one upload call.
    pub fn shorts_uploader(&self) -> ShortsUploader {
        ShortsUploader::new(
            self.uploader_settings.clone(),
            self.credential_store.clone(),
            self.video_platform.clone(),
        )
    }
}

//! Shorts uploader.
//!
//! Owns the credential lifecycle (load, refresh, persist) and turns a
//! [`ShortUpload`] into one `videos.insert` call on the video platform.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};
use youtube::{Credentials, PrivacyStatus, Snippet, VideoInsert, VideoStatus};

use super::UploadError;
use crate::config::YoutubeConfig;
use crate::kernel::{BaseCredentialStore, BaseVideoPlatform};

/// Tag that marks a video as a Short
pub const SHORTS_TAG: &str = "#Shorts";

/// Defaults applied when an upload leaves a field unset
#[derive(Debug, Clone)]
pub struct UploaderSettings {
    pub scopes: Vec<String>,
    pub default_privacy_status: PrivacyStatus,
    pub default_category_id: String,
}

impl UploaderSettings {
    pub fn from_config(config: &YoutubeConfig) -> Self {
        Self {
            scopes: config.scopes.clone(),
            default_privacy_status: config.privacy_status,
            default_category_id: config.category_id.clone(),
        }
    }
}

/// One Short to publish
#[derive(Debug, Clone, Default)]
pub struct ShortUpload {
    pub video_path: PathBuf,
    pub title: String,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub privacy_status: Option<PrivacyStatus>,
    pub category_id: Option<String>,
    pub made_for_kids: bool,
    /// Scheduled publish time; dropped unless the video ends up private
    pub publish_at: Option<DateTime<Utc>>,
    pub additional_snippet_fields: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub id: String,
    pub url: String,
    pub response: Value,
}

pub struct ShortsUploader {
    settings: UploaderSettings,
    store: Arc<dyn BaseCredentialStore>,
    platform: Arc<dyn BaseVideoPlatform>,
    credentials: Option<Credentials>,
}

impl ShortsUploader {
    pub fn new(
        settings: UploaderSettings,
        store: Arc<dyn BaseCredentialStore>,
        platform: Arc<dyn BaseVideoPlatform>,
    ) -> Self {
        Self {
            settings,
            store,
            platform,
            credentials: None,
        }
    }

    /// Credentials ready for an API call.
    ///
    /// Expired credentials with a refresh token are refreshed and written
    /// back to the store. Anything else that is missing or invalid needs an
    /// interactive login through the OAuth endpoints.
    pub async fn load_credentials(&mut self) -> Result<Credentials, UploadError> {
        if let Some(cached) = self.credentials.as_ref().filter(|c| c.valid()) {
            return Ok(cached.clone());
        }

        let stored = self.store.read_credentials(&self.settings.scopes).await?;

        let credentials = match stored {
            Some(credentials) if credentials.valid() => credentials,
            Some(mut credentials) if credentials.expired() && credentials.can_refresh() => {
                debug!("Stored YouTube credentials expired, refreshing");
                self.platform
                    .refresh(&mut credentials)
                    .await
                    .map_err(UploadError::Authorization)?;
                self.store.write_credentials(&credentials).await?;
                info!("Refreshed and saved YouTube credentials");
                credentials
            }
            _ => return Err(UploadError::AuthorizationRequired),
        };

        self.credentials = Some(credentials.clone());
        Ok(credentials)
    }

    /// The `videos.insert` body for `upload`, with Shorts conventions applied.
    pub fn build_request(&self, upload: &ShortUpload) -> VideoInsert {
        let mut tags = upload.tags.clone().unwrap_or_default();
        if !tags.iter().any(|tag| tag.eq_ignore_ascii_case(SHORTS_TAG)) {
            tags.push(SHORTS_TAG.to_string());
        }

        let privacy_status = upload
            .privacy_status
            .unwrap_or(self.settings.default_privacy_status);
        let category_id = upload
            .category_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.settings.default_category_id.clone());

        // The API only accepts publishAt on private videos
        let publish_at = upload
            .publish_at
            .filter(|_| privacy_status == PrivacyStatus::Private);

        VideoInsert {
            snippet: Snippet {
                title: upload.title.clone(),
                description: upload.description.clone().unwrap_or_default(),
                tags,
                category_id,
                extra: upload.additional_snippet_fields.clone().unwrap_or_default(),
            },
            status: VideoStatus {
                privacy_status,
                self_declared_made_for_kids: upload.made_for_kids,
                publish_at,
            },
        }
    }

    /// Upload a local video as a Short.
    ///
    /// The file must already satisfy Shorts constraints (vertical, short);
    /// nothing here inspects or transcodes it.
    pub async fn upload(&mut self, upload: &ShortUpload) -> Result<UploadOutcome, UploadError> {
        if !tokio::fs::try_exists(&upload.video_path)
            .await
            .unwrap_or(false)
        {
            return Err(UploadError::VideoNotFound(upload.video_path.clone()));
        }

        let body = self.build_request(upload);
        let credentials = self.load_credentials().await?;

        let video = self
            .platform
            .insert_video(&credentials, &body, &upload.video_path)
            .await
            .map_err(UploadError::Platform)?;

        Ok(UploadOutcome {
            url: video.watch_url(),
            id: video.id,
            response: video.raw,
        })
    }
}

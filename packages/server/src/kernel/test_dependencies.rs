// TestDependencies - mock implementations for testing
//
// Provides in-memory stand-ins for the credential store and the video
// platform so the uploader and the HTTP layer can be tested offline.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use youtube::{Credentials, Video, VideoInsert, YoutubeError};

use super::{BaseCredentialStore, BaseVideoPlatform};

// =============================================================================
// In-memory Credential Store
// =============================================================================

#[derive(Default)]
pub struct InMemoryCredentialStore {
    stored: Mutex<Option<Credentials>>,
    writes: Mutex<usize>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: Credentials) -> Self {
        let store = Self::new();
        *store.stored.lock().unwrap() = Some(credentials);
        store
    }

    pub fn stored(&self) -> Option<Credentials> {
        self.stored.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

#[async_trait]
impl BaseCredentialStore for InMemoryCredentialStore {
    async fn read_credentials(&self, scopes: &[String]) -> Result<Option<Credentials>> {
        let mut credentials = self.stored.lock().unwrap().clone();
        if let Some(credentials) = credentials.as_mut() {
            if !scopes.is_empty() {
                credentials.scopes = scopes.to_vec();
            }
        }
        Ok(credentials)
    }

    async fn write_credentials(&self, credentials: &Credentials) -> Result<()> {
        *self.stored.lock().unwrap() = Some(credentials.clone());
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

// =============================================================================
// Mock Video Platform
// =============================================================================

/// How the next upload should end
#[derive(Debug, Clone)]
pub enum MockUploadOutcome {
    Success { video_id: String },
    Failure { status: u16, message: String },
}

/// Arguments captured from an insert_video call
#[derive(Debug, Clone)]
pub struct InsertCallArgs {
    pub access_token: Option<String>,
    pub body: VideoInsert,
    pub media_path: PathBuf,
}

pub struct MockVideoPlatform {
    upload_outcomes: Arc<Mutex<Vec<MockUploadOutcome>>>,
    refresh_fails: bool,
    insert_calls: Arc<Mutex<Vec<InsertCallArgs>>>,
    refresh_calls: Arc<Mutex<usize>>,
    exchanged_codes: Arc<Mutex<Vec<String>>>,
}

impl MockVideoPlatform {
    pub fn new() -> Self {
        Self {
            upload_outcomes: Arc::new(Mutex::new(Vec::new())),
            refresh_fails: false,
            insert_calls: Arc::new(Mutex::new(Vec::new())),
            refresh_calls: Arc::new(Mutex::new(0)),
            exchanged_codes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue an upload outcome (consumed in order; default is success with id "mock-video")
    pub fn with_upload_outcome(self, outcome: MockUploadOutcome) -> Self {
        self.upload_outcomes.lock().unwrap().push(outcome);
        self
    }

    /// Make every refresh attempt fail as if the grant was revoked
    pub fn with_failing_refresh(mut self) -> Self {
        self.refresh_fails = true;
        self
    }

    pub fn insert_calls(&self) -> Vec<InsertCallArgs> {
        self.insert_calls.lock().unwrap().clone()
    }

    pub fn refresh_count(&self) -> usize {
        *self.refresh_calls.lock().unwrap()
    }

    pub fn exchanged_codes(&self) -> Vec<String> {
        self.exchanged_codes.lock().unwrap().clone()
    }
}

impl Default for MockVideoPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseVideoPlatform for MockVideoPlatform {
    fn authorization_url(&self, state: &str) -> youtube::Result<String> {
        Ok(format!(
            "https://accounts.google.com/o/oauth2/auth?client_id=mock&state={}",
            state
        ))
    }

    async fn exchange_code(&self, code: &str) -> youtube::Result<Credentials> {
        self.exchanged_codes.lock().unwrap().push(code.to_string());
        Ok(Credentials {
            token: Some(format!("token-for-{}", code)),
            refresh_token: Some("mock-refresh-token".into()),
            token_uri: youtube::credentials::DEFAULT_TOKEN_URI.into(),
            client_id: "mock-client".into(),
            client_secret: "mock-secret".into(),
            scopes: vec![crate::config::DEFAULT_YOUTUBE_SCOPE.into()],
            expiry: Some(Utc::now() + Duration::hours(1)),
        })
    }

    async fn refresh(&self, credentials: &mut Credentials) -> youtube::Result<()> {
        *self.refresh_calls.lock().unwrap() += 1;
        if self.refresh_fails {
            return Err(YoutubeError::Auth(
                "token endpoint returned 400: invalid_grant".into(),
            ));
        }
        credentials.token = Some("refreshed-token".into());
        credentials.expiry = Some(Utc::now() + Duration::hours(1));
        Ok(())
    }

    async fn insert_video(
        &self,
        credentials: &Credentials,
        body: &VideoInsert,
        media_path: &Path,
    ) -> youtube::Result<Video> {
        self.insert_calls.lock().unwrap().push(InsertCallArgs {
            access_token: credentials.token.clone(),
            body: body.clone(),
            media_path: media_path.to_path_buf(),
        });

        let outcome = {
            let mut outcomes = self.upload_outcomes.lock().unwrap();
            if outcomes.is_empty() {
                None
            } else {
                Some(outcomes.remove(0))
            }
        };

        match outcome.unwrap_or(MockUploadOutcome::Success {
            video_id: "mock-video".into(),
        }) {
            MockUploadOutcome::Success { video_id } => Ok(Video {
                raw: json!({"kind": "youtube#video", "id": video_id}),
                id: video_id,
            }),
            MockUploadOutcome::Failure { status, message } => {
                Err(YoutubeError::Api { status, message })
            }
        }
    }
}

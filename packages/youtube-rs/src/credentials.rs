//! OAuth2 credential set and client secrets.
//!
//! [`Credentials`] uses the same JSON layout as Google's "authorized user"
//! files, so a token written by another Google client library can be loaded
//! unchanged and vice versa.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, YoutubeError};

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";

/// Tokens are treated as expired this long before their actual expiry.
const EXPIRY_SKEW_SECONDS: i64 = 10;

/// Access/refresh token bundle for calling the Data API on a user's behalf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    /// Short-lived access token
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default, deserialize_with = "deserialize_scopes")]
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Scopes are stored either as a list or as one space-separated string.
fn deserialize_scopes<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scopes {
        List(Vec<String>),
        Joined(String),
        Missing(()),
    }

    Ok(match Scopes::deserialize(deserializer)? {
        Scopes::List(list) => list,
        Scopes::Joined(joined) => joined.split_whitespace().map(str::to_string).collect(),
        Scopes::Missing(()) => Vec::new(),
    })
}

impl Credentials {
    /// Parse a stored credential document.
    ///
    /// A non-empty `scopes` argument replaces whatever scope list was stored.
    pub fn from_authorized_user_info(json: &str, scopes: &[String]) -> Result<Self> {
        let mut credentials: Credentials = serde_json::from_str(json)
            .map_err(|e| YoutubeError::Parse(format!("Invalid stored credentials: {}", e)))?;
        if !scopes.is_empty() {
            credentials.scopes = scopes.to_vec();
        }
        Ok(credentials)
    }

    /// Serialize to the stored document layout.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| YoutubeError::Parse(format!("Failed to serialize credentials: {}", e)))
    }

    pub fn expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => now >= expiry - Duration::seconds(EXPIRY_SKEW_SECONDS),
            None => false,
        }
    }

    pub fn expired(&self) -> bool {
        self.expired_at(Utc::now())
    }

    /// Usable as-is: carries an access token that has not expired.
    pub fn valid_at(&self, now: DateTime<Utc>) -> bool {
        self.token.is_some() && !self.expired_at(now)
    }

    pub fn valid(&self) -> bool {
        self.valid_at(Utc::now())
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }

    pub(crate) fn access_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| YoutubeError::Auth("credentials carry no access token".into()))
    }
}

/// OAuth client configuration as downloaded from the Google Cloud console.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

#[derive(Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Parse a client secrets document (`{"installed": {...}}` or `{"web": {...}}`).
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ClientSecretsFile = serde_json::from_str(json)
            .map_err(|e| YoutubeError::Config(format!("Invalid client secrets: {}", e)))?;
        file.installed.or(file.web).ok_or_else(|| {
            YoutubeError::Config("client secrets must contain an 'installed' or 'web' section".into())
        })
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            YoutubeError::Config(format!(
                "Cannot read client secrets file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }
}

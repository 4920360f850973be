//! Error types for the YouTube client.

use thiserror::Error;

/// Result type for YouTube client operations.
pub type Result<T> = std::result::Result<T, YoutubeError>;

/// YouTube client errors.
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// Configuration error (unreadable client secrets, missing client id)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// OAuth error (token endpoint rejected the grant, no access token)
    #[error("Authorization error: {0}")]
    Auth(String),

    /// API error (non-2xx response from the Data API)
    #[error("{status} {message}")]
    Api { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),

    /// A value outside the API's accepted set
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The media file cannot be uploaded as-is
    #[error("Invalid media: {0}")]
    Media(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl YoutubeError {
    /// HTTP status of the failed API call, if the error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            YoutubeError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for YoutubeError {
    fn from(err: reqwest::Error) -> Self {
        YoutubeError::Network(err.to_string())
    }
}

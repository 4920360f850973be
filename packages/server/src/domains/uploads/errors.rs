use std::path::PathBuf;

use thiserror::Error;
use youtube::YoutubeError;

/// Failures of the Shorts upload and OAuth handshake
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Video file not found: {}", .0.display())]
    VideoNotFound(PathBuf),

    #[error("YouTube authorization required: complete POST /uploads/auth/youtube first")]
    AuthorizationRequired,

    #[error("Invalid or expired OAuth state")]
    InvalidOAuthState,

    #[error("YouTube authorization failed: {0}")]
    Authorization(#[source] YoutubeError),

    #[error("YouTube upload failed: {0}")]
    Platform(#[source] YoutubeError),

    #[error("Credential store error: {0}")]
    Store(#[from] anyhow::Error),
}

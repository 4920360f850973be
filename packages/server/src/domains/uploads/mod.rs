//! Uploads domain - publishes local videos to YouTube as Shorts
//!
//! Responsibilities:
//! - Persisting the single YouTube OAuth credential set
//! - Refreshing expired credentials before an upload
//! - Building Shorts metadata and running the upload in the background
//! - The OAuth consent handshake (state issue/consume)

pub mod background;
pub mod errors;
pub mod models;
pub mod oauth_state;
pub mod uploader;

pub use background::spawn_upload;
pub use errors::UploadError;
pub use models::{PostgresCredentialStore, YoutubeToken};
pub use oauth_state::OAuthStateStore;
pub use uploader::{ShortUpload, ShortsUploader, UploadOutcome, UploaderSettings, SHORTS_TAG};

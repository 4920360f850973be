// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "upload a short") lives in domain code that uses these traits.
//
// Naming convention: Base* for trait names (e.g., BaseCredentialStore, BaseVideoPlatform)

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use youtube::{Credentials, Video, VideoInsert};

// =============================================================================
// Credential Store Trait (Infrastructure - single OAuth credential set)
// =============================================================================

#[async_trait]
pub trait BaseCredentialStore: Send + Sync {
    /// Read the stored credential set, if any.
    /// A non-empty `scopes` list replaces the stored scopes.
    async fn read_credentials(&self, scopes: &[String]) -> Result<Option<Credentials>>;

    /// Replace whatever is stored with `credentials`.
    async fn write_credentials(&self, credentials: &Credentials) -> Result<()>;
}

// =============================================================================
// Video Platform Trait (Infrastructure - OAuth grants + resumable upload)
// =============================================================================

/// Platform errors keep the client's typed error so callers can report the
/// HTTP status of a failed call.
#[async_trait]
pub trait BaseVideoPlatform: Send + Sync {
    /// Consent screen URL carrying `state`
    fn authorization_url(&self, state: &str) -> youtube::Result<String>;

    /// Exchange an authorization code for credentials
    async fn exchange_code(&self, code: &str) -> youtube::Result<Credentials>;

    /// Refresh the access token in place
    async fn refresh(&self, credentials: &mut Credentials) -> youtube::Result<()>;

    /// Upload a video file with the given metadata
    async fn insert_video(
        &self,
        credentials: &Credentials,
        body: &VideoInsert,
        media_path: &Path,
    ) -> youtube::Result<Video>;
}

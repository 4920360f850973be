use std::path::PathBuf;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Query,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use youtube::PrivacyStatus;

use crate::domains::uploads::{spawn_upload, ShortUpload, UploadError};
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct UploadShortRequest {
    /// Absolute path to a local video file
    pub video_path: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// private | unlisted | public
    #[serde(default)]
    pub privacy_status: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub made_for_kids: bool,
    #[serde(default)]
    pub publish_at_rfc3339: Option<String>,
    #[serde(default)]
    pub additional_snippet_fields: Option<Map<String, Value>>,
}

impl UploadShortRequest {
    pub fn into_upload(self) -> Result<ShortUpload, ApiError> {
        // Blank strings mean "use the default", like absent fields
        let privacy_status = self
            .privacy_status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::parse::<PrivacyStatus>)
            .transpose()
            .map_err(|_| {
                ApiError::Validation(
                    "privacy_status must be one of private, unlisted, public".to_string(),
                )
            })?;

        let publish_at = self
            .publish_at_rfc3339
            .as_deref()
            .map(DateTime::parse_from_rfc3339)
            .transpose()
            .map_err(|e| {
                ApiError::Validation(format!("publish_at_rfc3339 is not RFC 3339: {}", e))
            })?
            .map(|at| at.with_timezone(&Utc));

        Ok(ShortUpload {
            video_path: PathBuf::from(self.video_path),
            title: self.title,
            description: Some(self.description.unwrap_or_default()),
            tags: self.tags,
            privacy_status,
            category_id: self.category_id.filter(|id| !id.is_empty()),
            made_for_kids: self.made_for_kids,
            publish_at,
            additional_snippet_fields: self.additional_snippet_fields,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct UploadShortResponse {
    pub id: Option<String>,
    pub url: Option<String>,
    pub status: String,
    pub message: Option<String>,
}

impl UploadShortResponse {
    pub fn scheduled() -> Self {
        Self {
            id: None,
            url: None,
            status: "scheduled".to_string(),
            message: None,
        }
    }
}

/// Schedule a Shorts upload and return immediately
pub async fn upload_short_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<UploadShortRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UploadShortResponse>), ApiError> {
    let Json(request) = payload?;
    let upload = request.into_upload()?;

    // Fail early on missing files; the upload re-checks when it runs
    if !tokio::fs::try_exists(&upload.video_path)
        .await
        .unwrap_or(false)
    {
        return Err(UploadError::VideoNotFound(upload.video_path).into());
    }

    spawn_upload(state.deps.shorts_uploader(), upload);

    Ok((StatusCode::ACCEPTED, Json(UploadShortResponse::scheduled())))
}

#[derive(Debug, Serialize)]
pub struct AuthStartResponse {
    pub status: String,
    pub authorization_url: String,
}

/// Begin the OAuth consent flow
///
/// The returned URL must be opened in a browser; Google then redirects to
/// the callback below, which stores the resulting credentials.
pub async fn auth_youtube_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<AuthStartResponse>, ApiError> {
    let oauth_state = state.deps.oauth_states.issue();
    let authorization_url = state
        .deps
        .video_platform
        .authorization_url(&oauth_state)
        .map_err(UploadError::Authorization)?;

    Ok(Json(AuthStartResponse {
        status: "pending".to_string(),
        authorization_url,
    }))
}

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackParams {
    pub state: String,
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Finish the OAuth flow and persist the credentials
pub async fn auth_youtube_callback_handler(
    Extension(state): Extension<AppState>,
    params: Result<Query<OAuthCallbackParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params?;

    if !state.deps.oauth_states.consume(&params.state) {
        return Err(UploadError::InvalidOAuthState.into());
    }
    if let Some(error) = params.error {
        return Err(ApiError::BadRequest(format!(
            "YouTube authorization denied: {}",
            error
        )));
    }
    let code = params
        .code
        .ok_or_else(|| ApiError::Validation("missing authorization code".to_string()))?;

    let credentials = state
        .deps
        .video_platform
        .exchange_code(&code)
        .await
        .map_err(UploadError::Authorization)?;
    state
        .deps
        .credential_store
        .write_credentials(&credentials)
        .await?;

    tracing::info!("Stored new YouTube credentials");
    Ok(Json(serde_json::json!({ "status": "ok" })))
}

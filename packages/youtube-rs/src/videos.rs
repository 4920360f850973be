//! Resumable `videos.insert`.
//!
//! Protocol: open a session with the metadata, then PUT the media in
//! `Content-Range` slices. `308` acknowledges a slice (its `Range` header
//! holds the bytes committed so far), `200`/`201` carries the new video.

use std::io::SeekFrom;
use std::path::Path;

use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, LOCATION, RANGE};
use reqwest::{Body, Response};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::credentials::Credentials;
use crate::error::{Result, YoutubeError};
use crate::models::{Video, VideoInsert};
use crate::YoutubeClient;

/// Chunk sizes must be multiples of 256 KiB (except the final chunk).
pub const RESUMABLE_CHUNK_ALIGNMENT: u64 = 256 * 1024;

const RESUME_INCOMPLETE: u16 = 308;

impl YoutubeClient {
    /// Upload `media_path` as a new video described by `body`.
    ///
    /// With `chunk_size = None` the whole file goes out in one request.
    pub async fn insert_video(
        &self,
        credentials: &Credentials,
        body: &VideoInsert,
        media_path: &Path,
        chunk_size: Option<u64>,
    ) -> Result<Video> {
        let access_token = credentials.access_token()?;

        let total = tokio::fs::metadata(media_path).await?.len();
        if total == 0 {
            return Err(YoutubeError::Media(format!(
                "{} is empty",
                media_path.display()
            )));
        }
        let content_type = mime_guess::from_path(media_path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        let session_uri = self
            .start_session(access_token, body, total, &content_type)
            .await?;
        debug!(total_bytes = total, content_type = %content_type, "Opened resumable upload session");

        let chunk_len = chunk_size.map(align_chunk_size).unwrap_or(total);
        let mut offset = 0u64;

        loop {
            let end = offset.saturating_add(chunk_len).min(total);
            let response = self
                .put_chunk(access_token, &session_uri, media_path, &content_type, offset, end, total)
                .await?;

            match response.status().as_u16() {
                200 | 201 => return parse_video(response).await,
                RESUME_INCOMPLETE => {
                    let committed = committed_bytes(response.headers())?;
                    if committed <= offset || committed >= total {
                        return Err(YoutubeError::Api {
                            status: RESUME_INCOMPLETE,
                            message: format!(
                                "upload stalled at {} of {} bytes",
                                committed, total
                            ),
                        });
                    }
                    debug!(bytes_sent = committed, total_bytes = total, "Upload progress");
                    offset = committed;
                }
                _ => return Err(api_error(response).await),
            }
        }
    }

    async fn start_session(
        &self,
        access_token: &str,
        body: &VideoInsert,
        total: u64,
        content_type: &str,
    ) -> Result<String> {
        let url = format!("{}/upload/youtube/v3/videos", self.base_url);

        let response = self
            .http_client
            .post(url)
            .query(&[("uploadType", "resumable"), ("part", body.parts())])
            .bearer_auth(access_token)
            .header("X-Upload-Content-Length", total)
            .header("X-Upload-Content-Type", content_type)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                YoutubeError::Parse("upload session response has no Location header".into())
            })
    }

    #[allow(clippy::too_many_arguments)]
    async fn put_chunk(
        &self,
        access_token: &str,
        session_uri: &str,
        media_path: &Path,
        content_type: &str,
        start: u64,
        end: u64,
        total: u64,
    ) -> Result<Response> {
        let mut file = tokio::fs::File::open(media_path).await?;
        file.seek(SeekFrom::Start(start)).await?;
        let len = end - start;
        let stream = ReaderStream::new(file.take(len));

        let response = self
            .http_client
            .put(session_uri)
            .bearer_auth(access_token)
            .header(CONTENT_LENGTH, len)
            .header(CONTENT_RANGE, format!("bytes {}-{}/{}", start, end - 1, total))
            .header(CONTENT_TYPE, content_type)
            .body(Body::wrap_stream(stream))
            .send()
            .await?;

        Ok(response)
    }
}

/// Round up to the protocol's chunk alignment.
///
/// Sizes past the largest aligned `u64` stay at that value; the upload loop
/// clamps every chunk to the file length anyway.
fn align_chunk_size(requested: u64) -> u64 {
    let chunks = requested.div_ceil(RESUMABLE_CHUNK_ALIGNMENT).max(1);
    chunks
        .checked_mul(RESUMABLE_CHUNK_ALIGNMENT)
        .unwrap_or(u64::MAX - u64::MAX % RESUMABLE_CHUNK_ALIGNMENT)
}

/// Bytes the server has persisted, from a `Range: bytes=0-N` header.
///
/// A missing or unreadable header means nothing is committed.
fn committed_bytes(headers: &HeaderMap) -> Result<u64> {
    let Some(last) = headers
        .get(RANGE)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_range_end)
    else {
        return Ok(0);
    };
    last.checked_add(1).ok_or_else(|| {
        YoutubeError::Parse(format!("Range header end {} is out of bounds", last))
    })
}

fn parse_range_end(value: &str) -> Option<u64> {
    let (_, last) = value.trim().strip_prefix("bytes=")?.split_once('-')?;
    last.trim().parse().ok()
}

async fn parse_video(response: Response) -> Result<Video> {
    let raw: Value = response
        .json()
        .await
        .map_err(|e| YoutubeError::Parse(format!("Invalid video resource: {}", e)))?;
    let id = raw
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| YoutubeError::Parse("video resource has no id".into()))?
        .to_string();
    Ok(Video { id, raw })
}

/// Build an API error, preferring Google's `error.message` over the raw body.
async fn api_error(response: Response) -> YoutubeError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(body);
    YoutubeError::Api { status, message }
}

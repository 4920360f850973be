//! Fire-and-forget upload execution.

use tokio::task::JoinHandle;
use tracing::{error, info, info_span, Instrument};

use super::{ShortUpload, ShortsUploader, UploadOutcome};

/// Run `upload` on a background task.
///
/// The caller gets no result channel; the outcome is only logged. The
/// returned handle resolves to the outcome for callers that want it anyway.
pub fn spawn_upload(
    mut uploader: ShortsUploader,
    upload: ShortUpload,
) -> JoinHandle<Option<UploadOutcome>> {
    let span = info_span!(
        "short_upload",
        video_path = %upload.video_path.display(),
        title = %upload.title,
    );

    tokio::spawn(
        async move {
            info!("Starting YouTube Shorts upload");
            match uploader.upload(&upload).await {
                Ok(outcome) => {
                    info!(video_id = %outcome.id, url = %outcome.url, "YouTube Shorts upload complete");
                    Some(outcome)
                }
                Err(e) => {
                    error!(error = %e, "YouTube Shorts upload failed");
                    None
                }
            }
        }
        .instrument(span),
    )
}

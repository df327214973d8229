//! Recognition service client -- uploads a fridge photo and returns the
//! recognized `"name | phrase"` lines.

use std::path::Path;

use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RecognitionConfig;
use crate::error::{Result, UploadError};
use crate::events::Event;
use crate::session::SharedSession;

/// Multipart field name the service reads the image from.
pub const FILE_FIELD: &str = "file";
pub const UPLOAD_FILENAME: &str = "fridge.jpg";
pub const UPLOAD_MIME: &str = "image/jpeg";

/// Response body of the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub items: Vec<String>,
}

pub struct RecognitionClient {
    client: Client,
    endpoint: String,
}

impl RecognitionClient {
    pub fn new(config: &RecognitionConfig) -> Result<Self, UploadError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Upload one image and decode the recognized items.
    ///
    /// No retries are attempted; a failed upload is retried by the user.
    pub async fn recognize(&self, image: &Path) -> Result<RecognitionResult, UploadError> {
        let bytes = tokio::fs::read(image)
            .await
            .map_err(|source| UploadError::ReadImage {
                path: image.to_path_buf(),
                source,
            })?;
        debug!(path = %image.display(), size = bytes.len(), endpoint = %self.endpoint, "uploading photo");

        let part = Part::bytes(bytes)
            .file_name(UPLOAD_FILENAME)
            .mime_str(UPLOAD_MIME)?;
        let form = Form::new().part(FILE_FIELD, part);

        let resp = self.client.post(&self.endpoint).multipart(form).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "recognition service rejected upload");
            return Err(UploadError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| UploadError::Decode(e.to_string()))
    }
}

/// Upload the session's newest photo and ingest the result.
///
/// The session lock is released while the request is in flight, so the
/// item list stays usable. A failed upload leaves the list untouched; a
/// result for a superseded upload is rejected by the session.
pub async fn upload_latest(session: &SharedSession, client: &RecognitionClient) -> Result<Event> {
    let ticket = session.lock().await.begin_upload()?;

    let result = match client.recognize(&ticket.photo).await {
        Ok(result) => result,
        Err(e) => {
            warn!(ticket = ticket.id, error = %e, "upload failed");
            return Err(e.into());
        }
    };

    session
        .lock()
        .await
        .on_recognition_result(&ticket, &result.items, Utc::now())
}

//! Axum route handler for file uploads.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::multipart::{FilePart, FormUpload};
use crate::storage::BlobStore;
use crate::state::AppState;
use crate::upload::unique_object_name;

/// Per-file outcome. Serialized without a tag: success and failure differ by fields.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UploadOutcome {
    Uploaded {
        original_name: String,
        uploaded_name: String,
        file_url: String,
    },
    Failed {
        original_name: String,
        error: String,
    },
}

impl UploadOutcome {
    fn is_uploaded(&self) -> bool {
        matches!(self, UploadOutcome::Uploaded { .. })
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub files: Vec<UploadOutcome>,
}

/// POST /upload
///
/// Multipart: one or more `files` parts. Files are stored one after another;
/// a failed file is reported in place and the rest of the batch continues.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let form = FormUpload::read(multipart).await?;
    form.require_files()?;

    let total = form.files.len();
    let mut files = Vec::with_capacity(total);
    for file in form.files {
        files.push(upload_file(state.store.as_ref(), file).await);
    }

    let uploaded = files.iter().filter(|f| f.is_uploaded()).count();
    info!("Upload batch finished: {uploaded}/{total} stored");

    let message = if uploaded == total {
        "Files uploaded successfully".to_string()
    } else {
        format!("Uploaded {uploaded} of {total} files")
    };

    Ok(Json(UploadResponse { message, files }))
}

async fn upload_file(store: &dyn BlobStore, file: FilePart) -> UploadOutcome {
    let FilePart {
        file_name,
        content_type,
        data,
    } = file;
    let uploaded_name = unique_object_name(&file_name);

    match store
        .put_object(&uploaded_name, data, content_type.as_deref())
        .await
    {
        Ok(()) => UploadOutcome::Uploaded {
            file_url: store.public_url(&uploaded_name),
            original_name: file_name,
            uploaded_name,
        },
        Err(e) => {
            warn!("Upload of '{file_name}' failed: {e}");
            UploadOutcome::Failed {
                original_name: file_name,
                error: e.to_string(),
            }
        }
    }
}

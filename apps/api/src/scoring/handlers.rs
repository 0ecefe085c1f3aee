//! Axum route handler for resume scoring.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::multipart::{FilePart, FormUpload};
use crate::scoring::extract::extract_text_blocking;
use crate::scoring::scorer::{Evaluation, ResumeScorer};
use crate::state::AppState;

pub const JOB_DESCRIPTION_FIELD: &str = "job_description";

#[derive(Debug, Serialize, PartialEq)]
pub struct ScoreResult {
    #[serde(rename = "resumeName")]
    pub resume_name: String,
    #[serde(flatten)]
    pub evaluation: Evaluation,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub results: Vec<ScoreResult>,
}

/// POST /score
///
/// Multipart: one or more `files` parts plus a `job_description` text field.
/// Each file gets its own result; a failure on one file never aborts the batch.
pub async fn handle_score(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ScoreResponse>, AppError> {
    let mut form = FormUpload::read(multipart).await?;
    form.require_files()?;
    let job_description = form.take_field(JOB_DESCRIPTION_FIELD).ok_or_else(|| {
        AppError::Validation(format!("Missing '{JOB_DESCRIPTION_FIELD}' field"))
    })?;

    info!("Scoring {} resume(s)", form.files.len());

    let mut results = Vec::with_capacity(form.files.len());
    for file in form.files {
        results.push(score_file(state.scorer.as_ref(), file, &job_description).await);
    }

    Ok(Json(ScoreResponse { results }))
}

async fn score_file(scorer: &dyn ResumeScorer, file: FilePart, job_description: &str) -> ScoreResult {
    let FilePart {
        file_name, data, ..
    } = file;

    let evaluation = match extract_text_blocking(data, file_name.clone()).await {
        Ok(text) => scorer.score(&text, job_description).await,
        Err(e) => {
            warn!("Could not read resume '{file_name}': {e}");
            Evaluation::failed(format!("Failed to parse resume: {e}"))
        }
    };

    ScoreResult {
        resume_name: file_name,
        evaluation,
    }
}

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::resume::ingest::{ingest_pdf, IngestContext, IngestOutcome};
use crate::resume::source::{is_pdf, ResumeObject};
use crate::state::AppState;

/// Upload size cap for resume PDFs.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const UPLOAD_FIELD: &str = "file";

#[derive(Serialize)]
pub struct ResumeListResponse {
    pub resumes: Vec<ResumeObject>,
}

#[derive(Deserialize)]
pub struct ImportRequest {
    pub key: String,
}

fn ingest_context(state: &AppState) -> IngestContext<'_> {
    IngestContext {
        generator: state.generator.as_ref(),
        archive: &state.archive,
        session: &state.session,
    }
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<ResumeListResponse>, AppError> {
    let resumes = state.resumes.list_resumes().await?;
    Ok(Json(ResumeListResponse { resumes }))
}

/// POST /api/v1/resumes/upload
/// Multipart form with the PDF in the `file` field.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestOutcome>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("resume.pdf").to_string();
        if !is_pdf(&filename) {
            return Err(AppError::Validation(format!(
                "Only PDF resumes are supported, got '{filename}'"
            )));
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        info!("Received upload {} ({} bytes)", filename, data.len());
        let outcome = ingest_pdf(ingest_context(&state), data, &filename).await?;
        return Ok(Json(outcome));
    }

    Err(AppError::Validation(format!(
        "Multipart field '{UPLOAD_FIELD}' is required"
    )))
}

/// POST /api/v1/resumes/import
/// Ingests a resume already stored in the resume bucket.
pub async fn handle_import_resume(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> Result<Json<IngestOutcome>, AppError> {
    let (data, filename) = state.resumes.fetch_resume(req.key.trim()).await?;
    info!("Importing {} from resume bucket", req.key);
    let outcome = ingest_pdf(ingest_context(&state), data, &filename).await?;
    Ok(Json(outcome))
}

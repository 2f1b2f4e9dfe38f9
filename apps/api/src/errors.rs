use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::feedback::assessment::AssessmentError;
use crate::feedback::submit::SubmitError;
use crate::interview::materials::{SelfEvaluationError, UnknownLanguage};
use crate::llm_client::LlmError;
use crate::pipeline::round::UnknownRound;
use crate::pipeline::stage::UnknownStage;
use crate::resume::attributes::AttributeParseError;
use crate::resume::extract::ExtractionError;
use crate::resume::ingest::IngestError;
use crate::resume::source::ResumeSourceError;
use crate::storage::StorageError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Resume parse error: {0}")]
    ResumeParse(#[from] AttributeParseError),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("S3 error: {0}")]
    S3(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Extraction(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_ERROR",
                e.to_string(),
            ),
            AppError::ResumeParse(e) => {
                tracing::warn!("Resume parse failed: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "RESUME_PARSE_ERROR",
                    e.to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::S3(msg) => {
                tracing::error!("S3 error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "S3_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Module error conversions
// ────────────────────────────────────────────────────────────────────────────

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Llm(e.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::S3(e.to_string())
    }
}

impl From<ResumeSourceError> for AppError {
    fn from(e: ResumeSourceError) -> Self {
        match e {
            ResumeSourceError::NotConfigured | ResumeSourceError::NotPdf(_) => {
                AppError::Validation(e.to_string())
            }
            ResumeSourceError::NotFound(_) => AppError::NotFound(e.to_string()),
            ResumeSourceError::Storage(e) => e.into(),
        }
    }
}

impl From<IngestError> for AppError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::Extraction(e) => e.into(),
            IngestError::Parse(e) => e.into(),
            IngestError::ExtractionTask(e) => AppError::Internal(anyhow::anyhow!(e)),
        }
    }
}

impl From<AssessmentError> for AppError {
    fn from(e: AssessmentError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<SubmitError> for AppError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::Invalid(e) => e.into(),
            SubmitError::UnknownCandidate(_) => AppError::NotFound(e.to_string()),
        }
    }
}

impl From<SelfEvaluationError> for AppError {
    fn from(e: SelfEvaluationError) -> Self {
        match e {
            SelfEvaluationError::NoOutputs => AppError::Validation(e.to_string()),
            other => AppError::Llm(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<UnknownStage> for AppError {
    fn from(e: UnknownStage) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<UnknownRound> for AppError {
    fn from(e: UnknownRound) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<UnknownLanguage> for AppError {
    fn from(e: UnknownLanguage) -> Self {
        AppError::Validation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn render(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_body_shape() {
        let (status, body) = render(AppError::NotFound("candidate 7 not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "candidate 7 not found");
    }

    #[tokio::test]
    async fn test_extraction_and_parse_are_unprocessable() {
        let (status, body) = render(ExtractionError::NoText.into()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "EXTRACTION_ERROR");

        let (status, _) = render(AttributeParseError::NotJson.into()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_llm_details_are_not_leaked() {
        let (status, body) = render(LlmError::RateLimited { retries: 3 }.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "An AI processing error occurred");
    }

    #[test]
    fn test_unknown_candidate_maps_to_not_found() {
        let error: AppError =
            SubmitError::UnknownCandidate(crate::pipeline::store::CandidateId(3)).into();
        assert!(matches!(error, AppError::NotFound(_)));
    }

    #[test]
    fn test_missing_resume_bucket_is_validation() {
        let error: AppError = ResumeSourceError::NotConfigured.into();
        assert!(matches!(error, AppError::Validation(_)));
    }
}

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::feedback::assessment::{AssessmentRecord, AssessmentSubmission};
use crate::feedback::submit::{submit_assessment, SubmissionOutcome};
use crate::pipeline::store::CandidateId;
use crate::state::AppState;

#[derive(Serialize)]
pub struct AssessmentView {
    #[serde(flatten)]
    pub record: AssessmentRecord,
    pub mean_rating: f64,
}

/// POST /api/v1/candidates/:id/feedback
/// Malformed bodies are validation errors like out-of-range ratings.
pub async fn handle_submit_feedback(
    State(state): State<AppState>,
    Path(id): Path<CandidateId>,
    payload: Result<Json<AssessmentSubmission>, JsonRejection>,
) -> Result<Json<SubmissionOutcome>, AppError> {
    let Json(submission) = payload?;
    let outcome = submit_assessment(&state.session, &state.archive, id, submission).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/assessments
/// Session assessments, most recent first.
pub async fn handle_list_assessments(State(state): State<AppState>) -> Json<Vec<AssessmentView>> {
    let session = state.session.lock().await;
    Json(
        session
            .assessments
            .iter()
            .rev()
            .map(|record| AssessmentView {
                mean_rating: record.ratings.mean(),
                record: record.clone(),
            })
            .collect(),
    )
}

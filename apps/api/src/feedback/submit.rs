//! Feedback submission: local record + stage change first, archive second.
//!
//! The archive write happens after the session lock is released and its
//! failure never undoes the local record. Local and archived state can diverge.

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::feedback::archive::FeedbackArchive;
use crate::feedback::assessment::{AssessmentError, AssessmentRecord, AssessmentSubmission};
use crate::pipeline::store::CandidateId;
use crate::pipeline::tracker::StatusTransition;
use crate::session::Session;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] AssessmentError),

    #[error("candidate {0} not found")]
    UnknownCandidate(CandidateId),
}

/// Outcome of forwarding one row to the feedback archive.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveWrite {
    pub saved: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub assessment: AssessmentRecord,
    pub transition: StatusTransition,
    pub archive: ArchiveWrite,
}

pub async fn submit_assessment(
    session: &Mutex<Session>,
    archive: &FeedbackArchive,
    id: CandidateId,
    submission: AssessmentSubmission,
) -> Result<SubmissionOutcome, SubmitError> {
    submission.validate()?;

    let (assessment, transition) = {
        let mut session = session.lock().await;
        session
            .record_assessment(id, submission, Utc::now())
            .ok_or(SubmitError::UnknownCandidate(id))?
    };
    info!(
        "Recorded assessment for candidate {} ({}): {} → {}",
        id, assessment.decision, transition.from_stage, transition.to_stage
    );

    let archive_write = match archive.append(assessment.to_archive_row()).await {
        Ok(rows) => ArchiveWrite {
            saved: true,
            message: format!(
                "Feedback saved to {} ({} rows)",
                archive.location().unwrap_or_default(),
                rows
            ),
        },
        Err(e) => {
            warn!("Feedback archive write for candidate {} failed: {}", id, e);
            ArchiveWrite {
                saved: false,
                message: format!("Assessment recorded locally but not archived: {e}"),
            }
        }
    };

    Ok(SubmissionOutcome {
        assessment,
        transition,
        archive: archive_write,
    })
}

//! Resume ingestion: orchestrates one resume from bytes to prepared candidate.
//!
//! Flow: extract_text → parse_attributes → archive status lookup →
//!       create candidate → round materials → interviewer brief.
//!
//! Extraction and parse failures stop the flow before a candidate exists.
//! Everything after candidate creation degrades to warnings.

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::feedback::archive::{ExternalStatus, FeedbackArchive};
use crate::interview::materials::{generate_quick_brief, generate_round_materials, RoundMaterials};
use crate::llm_client::TextGenerator;
use crate::pipeline::round::NextRound;
use crate::pipeline::stage::PipelineStage;
use crate::pipeline::store::CandidateRecord;
use crate::resume::attributes::{parse_attributes, AttributeParseError};
use crate::resume::extract::{extract_text, ExtractionError};
use crate::session::{PrepMaterials, Session};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Parse(#[from] AttributeParseError),

    #[error("text extraction task failed: {0}")]
    ExtractionTask(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub candidate: CandidateRecord,
    pub stage: PipelineStage,
    pub external_status: ExternalStatus,
    pub next_round: NextRound,
    pub next_round_message: &'static str,
    pub round_materials: Option<RoundMaterials>,
    pub brief: Option<String>,
    pub warnings: Vec<String>,
}

/// Collaborators an ingest run needs.
pub struct IngestContext<'a> {
    pub generator: &'a dyn TextGenerator,
    pub archive: &'a FeedbackArchive,
    pub session: &'a Mutex<Session>,
}

/// PDF parsing runs on the blocking pool.
pub async fn ingest_pdf(
    ctx: IngestContext<'_>,
    pdf_bytes: Bytes,
    filename: &str,
) -> Result<IngestOutcome, IngestError> {
    let text = tokio::task::spawn_blocking(move || extract_text(&pdf_bytes)).await??;
    info!("Extracted {} chars from {}", text.len(), filename);
    ingest_text(ctx, &text, filename).await
}

pub async fn ingest_text(
    ctx: IngestContext<'_>,
    resume_text: &str,
    filename: &str,
) -> Result<IngestOutcome, IngestError> {
    let attributes = parse_attributes(ctx.generator, resume_text).await?;

    let external_status = ctx.archive.lookup_status(&attributes.full_name).await;
    let next_round = NextRound::from_external_status(&external_status.status);

    let (candidate, stage) = {
        let mut session = ctx.session.lock().await;
        let candidate = session
            .candidates
            .create(attributes, filename)
            .clone();
        session.materials.insert(
            candidate.id,
            PrepMaterials::new(external_status.clone(), next_round),
        );
        let stage = session.tracker.current_stage(candidate.id);
        (candidate, stage)
    };
    info!(
        "Candidate {} external status '{}' ({}), next: {:?}",
        candidate.id, external_status.status, external_status.reason, next_round
    );

    let mut warnings = Vec::new();
    if !external_status.found {
        warnings.push(external_status.reason.clone());
    }

    let round_materials = match generate_round_materials(
        ctx.generator,
        next_round.material_round(),
        candidate.experience_years,
        &candidate.skills,
    )
    .await
    {
        Ok(materials) => Some(materials),
        Err(e) => {
            warn!("Round materials for candidate {} failed: {}", candidate.id, e);
            warnings.push(format!("Interview questions could not be generated: {e}"));
            None
        }
    };

    let brief = match generate_quick_brief(ctx.generator, &candidate).await {
        Ok(brief) => Some(brief),
        Err(e) => {
            warn!("Brief for candidate {} failed: {}", candidate.id, e);
            warnings.push(format!("Interviewer brief could not be generated: {e}"));
            None
        }
    };

    if let Some(materials) = ctx.session.lock().await.materials.get_mut(&candidate.id) {
        materials.round = round_materials.clone();
        materials.brief = brief.clone();
    }

    Ok(IngestOutcome {
        candidate,
        stage,
        external_status,
        next_round,
        next_round_message: next_round.message(),
        round_materials,
        brief,
        warnings,
    })
}

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::feedback::assessment::AssessmentRecord;
use crate::interview::handlers::MaterialsView;
use crate::pipeline::round::InterviewRound;
use crate::pipeline::stage::PipelineStage;
use crate::pipeline::store::{CandidateId, CandidateRecord};
use crate::pipeline::tracker::{PipelineSummary, StatusTransition};
use crate::session::Session;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CandidateSummary {
    pub candidate: CandidateRecord,
    pub stage: PipelineStage,
}

#[derive(Serialize)]
pub struct CandidateDetail {
    pub candidate: CandidateRecord,
    pub stage: PipelineStage,
    /// Most recent first.
    pub history: Vec<StatusTransition>,
    pub materials: Option<MaterialsView>,
    pub assessments: Vec<AssessmentRecord>,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub candidate_id: CandidateId,
    pub stage: PipelineStage,
    pub history: Vec<StatusTransition>,
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub stage: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Serialize)]
pub struct TransitionResponse {
    pub candidate_id: CandidateId,
    pub transition: StatusTransition,
}

#[derive(Serialize)]
pub struct StageColumn {
    pub stage: PipelineStage,
    pub candidates: Vec<CandidateRecord>,
}

#[derive(Serialize)]
pub struct BoardResponse {
    pub stages: Vec<StageColumn>,
    pub summary: PipelineSummary,
}

#[derive(Serialize)]
pub struct RoundDashboard {
    pub round: InterviewRound,
    pub display_name: &'static str,
    pub waiting_stage: PipelineStage,
    pub pass_stage: PipelineStage,
    pub candidates: Vec<CandidateRecord>,
}

fn not_found(id: CandidateId) -> AppError {
    AppError::NotFound(format!("candidate {id} not found"))
}

fn newest_first(session: &Session, id: CandidateId) -> Vec<StatusTransition> {
    session.tracker.history(id).iter().rev().cloned().collect()
}

/// Transition guarded by candidate existence. Source/target stages are not checked.
fn apply_transition(
    session: &mut Session,
    id: CandidateId,
    to_stage: PipelineStage,
    note: String,
) -> Result<StatusTransition, AppError> {
    if session.candidates.get(id).is_none() {
        return Err(not_found(id));
    }
    let transition = session.tracker.transition(id, to_stage, note).clone();
    info!(
        "Candidate {}: {} → {}",
        id, transition.from_stage, transition.to_stage
    );
    Ok(transition)
}

// ────────────────────────────────────────────────────────────────────────────
// Candidates
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/candidates
pub async fn handle_list_candidates(State(state): State<AppState>) -> Json<Vec<CandidateSummary>> {
    let session = state.session.lock().await;
    Json(
        session
            .candidates
            .list_all()
            .iter()
            .map(|c| CandidateSummary {
                stage: session.tracker.current_stage(c.id),
                candidate: c.clone(),
            })
            .collect(),
    )
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<CandidateId>,
) -> Result<Json<CandidateDetail>, AppError> {
    let session = state.session.lock().await;
    let candidate = session.candidates.get(id).cloned().ok_or_else(|| not_found(id))?;

    let assessments = session
        .assessments
        .iter()
        .rev()
        .filter(|a| a.candidate_id == id)
        .cloned()
        .collect();

    Ok(Json(CandidateDetail {
        stage: session.tracker.current_stage(id),
        history: newest_first(&session, id),
        materials: session.materials.get(&id).map(MaterialsView::from),
        assessments,
        candidate,
    }))
}

/// GET /api/v1/candidates/:id/history
pub async fn handle_candidate_history(
    State(state): State<AppState>,
    Path(id): Path<CandidateId>,
) -> Result<Json<HistoryResponse>, AppError> {
    let session = state.session.lock().await;
    if session.candidates.get(id).is_none() {
        return Err(not_found(id));
    }
    Ok(Json(HistoryResponse {
        candidate_id: id,
        stage: session.tracker.current_stage(id),
        history: newest_first(&session, id),
    }))
}

/// POST /api/v1/candidates/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<CandidateId>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<TransitionResponse>, AppError> {
    let to_stage: PipelineStage = req.stage.parse()?;
    let mut session = state.session.lock().await;
    let transition = apply_transition(&mut session, id, to_stage, req.note)?;
    Ok(Json(TransitionResponse {
        candidate_id: id,
        transition,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline board and round dashboards
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/pipeline
pub async fn handle_pipeline_board(State(state): State<AppState>) -> Json<BoardResponse> {
    let session = state.session.lock().await;
    let stages = PipelineStage::ALL
        .into_iter()
        .map(|stage| StageColumn {
            stage,
            candidates: session
                .tracker
                .candidates_in_stage(&session.candidates, stage)
                .into_iter()
                .cloned()
                .collect(),
        })
        .collect();

    Json(BoardResponse {
        stages,
        summary: session.tracker.summary(&session.candidates),
    })
}

/// GET /api/v1/pipeline/rounds/:round
pub async fn handle_round_dashboard(
    State(state): State<AppState>,
    Path(round): Path<String>,
) -> Result<Json<RoundDashboard>, AppError> {
    let round: InterviewRound = round.parse()?;
    let session = state.session.lock().await;
    let candidates = session
        .tracker
        .candidates_in_stage(&session.candidates, round.waiting_stage())
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(RoundDashboard {
        round,
        display_name: round.display_name(),
        waiting_stage: round.waiting_stage(),
        pass_stage: round.pass_stage(),
        candidates,
    }))
}

/// POST /api/v1/pipeline/rounds/:round/:id/pass
pub async fn handle_round_pass(
    State(state): State<AppState>,
    Path((round, id)): Path<(String, CandidateId)>,
) -> Result<Json<TransitionResponse>, AppError> {
    let round: InterviewRound = round.parse()?;
    let mut session = state.session.lock().await;
    let transition = apply_transition(&mut session, id, round.pass_stage(), round.pass_note())?;
    Ok(Json(TransitionResponse {
        candidate_id: id,
        transition,
    }))
}

/// POST /api/v1/pipeline/rounds/:round/:id/fail
pub async fn handle_round_fail(
    State(state): State<AppState>,
    Path((round, id)): Path<(String, CandidateId)>,
) -> Result<Json<TransitionResponse>, AppError> {
    let round: InterviewRound = round.parse()?;
    let mut session = state.session.lock().await;
    let transition =
        apply_transition(&mut session, id, PipelineStage::Rejected, round.fail_note())?;
    Ok(Json(TransitionResponse {
        candidate_id: id,
        transition,
    }))
}

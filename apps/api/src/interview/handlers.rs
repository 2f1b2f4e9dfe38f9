use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::feedback::archive::ExternalStatus;
use crate::interview::format::{
    format_assessment, format_coding_problems, AssessmentQuestion, CodingProblem, Formatted,
};
use crate::interview::materials::{
    generate_coding_problems, generate_quick_assessment, self_evaluate, ProgrammingLanguage,
    RoundQuestion, SelfEvaluation,
};
use crate::pipeline::round::{InterviewRound, NextRound};
use crate::pipeline::store::{CandidateId, CandidateRecord};
use crate::session::PrepMaterials;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Views
// ────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RoundCodingView {
    pub title: String,
    pub skill: String,
    pub raw: String,
    pub formatted: Formatted<CodingProblem>,
}

#[derive(Serialize)]
pub struct RoundView {
    pub round: InterviewRound,
    pub display_name: &'static str,
    pub questions: Vec<RoundQuestion>,
    pub coding: Vec<RoundCodingView>,
}

/// Stored material with the formatting layer applied.
#[derive(Serialize)]
pub struct MaterialsView {
    pub external_status: ExternalStatus,
    pub next_round: NextRound,
    pub next_round_message: &'static str,
    pub round: Option<RoundView>,
    pub brief: Option<String>,
    pub quick_assessment: Option<Formatted<AssessmentQuestion>>,
    pub self_evaluation: Option<SelfEvaluation>,
}

impl From<&PrepMaterials> for MaterialsView {
    fn from(materials: &PrepMaterials) -> Self {
        Self {
            external_status: materials.external_status.clone(),
            next_round: materials.next_round,
            next_round_message: materials.next_round.message(),
            round: materials.round.as_ref().map(|round| RoundView {
                round: round.round,
                display_name: round.round.display_name(),
                questions: round.questions.clone(),
                coding: round
                    .coding
                    .iter()
                    .map(|p| RoundCodingView {
                        title: p.title.clone(),
                        skill: p.skill.clone(),
                        raw: p.content.clone(),
                        formatted: format_coding_problems(&p.content),
                    })
                    .collect(),
            }),
            brief: materials.brief.clone(),
            quick_assessment: materials.quick_assessment.as_deref().map(format_assessment),
            self_evaluation: materials.self_evaluation,
        }
    }
}

#[derive(Serialize)]
pub struct QuickAssessmentResponse {
    pub candidate_id: CandidateId,
    pub raw: String,
    pub formatted: Formatted<AssessmentQuestion>,
}

#[derive(Deserialize)]
pub struct CodingProblemsRequest {
    pub language: String,
}

#[derive(Serialize)]
pub struct CodingProblemsResponse {
    pub candidate_id: CandidateId,
    pub language: ProgrammingLanguage,
    pub cached: bool,
    pub raw: String,
    pub formatted: Formatted<CodingProblem>,
}

#[derive(Serialize)]
pub struct SelfEvaluationResponse {
    pub candidate_id: CandidateId,
    pub evaluated_outputs: usize,
    pub evaluation: SelfEvaluation,
}

async fn candidate_snapshot(state: &AppState, id: CandidateId) -> Result<CandidateRecord, AppError> {
    state
        .session
        .lock()
        .await
        .candidates
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("candidate {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/candidates/:id/assessment-questions
pub async fn handle_assessment_questions(
    State(state): State<AppState>,
    Path(id): Path<CandidateId>,
) -> Result<Json<QuickAssessmentResponse>, AppError> {
    let candidate = candidate_snapshot(&state, id).await?;

    let raw = generate_quick_assessment(
        state.generator.as_ref(),
        &candidate.domain,
        &candidate.skills,
        candidate.experience_years,
    )
    .await?;
    info!("Generated quick assessment for candidate {}", id);

    if let Some(materials) = state.session.lock().await.materials.get_mut(&id) {
        materials.quick_assessment = Some(raw.clone());
    }

    Ok(Json(QuickAssessmentResponse {
        candidate_id: id,
        formatted: format_assessment(&raw),
        raw,
    }))
}

/// POST /api/v1/candidates/:id/coding-problems
/// Results are cached per (candidate, language) for the session.
pub async fn handle_coding_problems(
    State(state): State<AppState>,
    Path(id): Path<CandidateId>,
    Json(req): Json<CodingProblemsRequest>,
) -> Result<Json<CodingProblemsResponse>, AppError> {
    let language: ProgrammingLanguage = req.language.parse()?;
    let candidate = candidate_snapshot(&state, id).await?;

    let cached = state
        .session
        .lock()
        .await
        .coding_problems
        .get(&(id, language))
        .cloned();

    let (raw, was_cached) = match cached {
        Some(raw) => (raw, true),
        None => {
            let raw = generate_coding_problems(
                state.generator.as_ref(),
                &candidate.domain,
                &candidate.skills,
                candidate.experience_years,
                language,
            )
            .await?;
            state
                .session
                .lock()
                .await
                .coding_problems
                .insert((id, language), raw.clone());
            (raw, false)
        }
    };

    Ok(Json(CodingProblemsResponse {
        candidate_id: id,
        language,
        cached: was_cached,
        formatted: format_coding_problems(&raw),
        raw,
    }))
}

/// POST /api/v1/candidates/:id/self-evaluation
pub async fn handle_self_evaluation(
    State(state): State<AppState>,
    Path(id): Path<CandidateId>,
) -> Result<Json<SelfEvaluationResponse>, AppError> {
    let outputs = {
        let session = state.session.lock().await;
        if session.candidates.get(id).is_none() {
            return Err(AppError::NotFound(format!("candidate {id} not found")));
        }
        session.generated_outputs(id)
    };

    let evaluation = self_evaluate(state.generator.as_ref(), &outputs).await?;
    info!(
        "Self-evaluation for candidate {}: accuracy {}, helpfulness {}, relevance {}, clarity {}",
        id, evaluation.accuracy, evaluation.helpfulness, evaluation.relevance, evaluation.clarity
    );

    if let Some(materials) = state.session.lock().await.materials.get_mut(&id) {
        materials.self_evaluation = Some(evaluation);
    }

    Ok(Json(SelfEvaluationResponse {
        candidate_id: id,
        evaluated_outputs: outputs.iter().filter(|(_, text)| !text.trim().is_empty()).count(),
        evaluation,
    }))
}

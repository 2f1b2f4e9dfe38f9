pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::feedback::handlers as feedback;
use crate::interview::handlers as interview;
use crate::pipeline::handlers as pipeline;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume ingestion
        .route("/api/v1/resumes", get(resume::handle_list_resumes))
        .route(
            "/api/v1/resumes/upload",
            post(resume::handle_upload_resume)
                .layer(DefaultBodyLimit::max(resume::MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/resumes/import", post(resume::handle_import_resume))
        // Candidates
        .route("/api/v1/candidates", get(pipeline::handle_list_candidates))
        .route("/api/v1/candidates/:id", get(pipeline::handle_get_candidate))
        .route(
            "/api/v1/candidates/:id/history",
            get(pipeline::handle_candidate_history),
        )
        .route(
            "/api/v1/candidates/:id/status",
            post(pipeline::handle_update_status),
        )
        // Interview material
        .route(
            "/api/v1/candidates/:id/assessment-questions",
            post(interview::handle_assessment_questions),
        )
        .route(
            "/api/v1/candidates/:id/coding-problems",
            post(interview::handle_coding_problems),
        )
        .route(
            "/api/v1/candidates/:id/self-evaluation",
            post(interview::handle_self_evaluation),
        )
        // Feedback
        .route(
            "/api/v1/candidates/:id/feedback",
            post(feedback::handle_submit_feedback),
        )
        .route("/api/v1/assessments", get(feedback::handle_list_assessments))
        // Pipeline
        .route("/api/v1/pipeline", get(pipeline::handle_pipeline_board))
        .route(
            "/api/v1/pipeline/rounds/:round",
            get(pipeline::handle_round_dashboard),
        )
        .route(
            "/api/v1/pipeline/rounds/:round/:id/pass",
            post(pipeline::handle_round_pass),
        )
        .route(
            "/api/v1/pipeline/rounds/:round/:id/fail",
            post(pipeline::handle_round_fail),
        )
        .with_state(state)
}

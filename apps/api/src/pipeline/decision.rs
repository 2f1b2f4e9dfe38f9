use crate::pipeline::stage::PipelineStage;

/// Decision labels an interviewer can record, with the stage each one implies.
pub const DECISION_STAGES: [(&str, PipelineStage); 5] = [
    ("Strong Hire", PipelineStage::Offered),
    ("Hire", PipelineStage::L3Cleared),
    ("Maybe", PipelineStage::OnHold),
    ("No Hire", PipelineStage::Rejected),
    ("Strong No Hire", PipelineStage::Rejected),
];

/// Maps a final decision label to its target stage.
/// Labels outside `DECISION_STAGES` (exact match) map to `Ready for Evaluation`.
pub fn stage_for_decision(decision: &str) -> PipelineStage {
    DECISION_STAGES
        .iter()
        .find(|(label, _)| *label == decision)
        .map(|(_, stage)| *stage)
        .unwrap_or(PipelineStage::ReadyForEvaluation)
}

pub fn decision_note(decision: &str) -> String {
    format!("Assessment completed: {decision}")
}

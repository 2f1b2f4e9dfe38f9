//! Process-lifetime interview session: every piece of mutable state the
//! service keeps, owned by one value and shared through `AppState`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::feedback::archive::ExternalStatus;
use crate::feedback::assessment::{AssessmentRecord, AssessmentSubmission};
use crate::interview::materials::{ProgrammingLanguage, RoundMaterials, SelfEvaluation};
use crate::pipeline::decision::{decision_note, stage_for_decision};
use crate::pipeline::round::NextRound;
use crate::pipeline::store::{CandidateId, CandidateStore};
use crate::pipeline::tracker::{StatusTracker, StatusTransition};

/// Generated material kept for one candidate.
#[derive(Debug, Clone, Serialize)]
pub struct PrepMaterials {
    pub external_status: ExternalStatus,
    pub next_round: NextRound,
    pub round: Option<RoundMaterials>,
    pub brief: Option<String>,
    pub quick_assessment: Option<String>,
    pub self_evaluation: Option<SelfEvaluation>,
}

impl PrepMaterials {
    pub fn new(external_status: ExternalStatus, next_round: NextRound) -> Self {
        Self {
            external_status,
            next_round,
            round: None,
            brief: None,
            quick_assessment: None,
            self_evaluation: None,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    pub candidates: CandidateStore,
    pub tracker: StatusTracker,
    pub assessments: Vec<AssessmentRecord>,
    pub materials: HashMap<CandidateId, PrepMaterials>,
    pub coding_problems: HashMap<(CandidateId, ProgrammingLanguage), String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            candidates: CandidateStore::new(),
            tracker: StatusTracker::new(),
            assessments: Vec::new(),
            materials: HashMap::new(),
            coding_problems: HashMap::new(),
        }
    }

    /// Records an assessment and applies the stage its decision maps to.
    /// Returns `None` for an unknown candidate.
    pub fn record_assessment(
        &mut self,
        id: CandidateId,
        submission: AssessmentSubmission,
        timestamp: DateTime<Utc>,
    ) -> Option<(AssessmentRecord, StatusTransition)> {
        let name = self.candidates.get(id)?.name.clone();
        let record = AssessmentRecord::new(id, &name, submission, timestamp);

        let to_stage = stage_for_decision(&record.decision);
        let transition = self
            .tracker
            .transition(id, to_stage, decision_note(&record.decision))
            .clone();
        self.assessments.push(record.clone());
        Some((record, transition))
    }

    /// Labelled generator outputs for one candidate, in display order.
    pub fn generated_outputs(&self, id: CandidateId) -> Vec<(String, String)> {
        let mut outputs = Vec::new();

        if let Some(materials) = self.materials.get(&id) {
            if let Some(brief) = &materials.brief {
                outputs.push(("Interviewer Brief".to_string(), brief.clone()));
            }
            if let Some(round) = &materials.round {
                for (i, q) in round.questions.iter().enumerate() {
                    outputs.push((
                        format!("{} Question {}", round.round, i + 1),
                        format!("{}\n\nModel answer:\n{}", q.question, q.model_answer),
                    ));
                }
                for problem in &round.coding {
                    outputs.push((problem.title.clone(), problem.content.clone()));
                }
            }
            if let Some(assessment) = &materials.quick_assessment {
                outputs.push(("Quick Assessment".to_string(), assessment.clone()));
            }
        }

        for language in ProgrammingLanguage::ALL {
            if let Some(problems) = self.coding_problems.get(&(id, language)) {
                outputs.push((format!("{language} Coding Problems"), problems.clone()));
            }
        }
        outputs
    }
}

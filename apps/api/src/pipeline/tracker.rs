//! Status Tracker: current pipeline stage per candidate plus an append-only
//! audit trail of every transition.
//!
//! The current stage is always derived from the last recorded transition
//! (`Screening` when there is none), so the two can never disagree.
//!
//! Any stage may be reached from any stage. There is deliberately no
//! source/target compatibility check; see DESIGN.md.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::pipeline::stage::PipelineStage;
use crate::pipeline::store::{CandidateId, CandidateRecord, CandidateStore};

/// A recorded change from one stage to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusTransition {
    pub from_stage: PipelineStage,
    pub to_stage: PipelineStage,
    pub timestamp: DateTime<Utc>,
    pub note: String,
}

#[derive(Debug, Default)]
pub struct StatusTracker {
    history: HashMap<CandidateId, Vec<StatusTransition>>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_stage(&self, id: CandidateId) -> PipelineStage {
        self.history
            .get(&id)
            .and_then(|log| log.last())
            .map(|t| t.to_stage)
            .unwrap_or_default()
    }

    /// Appends a transition from the current stage to `to_stage`. Never fails.
    pub fn transition(
        &mut self,
        id: CandidateId,
        to_stage: PipelineStage,
        note: impl Into<String>,
    ) -> &StatusTransition {
        let from_stage = self.current_stage(id);
        let note = note.into();
        info!("Candidate {id}: {from_stage} -> {to_stage}");

        let log = self.history.entry(id).or_default();
        log.push(StatusTransition {
            from_stage,
            to_stage,
            timestamp: Utc::now(),
            note,
        });
        &log[log.len() - 1]
    }

    /// Transitions for `id`, oldest first.
    pub fn history(&self, id: CandidateId) -> &[StatusTransition] {
        self.history.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Candidates whose current stage is `stage`, in creation order.
    pub fn candidates_in_stage<'a>(
        &self,
        store: &'a CandidateStore,
        stage: PipelineStage,
    ) -> Vec<&'a CandidateRecord> {
        store
            .list_all()
            .iter()
            .filter(|c| self.current_stage(c.id) == stage)
            .collect()
    }

    pub fn summary(&self, store: &CandidateStore) -> PipelineSummary {
        let stage_counts: Vec<StageCount> = PipelineStage::ALL
            .into_iter()
            .map(|stage| StageCount {
                stage,
                count: self.candidates_in_stage(store, stage).len(),
            })
            .collect();
        let count_of = |stage: PipelineStage| {
            stage_counts
                .iter()
                .find(|c| c.stage == stage)
                .map(|c| c.count)
                .unwrap_or(0)
        };

        let total = store.len();
        let offered = count_of(PipelineStage::Offered);
        let rejected = count_of(PipelineStage::Rejected);
        let successful = count_of(PipelineStage::L3Cleared) + offered;

        PipelineSummary {
            total,
            in_progress: total - offered - rejected,
            offered,
            rejected,
            success_rate: percentage(successful, total),
            rejection_rate: percentage(rejected, total),
            stage_counts,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StageCount {
    pub stage: PipelineStage,
    pub count: usize,
}

/// Headline pipeline metrics. Rates are percentages of `total`, 0 when empty.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub total: usize,
    pub in_progress: usize,
    pub offered: usize,
    pub rejected: usize,
    pub success_rate: f64,
    pub rejection_rate: f64,
    pub stage_counts: Vec<StageCount>,
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

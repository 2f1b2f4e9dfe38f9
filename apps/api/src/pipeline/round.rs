//! Interview rounds: the per-round dashboards and the mapping from an
//! externally recorded status label to the round to run next.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::pipeline::stage::PipelineStage;

/// Status reported when the feedback archive has nothing usable for a candidate.
pub const DEFAULT_EXTERNAL_STATUS: &str = "Need to go with L1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterviewRound {
    L1,
    L2,
    L3,
}

impl InterviewRound {
    pub const fn label(self) -> &'static str {
        match self {
            InterviewRound::L1 => "L1",
            InterviewRound::L2 => "L2",
            InterviewRound::L3 => "L3",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            InterviewRound::L1 => "L1 Technical Round",
            InterviewRound::L2 => "L2 Technical Round",
            InterviewRound::L3 => "L3 Technical Round",
        }
    }

    /// Stage whose candidates are waiting for this round.
    pub const fn waiting_stage(self) -> PipelineStage {
        match self {
            InterviewRound::L1 => PipelineStage::Screening,
            InterviewRound::L2 => PipelineStage::ReadyForEvaluation,
            InterviewRound::L3 => PipelineStage::L1Cleared,
        }
    }

    /// Stage a candidate moves to after passing this round.
    pub const fn pass_stage(self) -> PipelineStage {
        match self {
            InterviewRound::L1 => PipelineStage::ReadyForEvaluation,
            InterviewRound::L2 => PipelineStage::L1Cleared,
            InterviewRound::L3 => PipelineStage::L2Cleared,
        }
    }

    pub fn pass_note(self) -> String {
        format!("Passed {}", self.display_name())
    }

    pub fn fail_note(self) -> String {
        format!("Did not pass {}", self.display_name())
    }
}

impl fmt::Display for InterviewRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown interview round '{0}' (expected L1, L2 or L3)")]
pub struct UnknownRound(pub String);

impl FromStr for InterviewRound {
    type Err = UnknownRound;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L1" => Ok(InterviewRound::L1),
            "L2" => Ok(InterviewRound::L2),
            "L3" => Ok(InterviewRound::L3),
            _ => Err(UnknownRound(s.to_string())),
        }
    }
}

/// What to do next for a candidate, given their externally recorded status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "round", rename_all = "snake_case")]
pub enum NextRound {
    Round(InterviewRound),
    Complete,
}

impl NextRound {
    /// Prefix rule: `L1*` → L2, `L2*` → L3, `L3*` → complete, anything else → L1.
    pub fn from_external_status(status: &str) -> Self {
        let status = status.trim();
        if status.starts_with("L1") {
            NextRound::Round(InterviewRound::L2)
        } else if status.starts_with("L2") {
            NextRound::Round(InterviewRound::L3)
        } else if status.starts_with("L3") {
            NextRound::Complete
        } else {
            NextRound::Round(InterviewRound::L1)
        }
    }

    /// Round whose material should be prepared. A completed pipeline prepares
    /// final-round material for any follow-up conversation.
    pub fn material_round(self) -> InterviewRound {
        match self {
            NextRound::Round(round) => round,
            NextRound::Complete => InterviewRound::L3,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            NextRound::Round(InterviewRound::L1) => {
                "Please go with the L1 round for this candidate."
            }
            NextRound::Round(InterviewRound::L2) => {
                "You have to take the L2 round for this candidate."
            }
            NextRound::Round(InterviewRound::L3) => {
                "You have to take the L3 round for this candidate."
            }
            NextRound::Complete => "All rounds completed. You can proceed to feedback or offer.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_resolves_to_l1() {
        assert_eq!(
            NextRound::from_external_status(DEFAULT_EXTERNAL_STATUS),
            NextRound::Round(InterviewRound::L1)
        );
    }

    #[test]
    fn test_prefix_rule() {
        assert_eq!(
            NextRound::from_external_status("L1 completed"),
            NextRound::Round(InterviewRound::L2)
        );
        assert_eq!(
            NextRound::from_external_status("L2 completed"),
            NextRound::Round(InterviewRound::L3)
        );
        assert_eq!(
            NextRound::from_external_status("L3 completed"),
            NextRound::Complete
        );
        assert_eq!(
            NextRound::from_external_status("Unknown"),
            NextRound::Round(InterviewRound::L1)
        );
        assert_eq!(
            NextRound::from_external_status(""),
            NextRound::Round(InterviewRound::L1)
        );
    }

    #[test]
    fn test_prefix_rule_is_case_sensitive() {
        assert_eq!(
            NextRound::from_external_status("l2 completed"),
            NextRound::Round(InterviewRound::L1)
        );
    }

    #[test]
    fn test_complete_prepares_final_round_material() {
        assert_eq!(NextRound::Complete.material_round(), InterviewRound::L3);
    }

    #[test]
    fn test_round_dashboard_stages() {
        assert_eq!(InterviewRound::L1.waiting_stage(), PipelineStage::Screening);
        assert_eq!(
            InterviewRound::L1.pass_stage(),
            PipelineStage::ReadyForEvaluation
        );
        assert_eq!(
            InterviewRound::L2.waiting_stage(),
            PipelineStage::ReadyForEvaluation
        );
        assert_eq!(InterviewRound::L2.pass_stage(), PipelineStage::L1Cleared);
        assert_eq!(InterviewRound::L3.waiting_stage(), PipelineStage::L1Cleared);
        assert_eq!(InterviewRound::L3.pass_stage(), PipelineStage::L2Cleared);
    }

    #[test]
    fn test_round_notes() {
        assert_eq!(InterviewRound::L2.pass_note(), "Passed L2 Technical Round");
        assert_eq!(
            InterviewRound::L1.fail_note(),
            "Did not pass L1 Technical Round"
        );
    }

    #[test]
    fn test_round_from_str() {
        assert_eq!("l3".parse::<InterviewRound>().unwrap(), InterviewRound::L3);
        assert!("L4".parse::<InterviewRound>().is_err());
    }

    #[test]
    fn test_next_round_serializes_tagged() {
        let json = serde_json::to_value(NextRound::Round(InterviewRound::L2)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "round", "round": "L2"}));
        let json = serde_json::to_value(NextRound::Complete).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "complete"}));
    }
}

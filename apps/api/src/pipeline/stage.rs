use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One named step of the interview pipeline.
///
/// Declaration order is the board order. It reflects seniority intent only;
/// the tracker does not enforce it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineStage {
    #[default]
    #[serde(rename = "Screening")]
    Screening,
    #[serde(rename = "Ready for Evaluation")]
    ReadyForEvaluation,
    #[serde(rename = "L1 Cleared")]
    L1Cleared,
    #[serde(rename = "L2 Cleared")]
    L2Cleared,
    #[serde(rename = "L3 Cleared")]
    L3Cleared,
    #[serde(rename = "Offered")]
    Offered,
    #[serde(rename = "Rejected")]
    Rejected,
    #[serde(rename = "On Hold")]
    OnHold,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 8] = [
        PipelineStage::Screening,
        PipelineStage::ReadyForEvaluation,
        PipelineStage::L1Cleared,
        PipelineStage::L2Cleared,
        PipelineStage::L3Cleared,
        PipelineStage::Offered,
        PipelineStage::Rejected,
        PipelineStage::OnHold,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            PipelineStage::Screening => "Screening",
            PipelineStage::ReadyForEvaluation => "Ready for Evaluation",
            PipelineStage::L1Cleared => "L1 Cleared",
            PipelineStage::L2Cleared => "L2 Cleared",
            PipelineStage::L3Cleared => "L3 Cleared",
            PipelineStage::Offered => "Offered",
            PipelineStage::Rejected => "Rejected",
            PipelineStage::OnHold => "On Hold",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pipeline stage '{0}'")]
pub struct UnknownStage(pub String);

impl FromStr for PipelineStage {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PipelineStage::ALL
            .into_iter()
            .find(|stage| stage.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownStage(s.to_string()))
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::store::CandidateId;

/// Timestamp format used in the feedback archive.
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error, PartialEq)]
pub enum AssessmentError {
    #[error("{field} rating must be between 1 and 5, got {value}")]
    RatingOutOfRange { field: &'static str, value: i64 },

    #[error("decision label cannot be empty")]
    EmptyDecision,
}

/// Five sub-ratings, each 1 to 5. Deserialized wide so any integer reaches
/// `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratings {
    pub technical: i64,
    pub communication: i64,
    pub problem_solving: i64,
    pub culture_fit: i64,
    pub coding: i64,
}

impl Ratings {
    fn fields(&self) -> [(&'static str, i64); 5] {
        [
            ("technical", self.technical),
            ("communication", self.communication),
            ("problem_solving", self.problem_solving),
            ("culture_fit", self.culture_fit),
            ("coding", self.coding),
        ]
    }

    pub fn validate(&self) -> Result<(), AssessmentError> {
        for (field, value) in self.fields() {
            if !(1..=5).contains(&value) {
                return Err(AssessmentError::RatingOutOfRange { field, value });
            }
        }
        Ok(())
    }

    pub fn mean(&self) -> f64 {
        let fields = self.fields();
        fields.iter().map(|(_, v)| *v as f64).sum::<f64>() / fields.len() as f64
    }
}

/// Interviewer input for one feedback submission.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentSubmission {
    /// Round label recorded in the archive, e.g. "L2 completed".
    pub candidate_status: String,
    pub ratings: Ratings,
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub concerns: String,
    #[serde(default)]
    pub coding_feedback: String,
    pub decision: String,
    #[serde(default)]
    pub notes: String,
}

impl AssessmentSubmission {
    pub fn validate(&self) -> Result<(), AssessmentError> {
        self.ratings.validate()?;
        if self.decision.trim().is_empty() {
            return Err(AssessmentError::EmptyDecision);
        }
        Ok(())
    }
}

/// One recorded assessment. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentRecord {
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub candidate_status: String,
    pub ratings: Ratings,
    pub strengths: String,
    pub concerns: String,
    pub coding_feedback: String,
    pub decision: String,
    pub notes: String,
    pub timestamp: DateTime<Utc>,
}

impl AssessmentRecord {
    pub fn new(
        candidate_id: CandidateId,
        candidate_name: &str,
        submission: AssessmentSubmission,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let AssessmentSubmission {
            candidate_status,
            ratings,
            strengths,
            concerns,
            coding_feedback,
            decision,
            notes,
        } = submission;

        Self {
            candidate_id,
            candidate_name: candidate_name.to_string(),
            candidate_status,
            ratings,
            strengths,
            concerns,
            coding_feedback,
            decision,
            notes,
            timestamp,
        }
    }

    /// Flattens the record into an archive row. Line breaks in free text become spaces.
    pub fn to_archive_row(&self) -> ArchiveRow {
        ArchiveRow {
            candidate_id: self.candidate_id.to_string(),
            candidate_name: self.candidate_name.clone(),
            candidate_status: self.candidate_status.clone(),
            timestamp: self.timestamp.format(ARCHIVE_TIMESTAMP_FORMAT).to_string(),
            technical_rating: self.ratings.technical.to_string(),
            communication_rating: self.ratings.communication.to_string(),
            problem_solving_rating: self.ratings.problem_solving.to_string(),
            culture_fit_rating: self.ratings.culture_fit.to_string(),
            coding_rating: self.ratings.coding.to_string(),
            strengths: single_line(&self.strengths),
            concerns: single_line(&self.concerns),
            coding_feedback: single_line(&self.coding_feedback),
            decision: self.decision.clone(),
            notes: single_line(&self.notes),
        }
    }
}

/// One row of the feedback archive, column names as stored.
///
/// Fields are kept as text so rows written by other tools still load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveRow {
    pub candidate_id: String,
    pub candidate_name: String,
    pub candidate_status: String,
    pub timestamp: String,
    pub technical_rating: String,
    pub communication_rating: String,
    pub problem_solving_rating: String,
    pub culture_fit_rating: String,
    pub coding_rating: String,
    pub strengths: String,
    pub concerns: String,
    pub coding_feedback: String,
    pub decision: String,
    pub notes: String,
}

impl ArchiveRow {
    /// Sheet header, in column order.
    pub const COLUMNS: [&'static str; 14] = [
        "candidate_id",
        "candidate_name",
        "candidate_status",
        "timestamp",
        "technical_rating",
        "communication_rating",
        "problem_solving_rating",
        "culture_fit_rating",
        "coding_rating",
        "strengths",
        "concerns",
        "coding_feedback",
        "decision",
        "notes",
    ];

    /// Columns holding numbers in the sheet.
    pub const NUMERIC_COLUMNS: [&'static str; 6] = [
        "candidate_id",
        "technical_rating",
        "communication_rating",
        "problem_solving_rating",
        "culture_fit_rating",
        "coding_rating",
    ];

    /// Cell values in `COLUMNS` order.
    pub fn values(&self) -> [&str; 14] {
        [
            &self.candidate_id,
            &self.candidate_name,
            &self.candidate_status,
            &self.timestamp,
            &self.technical_rating,
            &self.communication_rating,
            &self.problem_solving_rating,
            &self.culture_fit_rating,
            &self.coding_rating,
            &self.strengths,
            &self.concerns,
            &self.coding_feedback,
            &self.decision,
            &self.notes,
        ]
    }

    /// Field for a header name. Unknown headers are `None`.
    pub fn column_mut(&mut self, column: &str) -> Option<&mut String> {
        let field = match column {
            "candidate_id" => &mut self.candidate_id,
            "candidate_name" => &mut self.candidate_name,
            "candidate_status" => &mut self.candidate_status,
            "timestamp" => &mut self.timestamp,
            "technical_rating" => &mut self.technical_rating,
            "communication_rating" => &mut self.communication_rating,
            "problem_solving_rating" => &mut self.problem_solving_rating,
            "culture_fit_rating" => &mut self.culture_fit_rating,
            "coding_rating" => &mut self.coding_rating,
            "strengths" => &mut self.strengths,
            "concerns" => &mut self.concerns,
            "coding_feedback" => &mut self.coding_feedback,
            "decision" => &mut self.decision,
            "notes" => &mut self.notes,
            _ => return None,
        };
        Some(field)
    }
}

fn single_line(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

#[cfg(test)]
pub(crate) fn sample_submission(decision: &str) -> AssessmentSubmission {
    AssessmentSubmission {
        candidate_status: "L1 completed".to_string(),
        ratings: Ratings {
            technical: 4,
            communication: 5,
            problem_solving: 4,
            culture_fit: 3,
            coding: 4,
        },
        strengths: "Clear reasoning\nstrong Rust".to_string(),
        concerns: "Limited ops exposure".to_string(),
        coding_feedback: "Solved both problems".to_string(),
        decision: decision.to_string(),
        notes: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_ratings_in_range_validate() {
        assert!(sample_submission("Hire").validate().is_ok());
    }

    #[test]
    fn test_rating_out_of_range_is_rejected() {
        let mut submission = sample_submission("Hire");
        submission.ratings.culture_fit = 0;
        assert_eq!(
            submission.validate(),
            Err(AssessmentError::RatingOutOfRange {
                field: "culture_fit",
                value: 0
            })
        );
        submission.ratings.culture_fit = 6;
        assert!(submission.validate().is_err());
        submission.ratings.culture_fit = 4;
        submission.ratings.technical = 300;
        assert_eq!(
            submission.validate(),
            Err(AssessmentError::RatingOutOfRange {
                field: "technical",
                value: 300
            })
        );
    }

    #[test]
    fn test_empty_decision_is_rejected() {
        assert_eq!(
            sample_submission("  ").validate(),
            Err(AssessmentError::EmptyDecision)
        );
    }

    #[test]
    fn test_mean_rating() {
        let ratings = sample_submission("Hire").ratings;
        assert!((ratings.mean() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_archive_row_flattens_record() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        let record =
            AssessmentRecord::new(CandidateId(3), "Jane Doe", sample_submission("Hire"), at);
        let row = record.to_archive_row();

        assert_eq!(row.candidate_id, "3");
        assert_eq!(row.candidate_status, "L1 completed");
        assert_eq!(row.timestamp, "2024-03-09 14:05:00");
        assert_eq!(row.communication_rating, "5");
        assert_eq!(row.strengths, "Clear reasoning strong Rust");
        assert_eq!(row.decision, "Hire");
    }

    #[test]
    fn test_archive_row_columns_line_up() {
        let mut row = ArchiveRow::default();
        for (i, column) in ArchiveRow::COLUMNS.iter().enumerate() {
            *row.column_mut(column).unwrap() = i.to_string();
        }
        let values: Vec<String> = (0..14).map(|i| i.to_string()).collect();
        assert_eq!(row.values().to_vec(), values);
        assert!(row.column_mut("Unnamed: 0").is_none());
    }

    #[test]
    fn test_single_line_replaces_carriage_returns() {
        assert_eq!(single_line("a\r\nb"), "a  b");
    }
}

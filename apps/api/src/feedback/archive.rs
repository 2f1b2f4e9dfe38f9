//! Shared feedback archive: one xlsx workbook in object storage, first sheet,
//! header row plus one row per assessment.
//!
//! The archive is read as a whole and rewritten on append. Concurrent writers
//! can lose rows; callers treat the archive as best-effort.

use std::io::Cursor;
use std::sync::Arc;

use calamine::{open_workbook_from_rs, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::feedback::assessment::ArchiveRow;
use crate::pipeline::round::DEFAULT_EXTERNAL_STATUS;
use crate::storage::{ObjectStore, StorageError};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Status reported for a matched row whose status column is blank.
const UNKNOWN_STATUS: &str = "Unknown";

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("feedback bucket is not configured (set S3_BUCKET_FEEDBACK)")]
    NotConfigured,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("feedback archive is not a readable workbook: {0}")]
    Decode(#[from] calamine::XlsxError),

    #[error("feedback archive could not be written: {0}")]
    Encode(#[from] rust_xlsxwriter::XlsxError),
}

/// Result of looking a candidate up in the archive. Lookup never fails; every
/// problem degrades to the default status with a reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalStatus {
    pub status: String,
    pub reason: String,
    pub found: bool,
}

impl ExternalStatus {
    fn fallback(reason: impl Into<String>) -> Self {
        Self {
            status: DEFAULT_EXTERNAL_STATUS.to_string(),
            reason: reason.into(),
            found: false,
        }
    }
}

#[derive(Clone)]
pub struct FeedbackArchive {
    store: Arc<dyn ObjectStore>,
    bucket: Option<String>,
    key: String,
}

impl FeedbackArchive {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: Option<String>, key: impl Into<String>) -> Self {
        Self {
            store,
            bucket,
            key: key.into(),
        }
    }

    pub fn location(&self) -> Option<String> {
        self.bucket.as_ref().map(|b| format!("s3://{b}/{}", self.key))
    }

    /// All rows, or `None` when the archive object does not exist yet.
    pub async fn read_rows(&self) -> Result<Option<Vec<ArchiveRow>>, ArchiveError> {
        let bucket = self.bucket.as_deref().ok_or(ArchiveError::NotConfigured)?;
        match self.store.get(bucket, &self.key).await? {
            Some(body) => Ok(Some(decode_rows(&body)?)),
            None => Ok(None),
        }
    }

    /// Appends one row, creating the archive when absent. Returns the row count
    /// after the write.
    pub async fn append(&self, row: ArchiveRow) -> Result<usize, ArchiveError> {
        let bucket = self.bucket.as_deref().ok_or(ArchiveError::NotConfigured)?;
        let mut rows = self.read_rows().await?.unwrap_or_default();
        rows.push(row);

        let body = encode_rows(&rows)?;
        self.store
            .put(bucket, &self.key, body, XLSX_CONTENT_TYPE)
            .await?;

        info!(
            "Appended feedback row to s3://{}/{} ({} rows)",
            bucket,
            self.key,
            rows.len()
        );
        Ok(rows.len())
    }

    /// Latest recorded status for `candidate_name`, matched on trimmed,
    /// case-insensitive name. The last matching row wins.
    pub async fn lookup_status(&self, candidate_name: &str) -> ExternalStatus {
        let wanted = candidate_name.trim().to_lowercase();
        if wanted.is_empty() {
            return ExternalStatus::fallback("Candidate name is empty");
        }

        let rows = match self.read_rows().await {
            Ok(Some(rows)) => rows,
            Ok(None) => return ExternalStatus::fallback("Feedback file does not exist yet"),
            Err(ArchiveError::NotConfigured) => {
                return ExternalStatus::fallback("S3_BUCKET_FEEDBACK environment variable not set")
            }
            Err(e) => {
                warn!("Feedback archive lookup for '{}' failed: {}", candidate_name, e);
                return ExternalStatus::fallback(format!("Error accessing feedback file: {e}"));
            }
        };

        let latest = rows
            .iter()
            .rev()
            .find(|row| row.candidate_name.trim().to_lowercase() == wanted);

        match latest {
            Some(row) => {
                let status = &row.candidate_status;
                ExternalStatus {
                    status: if status.trim().is_empty() {
                        UNKNOWN_STATUS.to_string()
                    } else {
                        status.clone()
                    },
                    reason: "Found in feedback records".to_string(),
                    found: true,
                }
            }
            None => ExternalStatus::fallback("Candidate not found in feedback records"),
        }
    }
}

/// Rows of the first sheet, matched to columns by header name. Missing
/// columns read as empty, unknown ones are ignored.
pub fn decode_rows(body: &[u8]) -> Result<Vec<ArchiveRow>, calamine::XlsxError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(body))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Ok(Vec::new()),
    };

    let mut sheet_rows = range.rows();
    let header: Vec<String> = match sheet_rows.next() {
        Some(cells) => cells.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => return Ok(Vec::new()),
    };

    Ok(sheet_rows
        .map(|cells| {
            let mut row = ArchiveRow::default();
            for (column, cell) in header.iter().zip(cells) {
                if let Some(field) = row.column_mut(column) {
                    *field = cell.to_string();
                }
            }
            row
        })
        .collect())
}

/// Whole workbook for `rows`. Id and rating columns are written as numbers.
pub fn encode_rows(rows: &[ArchiveRow]) -> Result<Vec<u8>, rust_xlsxwriter::XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, column) in ArchiveRow::COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *column)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let sheet_row = i as u32 + 1;
        for (col, (column, value)) in ArchiveRow::COLUMNS.iter().zip(row.values()).enumerate() {
            let col = col as u16;
            if value.is_empty() {
                continue;
            }
            match value.parse::<f64>() {
                Ok(number) if ArchiveRow::NUMERIC_COLUMNS.contains(column) => {
                    sheet.write_number(sheet_row, col, number)?;
                }
                _ => {
                    sheet.write_string(sheet_row, col, value)?;
                }
            }
        }
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testing::MemoryObjectStore;

    const BUCKET: &str = "feedback-bucket";
    const KEY: &str = "feedback/interview_feedback.xlsx";

    fn archive_over(store: Arc<MemoryObjectStore>) -> FeedbackArchive {
        FeedbackArchive::new(store, Some(BUCKET.to_string()), KEY)
    }

    fn row(name: &str, status: &str) -> ArchiveRow {
        ArchiveRow {
            candidate_id: "1".to_string(),
            candidate_name: name.to_string(),
            candidate_status: status.to_string(),
            timestamp: "2024-03-09 14:05:00".to_string(),
            technical_rating: "4".to_string(),
            communication_rating: "4".to_string(),
            problem_solving_rating: "3".to_string(),
            culture_fit_rating: "5".to_string(),
            coding_rating: "4".to_string(),
            strengths: "Systems design, with commas".to_string(),
            concerns: String::new(),
            coding_feedback: "Clean \"idiomatic\" code".to_string(),
            decision: "Proceed to next round".to_string(),
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn test_append_then_read_returns_identical_row() {
        let store = Arc::new(MemoryObjectStore::default());
        let archive = archive_over(store.clone());

        let written = row("Jane Doe", "L1 completed");
        assert_eq!(archive.append(written.clone()).await.unwrap(), 1);

        let rows = archive.read_rows().await.unwrap().unwrap();
        assert_eq!(rows, vec![written]);
        assert!(store.object(BUCKET, KEY).is_some());
    }

    #[tokio::test]
    async fn test_append_preserves_existing_rows() {
        let store = Arc::new(MemoryObjectStore::default());
        let archive = archive_over(store);

        archive.append(row("Jane Doe", "L1 completed")).await.unwrap();
        archive.append(row("John Roe", "L2 completed")).await.unwrap();
        assert_eq!(archive.append(row("Jane Doe", "L2 completed")).await.unwrap(), 3);

        let rows = archive.read_rows().await.unwrap().unwrap();
        assert_eq!(rows[1].candidate_name, "John Roe");
    }

    #[tokio::test]
    async fn test_lookup_latest_row_wins_case_insensitive() {
        let store = Arc::new(MemoryObjectStore::default());
        let archive = archive_over(store);
        archive.append(row("Jane Doe", "L1 completed")).await.unwrap();
        archive.append(row("JANE DOE ", "L2 completed")).await.unwrap();

        let status = archive.lookup_status("  jane doe").await;
        assert!(status.found);
        assert_eq!(status.status, "L2 completed");
        assert_eq!(status.reason, "Found in feedback records");
    }

    #[tokio::test]
    async fn test_lookup_blank_status_is_unknown() {
        let store = Arc::new(MemoryObjectStore::default());
        let archive = archive_over(store);
        archive.append(row("Jane Doe", "  ")).await.unwrap();

        let status = archive.lookup_status("Jane Doe").await;
        assert!(status.found);
        assert_eq!(status.status, "Unknown");
    }

    #[tokio::test]
    async fn test_lookup_missing_archive_defaults_to_l1() {
        let archive = archive_over(Arc::new(MemoryObjectStore::default()));
        let status = archive.lookup_status("Jane Doe").await;
        assert!(!status.found);
        assert_eq!(status.status, "Need to go with L1");
        assert_eq!(status.reason, "Feedback file does not exist yet");
    }

    #[tokio::test]
    async fn test_lookup_unknown_candidate_defaults_to_l1() {
        let archive = archive_over(Arc::new(MemoryObjectStore::default()));
        archive.append(row("John Roe", "L3 completed")).await.unwrap();

        let status = archive.lookup_status("Jane Doe").await;
        assert_eq!(status.status, "Need to go with L1");
        assert_eq!(status.reason, "Candidate not found in feedback records");
    }

    #[tokio::test]
    async fn test_lookup_unreadable_archive_degrades() {
        let store = MemoryObjectStore::failing_reads();
        let archive = archive_over(Arc::new(store));

        let status = archive.lookup_status("Jane Doe").await;
        assert!(!status.found);
        assert_eq!(status.status, "Need to go with L1");
        assert!(status.reason.starts_with("Error accessing feedback file"));
    }

    #[tokio::test]
    async fn test_lookup_without_bucket_degrades() {
        let archive = FeedbackArchive::new(Arc::new(MemoryObjectStore::default()), None, KEY);
        let status = archive.lookup_status("Jane Doe").await;
        assert_eq!(status.status, "Need to go with L1");
        assert!(status.reason.contains("S3_BUCKET_FEEDBACK"));
        assert!(archive.location().is_none());
    }

    #[tokio::test]
    async fn test_append_without_bucket_fails() {
        let archive = FeedbackArchive::new(Arc::new(MemoryObjectStore::default()), None, KEY);
        assert!(matches!(
            archive.append(row("Jane Doe", "L1 completed")).await,
            Err(ArchiveError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_append_write_failure_is_reported() {
        let store = MemoryObjectStore::failing_writes();
        let archive = archive_over(Arc::new(store));
        assert!(matches!(
            archive.append(row("Jane Doe", "L1 completed")).await,
            Err(ArchiveError::Storage(StorageError::Write { .. }))
        ));
    }

    #[tokio::test]
    async fn test_lookup_returns_stored_status_verbatim() {
        let archive = archive_over(Arc::new(MemoryObjectStore::default()));
        archive.append(row("Jane Doe", " L2 completed ")).await.unwrap();

        let status = archive.lookup_status("Jane Doe").await;
        assert!(status.found);
        assert_eq!(status.status, " L2 completed ");
    }

    #[tokio::test]
    async fn test_append_writes_xlsx_content_type_body() {
        let store = Arc::new(MemoryObjectStore::default());
        let archive = archive_over(store.clone());
        archive.append(row("Jane Doe", "L1 completed")).await.unwrap();

        let body = store.object(BUCKET, KEY).unwrap();
        // xlsx is a zip container
        assert_eq!(&body[..2], b"PK");
    }

    #[test]
    fn test_decode_tolerates_missing_and_unknown_columns() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Unnamed: 0").unwrap();
        sheet.write_string(0, 1, "candidate_name").unwrap();
        sheet.write_string(0, 2, "candidate_status").unwrap();
        sheet.write_number(1, 0, 0.0).unwrap();
        sheet.write_string(1, 1, "Jane Doe").unwrap();
        sheet.write_string(1, 2, "L1 completed").unwrap();
        let body = workbook.save_to_buffer().unwrap();

        let rows = decode_rows(&body).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].candidate_name, "Jane Doe");
        assert_eq!(rows[0].candidate_status, "L1 completed");
        assert_eq!(rows[0].coding_rating, "");
    }

    #[test]
    fn test_numeric_cells_read_back_as_integers() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "candidate_id").unwrap();
        sheet.write_string(0, 1, "technical_rating").unwrap();
        sheet.write_number(1, 0, 12.0).unwrap();
        sheet.write_number(1, 1, 4.0).unwrap();
        let body = workbook.save_to_buffer().unwrap();

        let rows = decode_rows(&body).unwrap();
        assert_eq!(rows[0].candidate_id, "12");
        assert_eq!(rows[0].technical_rating, "4");
    }

    #[test]
    fn test_encode_writes_header_and_numeric_ratings() {
        let body = encode_rows(&[row("A", "L1 completed"), row("B", "L2 completed")]).unwrap();

        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(&body[..])).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        let sheet: Vec<_> = range.rows().collect();
        assert_eq!(sheet.len(), 3);

        let header: Vec<String> = sheet[0].iter().map(|c| c.to_string()).collect();
        assert_eq!(header, ArchiveRow::COLUMNS);
        assert!(matches!(sheet[1][4], calamine::Data::Float(_)));
        assert_eq!(sheet[2][1].to_string(), "B");
    }
}

//! Resume bucket access: listing candidate PDFs and downloading one by key.

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

use crate::storage::{ObjectStore, StorageError};

#[derive(Debug, Error)]
pub enum ResumeSourceError {
    #[error("resume bucket is not configured (set S3_BUCKET_NAME)")]
    NotConfigured,

    #[error("resume '{0}' not found")]
    NotFound(String),

    #[error("only PDF resumes are supported, got '{0}'")]
    NotPdf(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeObject {
    pub key: String,
    pub filename: String,
}

#[derive(Clone)]
pub struct ResumeSource {
    store: Arc<dyn ObjectStore>,
    bucket: Option<String>,
}

impl ResumeSource {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: Option<String>) -> Self {
        Self { store, bucket }
    }

    fn bucket(&self) -> Result<&str, ResumeSourceError> {
        self.bucket.as_deref().ok_or(ResumeSourceError::NotConfigured)
    }

    /// PDF keys in the bucket, newest first. Objects without a modification
    /// time sort last.
    pub async fn list_resumes(&self) -> Result<Vec<ResumeObject>, ResumeSourceError> {
        let bucket = self.bucket()?;
        let mut objects: Vec<_> = self
            .store
            .list(bucket)
            .await?
            .into_iter()
            .filter(|o| is_pdf(&o.key))
            .collect();
        objects.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));

        Ok(objects
            .into_iter()
            .map(|o| ResumeObject {
                filename: basename(&o.key).to_string(),
                key: o.key,
            })
            .collect())
    }

    /// Downloads a resume, returning its bytes and basename.
    pub async fn fetch_resume(&self, key: &str) -> Result<(Bytes, String), ResumeSourceError> {
        if !is_pdf(key) {
            return Err(ResumeSourceError::NotPdf(key.to_string()));
        }
        let bucket = self.bucket()?;
        let body = self
            .store
            .get(bucket, key)
            .await?
            .ok_or_else(|| ResumeSourceError::NotFound(key.to_string()))?;
        Ok((body, basename(key).to_string()))
    }
}

pub fn is_pdf(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".pdf")
}

fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

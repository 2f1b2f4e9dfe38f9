use anyhow::{Context, Result};

/// Default object key of the shared feedback archive inside the feedback bucket.
pub const DEFAULT_FEEDBACK_KEY: &str = "feedback/interview_feedback.xlsx";

/// Application configuration loaded from environment variables.
/// Only the generator key is required; storage settings degrade at request time.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    /// Bucket holding candidate resumes. `None` disables the resume-bucket endpoints.
    pub resume_bucket: Option<String>,
    /// Bucket holding the feedback archive. `None` is the archive-unavailable case.
    pub feedback_bucket: Option<String>,
    pub feedback_key: String,
    /// Endpoint override for MinIO / local object stores.
    pub s3_endpoint: Option<String>,
    pub aws_region: String,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            resume_bucket: optional_env("S3_BUCKET_NAME"),
            feedback_bucket: optional_env("S3_BUCKET_FEEDBACK"),
            feedback_key: optional_env("FEEDBACK_KEY")
                .unwrap_or_else(|| DEFAULT_FEEDBACK_KEY.to_string()),
            s3_endpoint: optional_env("S3_ENDPOINT"),
            aws_region: optional_env("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            aws_access_key_id: optional_env("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: optional_env("AWS_SECRET_ACCESS_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an optional variable, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

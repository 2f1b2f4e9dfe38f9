use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::feedback::archive::FeedbackArchive;
use crate::llm_client::TextGenerator;
use crate::resume::source::ResumeSource;
use crate::session::Session;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable text generator. `LlmClient` in production.
    pub generator: Arc<dyn TextGenerator>,
    pub resumes: ResumeSource,
    pub archive: FeedbackArchive,
    /// All mutable session state. Never held across a generator or storage call.
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(
        config: Config,
        generator: Arc<dyn TextGenerator>,
        resumes: ResumeSource,
        archive: FeedbackArchive,
    ) -> Self {
        Self {
            config,
            generator,
            resumes,
            archive,
            session: Arc::new(Mutex::new(Session::new())),
        }
    }
}

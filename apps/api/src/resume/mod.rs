pub mod attributes;
pub mod extract;
pub mod handlers;
pub mod ingest;
pub mod prompts;
pub mod source;

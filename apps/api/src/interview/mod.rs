pub mod format;
pub mod handlers;
pub mod materials;
pub mod prompts;

// Personas and helpers shared by more than one prompt module.

/// Persona used for question, answer and coding-problem generation.
pub const INTERVIEWER_SYSTEM: &str = "You are a technical interviewer.";

/// Persona used when coding problems must ship with a complete solution.
pub const CODING_INTERVIEWER_SYSTEM: &str =
    "You are a technical interviewer creating coding problems with complete solutions.";

/// Joins at most `limit` items with ", ", falling back when the list is empty.
pub fn join_limited(items: &[String], limit: usize, fallback: &str) -> String {
    if items.is_empty() {
        return fallback.to_string();
    }
    items
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

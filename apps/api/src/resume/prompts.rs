// Resume ingestion prompt templates.

pub const ATTRIBUTE_SYSTEM: &str = "\
You are a meticulous resume parser. \
You MUST respond with valid JSON only. No markdown fences, no explanations. \
Never invent details that are not present in the resume.";

/// Replace `{resume_text}` before sending.
pub const ATTRIBUTE_PROMPT_TEMPLATE: &str = r#"Extract ONLY and ALL of the following details from the resume below in strict JSON format:
- "Full Name" (string)
- "Skills" (list of strings)
- "Years of Experience" (integer)
- "Relevant Domain" (string)
- "GitHub Links" (list of URLs)
- "LinkedIn Links" (list of URLs)
- "Projects" (list of short descriptions; if not present, empty list)
- "Past Job Titles" (list of strings; if not present, empty list)

Use exactly these eight keys. Return strictly valid JSON ONLY. No explanations.

RESUME TEXT:
{resume_text}"#;

//! Attribute extraction: turns resume text into the eight structured
//! candidate fields via the text generator.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::info;

use crate::llm_client::{extract_json_object, LlmError, TextGenerator};
use crate::resume::prompts::{ATTRIBUTE_PROMPT_TEMPLATE, ATTRIBUTE_SYSTEM};

const ATTRIBUTE_MAX_TOKENS: u32 = 1500;

/// Scalar fields that must be present and non-null. List fields default to empty.
const REQUIRED_SCALARS: [&str; 3] = ["Full Name", "Years of Experience", "Relevant Domain"];

#[derive(Debug, Error)]
pub enum AttributeParseError {
    #[error("text generator failed: {0}")]
    Generator(#[source] LlmError),

    #[error("generator response is not a JSON object")]
    NotJson,

    #[error("missing key in generator response: {0}")]
    MissingField(&'static str),

    #[error("invalid field value: {0}")]
    InvalidField(#[source] serde_json::Error),
}

/// Structured candidate data extracted from a resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAttributes {
    #[serde(rename = "Full Name")]
    pub full_name: String,
    #[serde(rename = "Skills", default, deserialize_with = "null_as_empty")]
    pub skills: Vec<String>,
    #[serde(rename = "Years of Experience", deserialize_with = "lenient_years")]
    pub years_of_experience: u32,
    #[serde(rename = "Relevant Domain")]
    pub relevant_domain: String,
    #[serde(rename = "GitHub Links", default, deserialize_with = "null_as_empty")]
    pub github_links: Vec<String>,
    #[serde(rename = "LinkedIn Links", default, deserialize_with = "null_as_empty")]
    pub linkedin_links: Vec<String>,
    #[serde(rename = "Projects", default, deserialize_with = "null_as_empty")]
    pub projects: Vec<String>,
    #[serde(rename = "Past Job Titles", default, deserialize_with = "null_as_empty")]
    pub past_job_titles: Vec<String>,
}

/// Sends resume text to the generator and parses the returned JSON.
pub async fn parse_attributes(
    generator: &dyn TextGenerator,
    resume_text: &str,
) -> Result<ResumeAttributes, AttributeParseError> {
    let prompt = ATTRIBUTE_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);
    let response = generator
        .generate(&prompt, ATTRIBUTE_SYSTEM, ATTRIBUTE_MAX_TOKENS)
        .await
        .map_err(AttributeParseError::Generator)?;

    let attributes = parse_attributes_response(&response)?;
    info!(
        "Parsed resume attributes for '{}' ({} skills)",
        attributes.full_name,
        attributes.skills.len()
    );
    Ok(attributes)
}

/// Parses raw generator output. Separated from the generator call for testing.
pub fn parse_attributes_response(response: &str) -> Result<ResumeAttributes, AttributeParseError> {
    let json = extract_json_object(response).map_err(|_| AttributeParseError::NotJson)?;
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|_| AttributeParseError::NotJson)?;

    let object = value.as_object().ok_or(AttributeParseError::NotJson)?;
    for key in REQUIRED_SCALARS {
        if object.get(key).map_or(true, serde_json::Value::is_null) {
            return Err(AttributeParseError::MissingField(key));
        }
    }

    serde_json::from_value(value).map_err(AttributeParseError::InvalidField)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `5`, `5.5` (truncated) or `"5"`.
fn lenient_years<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Years {
        Int(u64),
        Float(f64),
        Text(String),
    }

    let years = match Years::deserialize(deserializer)? {
        Years::Int(n) => n as f64,
        Years::Float(f) => f,
        Years::Text(s) => s
            .trim()
            .trim_end_matches('+')
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("years of experience '{s}' is not a number")))?,
    };
    if !years.is_finite() || years < 0.0 {
        return Err(D::Error::custom(format!(
            "years of experience {years} is out of range"
        )));
    }
    Ok(years.trunc() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;

    const FULL_RESPONSE: &str = r#"{
        "Full Name": "Jane Doe",
        "Skills": ["Rust", "PostgreSQL", "Kafka", "AWS"],
        "Years of Experience": 6,
        "Relevant Domain": "Distributed Systems",
        "GitHub Links": ["https://github.com/janedoe"],
        "LinkedIn Links": ["https://linkedin.com/in/janedoe"],
        "Projects": ["Event-sourced ledger"],
        "Past Job Titles": ["Senior Engineer", "Engineer"]
    }"#;

    #[test]
    fn test_parses_all_eight_fields() {
        let attrs = parse_attributes_response(FULL_RESPONSE).unwrap();
        assert_eq!(attrs.full_name, "Jane Doe");
        assert_eq!(attrs.skills.len(), 4);
        assert_eq!(attrs.years_of_experience, 6);
        assert_eq!(attrs.relevant_domain, "Distributed Systems");
        assert_eq!(attrs.github_links, vec!["https://github.com/janedoe"]);
        assert_eq!(attrs.linkedin_links.len(), 1);
        assert_eq!(attrs.projects, vec!["Event-sourced ledger"]);
        assert_eq!(attrs.past_job_titles[0], "Senior Engineer");
    }

    #[test]
    fn test_missing_list_fields_default_to_empty() {
        let response = r#"{
            "Full Name": "Jane Doe",
            "Years of Experience": 2,
            "Relevant Domain": "Frontend",
            "Skills": null
        }"#;
        let attrs = parse_attributes_response(response).unwrap();
        assert!(attrs.skills.is_empty());
        assert!(attrs.github_links.is_empty());
        assert!(attrs.linkedin_links.is_empty());
        assert!(attrs.projects.is_empty());
        assert!(attrs.past_job_titles.is_empty());
    }

    #[test]
    fn test_missing_scalar_is_typed_failure() {
        let response = r#"{"Full Name": "Jane Doe", "Relevant Domain": "Data"}"#;
        assert!(matches!(
            parse_attributes_response(response),
            Err(AttributeParseError::MissingField("Years of Experience"))
        ));
    }

    #[test]
    fn test_null_scalar_counts_as_missing() {
        let response =
            r#"{"Full Name": null, "Years of Experience": 1, "Relevant Domain": "Data"}"#;
        assert!(matches!(
            parse_attributes_response(response),
            Err(AttributeParseError::MissingField("Full Name"))
        ));
    }

    #[test]
    fn test_non_json_is_typed_failure() {
        assert!(matches!(
            parse_attributes_response("Sorry, I could not read that resume."),
            Err(AttributeParseError::NotJson)
        ));
        assert!(matches!(
            parse_attributes_response("{not: valid json}"),
            Err(AttributeParseError::NotJson)
        ));
    }

    #[test]
    fn test_json_with_chatter_and_fences() {
        let response = format!("Here you go:\n```json\n{FULL_RESPONSE}\n```");
        assert_eq!(
            parse_attributes_response(&response).unwrap().full_name,
            "Jane Doe"
        );
    }

    #[test]
    fn test_years_accepts_float_and_string() {
        let float = r#"{"Full Name": "A", "Years of Experience": 3.7, "Relevant Domain": "X"}"#;
        assert_eq!(
            parse_attributes_response(float).unwrap().years_of_experience,
            3
        );
        let text = r#"{"Full Name": "A", "Years of Experience": "10+", "Relevant Domain": "X"}"#;
        assert_eq!(
            parse_attributes_response(text).unwrap().years_of_experience,
            10
        );
    }

    #[test]
    fn test_years_rejects_garbage() {
        let response =
            r#"{"Full Name": "A", "Years of Experience": "several", "Relevant Domain": "X"}"#;
        assert!(matches!(
            parse_attributes_response(response),
            Err(AttributeParseError::InvalidField(_))
        ));
    }

    #[tokio::test]
    async fn test_parse_attributes_sends_resume_text() {
        let generator = ScriptedGenerator::new([FULL_RESPONSE]);
        let attrs = parse_attributes(&generator, "JANE DOE — Rust engineer")
            .await
            .unwrap();
        assert_eq!(attrs.full_name, "Jane Doe");
        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].0.contains("JANE DOE — Rust engineer"));
        assert_eq!(prompts[0].1, ATTRIBUTE_MAX_TOKENS);
    }

    #[tokio::test]
    async fn test_generator_failure_is_reported() {
        let generator = ScriptedGenerator::failing();
        assert!(matches!(
            parse_attributes(&generator, "text").await,
            Err(AttributeParseError::Generator(_))
        ));
    }
}

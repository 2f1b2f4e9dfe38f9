//! Interview material generation: round questions, briefs, quick
//! assessments, coding problems and the generator's self-evaluation.
//!
//! Every function takes the generator as `&dyn TextGenerator` and returns the
//! generated text as-is. Display structure lives in `interview::format`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::interview::prompts::{
    CODING_PROBLEMS_TEMPLATE, MODEL_ANSWER_TEMPLATE, QUICK_ASSESSMENT_TEMPLATE,
    QUICK_BRIEF_TEMPLATE, ROUND_CODING_TEMPLATE, ROUND_QUESTION_TEMPLATE,
    SELF_EVALUATION_SYSTEM, SELF_EVALUATION_TEMPLATE,
};
use crate::llm_client::prompts::{join_limited, CODING_INTERVIEWER_SYSTEM, INTERVIEWER_SYSTEM};
use crate::llm_client::{extract_json_object, LlmError, TextGenerator};
use crate::pipeline::round::InterviewRound;
use crate::pipeline::store::CandidateRecord;

/// Skills covered per round; one question and one coding problem each.
pub const SKILLS_PER_ROUND: usize = 3;
const FALLBACK_SKILL: &str = "problem solving";

const QUESTION_MAX_TOKENS: u32 = 100;
const ANSWER_MAX_TOKENS: u32 = 250;
const ROUND_CODING_MAX_TOKENS: u32 = 500;
const BRIEF_MAX_TOKENS: u32 = 800;
const QUICK_ASSESSMENT_MAX_TOKENS: u32 = 1400;
const CODING_PROBLEMS_MAX_TOKENS: u32 = 2000;
const SELF_EVALUATION_MAX_TOKENS: u32 = 200;

// ────────────────────────────────────────────────────────────────────────────
// Round materials
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundQuestion {
    pub skill: String,
    pub question: String,
    pub model_answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundCodingProblem {
    pub title: String,
    pub skill: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundMaterials {
    pub round: InterviewRound,
    pub questions: Vec<RoundQuestion>,
    pub coding: Vec<RoundCodingProblem>,
}

/// Generates one question, model answer and coding problem for each of the
/// first three skills. Any generator failure aborts the whole set.
pub async fn generate_round_materials(
    generator: &dyn TextGenerator,
    round: InterviewRound,
    experience_years: u32,
    skills: &[String],
) -> Result<RoundMaterials, LlmError> {
    let skills: Vec<&str> = skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(SKILLS_PER_ROUND)
        .collect();
    let skills = if skills.is_empty() {
        vec![FALLBACK_SKILL]
    } else {
        skills
    };

    let experience = experience_years.to_string();
    let mut questions = Vec::with_capacity(skills.len());
    let mut coding = Vec::with_capacity(skills.len());

    for (i, skill) in skills.iter().enumerate() {
        let question_prompt = ROUND_QUESTION_TEMPLATE
            .replace("{experience}", &experience)
            .replace("{skill}", skill);
        let question = generator
            .generate(&question_prompt, INTERVIEWER_SYSTEM, QUESTION_MAX_TOKENS)
            .await?;

        let answer_prompt = MODEL_ANSWER_TEMPLATE.replace("{question}", &question);
        let model_answer = generator
            .generate(&answer_prompt, INTERVIEWER_SYSTEM, ANSWER_MAX_TOKENS)
            .await?;

        let coding_prompt = ROUND_CODING_TEMPLATE
            .replace("{experience}", &experience)
            .replace("{skill}", skill);
        let content = generator
            .generate(&coding_prompt, CODING_INTERVIEWER_SYSTEM, ROUND_CODING_MAX_TOKENS)
            .await?;

        questions.push(RoundQuestion {
            skill: skill.to_string(),
            question,
            model_answer,
        });
        coding.push(RoundCodingProblem {
            title: format!("Coding Problem {}", i + 1),
            skill: skill.to_string(),
            content,
        });
    }

    info!(
        "Generated {} materials: {} questions, {} coding problems",
        round,
        questions.len(),
        coding.len()
    );
    Ok(RoundMaterials {
        round,
        questions,
        coding,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Interviewer prep
// ────────────────────────────────────────────────────────────────────────────

pub async fn generate_quick_brief(
    generator: &dyn TextGenerator,
    candidate: &CandidateRecord,
) -> Result<String, LlmError> {
    let prompt = QUICK_BRIEF_TEMPLATE
        .replace("{name}", &candidate.name)
        .replace("{domain}", &candidate.domain)
        .replace("{experience}", &candidate.experience_years.to_string())
        .replace("{skills}", &join_limited(&candidate.skills, 5, "Not listed"))
        .replace("{projects}", &join_limited(&candidate.projects, 2, "Not listed"));
    generator
        .generate(&prompt, INTERVIEWER_SYSTEM, BRIEF_MAX_TOKENS)
        .await
}

/// Five questions with expected answer, red flag and follow-up.
pub async fn generate_quick_assessment(
    generator: &dyn TextGenerator,
    domain: &str,
    skills: &[String],
    experience_years: u32,
) -> Result<String, LlmError> {
    let prompt = QUICK_ASSESSMENT_TEMPLATE
        .replace("{domain}", domain)
        .replace("{experience}", &experience_years.to_string())
        .replace("{skills}", &join_limited(skills, 5, "Basic skills"));
    generator
        .generate(&prompt, INTERVIEWER_SYSTEM, QUICK_ASSESSMENT_MAX_TOKENS)
        .await
}

// ────────────────────────────────────────────────────────────────────────────
// Coding problems
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("unsupported language '{0}' (expected Python, Java, JavaScript or C++)")]
pub struct UnknownLanguage(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgrammingLanguage {
    Python,
    Java,
    JavaScript,
    #[serde(rename = "C++")]
    Cpp,
}

impl ProgrammingLanguage {
    pub const ALL: [ProgrammingLanguage; 4] = [
        ProgrammingLanguage::Python,
        ProgrammingLanguage::Java,
        ProgrammingLanguage::JavaScript,
        ProgrammingLanguage::Cpp,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ProgrammingLanguage::Python => "Python",
            ProgrammingLanguage::Java => "Java",
            ProgrammingLanguage::JavaScript => "JavaScript",
            ProgrammingLanguage::Cpp => "C++",
        }
    }

    /// Markdown code-fence tag.
    pub const fn fence(self) -> &'static str {
        match self {
            ProgrammingLanguage::Python => "python",
            ProgrammingLanguage::Java => "java",
            ProgrammingLanguage::JavaScript => "javascript",
            ProgrammingLanguage::Cpp => "cpp",
        }
    }
}

impl fmt::Display for ProgrammingLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProgrammingLanguage {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("cpp") {
            return Ok(ProgrammingLanguage::Cpp);
        }
        ProgrammingLanguage::ALL
            .into_iter()
            .find(|lang| lang.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

/// Difficulty label and guidance for a given experience level.
pub fn difficulty_for(experience_years: u32) -> (&'static str, &'static str) {
    match experience_years {
        0..=2 => (
            "Easy to Medium",
            "Focus on basic programming concepts, loops, conditions, and simple data structures",
        ),
        3..=5 => (
            "Medium",
            "Include algorithms, data structures, and problem-solving skills",
        ),
        _ => (
            "Medium to Hard",
            "Include advanced algorithms, optimization, and system design concepts",
        ),
    }
}

/// Three problems with solutions in `language`, scaled to experience.
pub async fn generate_coding_problems(
    generator: &dyn TextGenerator,
    domain: &str,
    skills: &[String],
    experience_years: u32,
    language: ProgrammingLanguage,
) -> Result<String, LlmError> {
    let (difficulty, complexity_note) = difficulty_for(experience_years);
    let prompt = CODING_PROBLEMS_TEMPLATE
        .replace("{domain}", domain)
        .replace("{experience}", &experience_years.to_string())
        .replace("{skills}", &join_limited(skills, 5, "General programming"))
        .replace("{language}", language.label())
        .replace("{fence}", language.fence())
        .replace("{difficulty}", difficulty)
        .replace("{complexity_note}", complexity_note);

    info!(
        "Generating {} coding problems ({} difficulty)",
        language, difficulty
    );
    generator
        .generate(&prompt, CODING_INTERVIEWER_SYSTEM, CODING_PROBLEMS_MAX_TOKENS)
        .await
}

// ────────────────────────────────────────────────────────────────────────────
// Self-evaluation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SelfEvaluationError {
    #[error("no generated material to evaluate")]
    NoOutputs,

    #[error("text generator failed: {0}")]
    Generator(#[from] LlmError),

    #[error("self-evaluation response is not valid JSON: {0}")]
    InvalidResponse(String),

    #[error("{metric} score {score} is outside 1-5")]
    ScoreOutOfRange { metric: &'static str, score: u8 },
}

/// Generator's 1 to 5 rating of its own material for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfEvaluation {
    #[serde(rename = "Accuracy")]
    pub accuracy: u8,
    #[serde(rename = "Helpfulness")]
    pub helpfulness: u8,
    #[serde(rename = "Relevance")]
    pub relevance: u8,
    #[serde(rename = "Clarity")]
    pub clarity: u8,
}

impl SelfEvaluation {
    fn validate(self) -> Result<Self, SelfEvaluationError> {
        for (metric, score) in [
            ("Accuracy", self.accuracy),
            ("Helpfulness", self.helpfulness),
            ("Relevance", self.relevance),
            ("Clarity", self.clarity),
        ] {
            if !(1..=5).contains(&score) {
                return Err(SelfEvaluationError::ScoreOutOfRange { metric, score });
            }
        }
        Ok(self)
    }
}

/// Rates labelled outputs. Blank outputs are skipped; if none remain the
/// generator is not called.
pub async fn self_evaluate(
    generator: &dyn TextGenerator,
    outputs: &[(String, String)],
) -> Result<SelfEvaluation, SelfEvaluationError> {
    let combined = outputs
        .iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(label, text)| format!("{label}:\n{}", text.trim()))
        .collect::<Vec<_>>()
        .join("\n\n");
    if combined.is_empty() {
        return Err(SelfEvaluationError::NoOutputs);
    }

    let prompt = SELF_EVALUATION_TEMPLATE.replace("{outputs}", &combined);
    let response = generator
        .generate(&prompt, SELF_EVALUATION_SYSTEM, SELF_EVALUATION_MAX_TOKENS)
        .await?;

    parse_self_evaluation(&response)
}

pub fn parse_self_evaluation(response: &str) -> Result<SelfEvaluation, SelfEvaluationError> {
    let json = extract_json_object(response)
        .map_err(|e| SelfEvaluationError::InvalidResponse(e.to_string()))?;
    let evaluation: SelfEvaluation = serde_json::from_str(json)
        .map_err(|e| SelfEvaluationError::InvalidResponse(e.to_string()))?;
    evaluation.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::pipeline::store::{sample_attributes, CandidateStore};

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_round_materials_cover_first_three_skills() {
        let generator = ScriptedGenerator::new((1..=9).map(|i| format!("reply {i}")));
        let materials = generate_round_materials(
            &generator,
            InterviewRound::L2,
            4,
            &skills(&["Rust", "SQL", "Kafka", "Go"]),
        )
        .await
        .unwrap();

        assert_eq!(materials.round, InterviewRound::L2);
        assert_eq!(materials.questions.len(), 3);
        assert_eq!(materials.coding.len(), 3);
        assert_eq!(materials.questions[0].question, "reply 1");
        assert_eq!(materials.questions[0].model_answer, "reply 2");
        assert_eq!(materials.coding[0].content, "reply 3");
        assert_eq!(materials.coding[2].title, "Coding Problem 3");
        assert_eq!(materials.coding[2].skill, "Kafka");

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 9);
        assert!(prompts[0].0.contains("4 years experience in Rust"));
        assert_eq!(prompts[0].1, QUESTION_MAX_TOKENS);
        assert!(prompts[1].0.contains("Question: reply 1"));
        assert_eq!(prompts[1].1, ANSWER_MAX_TOKENS);
        assert_eq!(prompts[2].1, ROUND_CODING_MAX_TOKENS);
    }

    #[tokio::test]
    async fn test_round_materials_default_skill() {
        let generator = ScriptedGenerator::new(["q", "a", "c"]);
        let materials = generate_round_materials(&generator, InterviewRound::L1, 1, &[])
            .await
            .unwrap();
        assert_eq!(materials.questions.len(), 1);
        assert_eq!(materials.questions[0].skill, "problem solving");
    }

    #[tokio::test]
    async fn test_round_materials_fail_on_generator_error() {
        let generator = ScriptedGenerator::new(["q", "a"]);
        let result =
            generate_round_materials(&generator, InterviewRound::L1, 1, &skills(&["Rust"])).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_quick_brief_includes_candidate_profile() {
        let mut store = CandidateStore::new();
        let id = store.create(sample_attributes("Jane Doe"), "jane.pdf").id;
        let candidate = store.get(id).unwrap();

        let generator = ScriptedGenerator::new(["CANDIDATE SUMMARY: strong backend"]);
        let brief = generate_quick_brief(&generator, candidate).await.unwrap();
        assert_eq!(brief, "CANDIDATE SUMMARY: strong backend");

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].0.contains("CANDIDATE: Jane Doe"));
        assert!(prompts[0].0.contains("KEY SKILLS: Rust, Kubernetes"));
        assert_eq!(prompts[0].1, BRIEF_MAX_TOKENS);
    }

    #[tokio::test]
    async fn test_quick_assessment_prompt() {
        let generator = ScriptedGenerator::new(["**Q:** ..."]);
        generate_quick_assessment(&generator, "Data", &[], 7)
            .await
            .unwrap();
        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].0.contains("Data candidate (7 years experience)"));
        assert!(prompts[0].0.contains("Skills: Basic skills"));
        assert_eq!(prompts[0].1, QUICK_ASSESSMENT_MAX_TOKENS);
    }

    #[test]
    fn test_difficulty_by_experience() {
        assert_eq!(difficulty_for(0).0, "Easy to Medium");
        assert_eq!(difficulty_for(2).0, "Easy to Medium");
        assert_eq!(difficulty_for(3).0, "Medium");
        assert_eq!(difficulty_for(5).0, "Medium");
        assert_eq!(difficulty_for(6).0, "Medium to Hard");
    }

    #[tokio::test]
    async fn test_coding_problems_prompt_uses_language_and_difficulty() {
        let generator = ScriptedGenerator::new(["**Problem 1:** ..."]);
        generate_coding_problems(
            &generator,
            "Backend",
            &skills(&["Rust"]),
            8,
            ProgrammingLanguage::Cpp,
        )
        .await
        .unwrap();

        let prompts = generator.prompts.lock().unwrap();
        let prompt = &prompts[0].0;
        assert!(prompt.contains("Programming Language: C++"));
        assert!(prompt.contains("**C++ Solution:**"));
        assert!(prompt.contains("```cpp"));
        assert!(prompt.contains("Difficulty Level: Medium to Hard"));
        assert_eq!(prompts[0].1, CODING_PROBLEMS_MAX_TOKENS);
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!(
            "python".parse::<ProgrammingLanguage>().unwrap(),
            ProgrammingLanguage::Python
        );
        assert_eq!(
            "JavaScript".parse::<ProgrammingLanguage>().unwrap(),
            ProgrammingLanguage::JavaScript
        );
        assert_eq!(
            "c++".parse::<ProgrammingLanguage>().unwrap(),
            ProgrammingLanguage::Cpp
        );
        assert_eq!(
            "cpp".parse::<ProgrammingLanguage>().unwrap(),
            ProgrammingLanguage::Cpp
        );
        assert!("Haskell".parse::<ProgrammingLanguage>().is_err());
    }

    #[tokio::test]
    async fn test_self_evaluation_parses_scores() {
        let generator = ScriptedGenerator::new([
            r#"Sure: {"Accuracy": 4, "Helpfulness": 5, "Relevance": 4, "Clarity": 3}"#,
        ]);
        let outputs = vec![
            ("Brief".to_string(), "Strong backend profile".to_string()),
            ("Empty".to_string(), "   ".to_string()),
        ];
        let evaluation = self_evaluate(&generator, &outputs).await.unwrap();
        assert_eq!(evaluation.helpfulness, 5);
        assert_eq!(evaluation.clarity, 3);

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].0.contains("Brief:\nStrong backend profile"));
        assert!(!prompts[0].0.contains("Empty:"));
    }

    #[tokio::test]
    async fn test_self_evaluation_without_outputs_skips_generator() {
        let generator = ScriptedGenerator::new(["{}"]);
        let outputs = vec![("Brief".to_string(), String::new())];
        assert!(matches!(
            self_evaluate(&generator, &outputs).await,
            Err(SelfEvaluationError::NoOutputs)
        ));
        assert_eq!(generator.calls(), 0);
    }

    #[test]
    fn test_self_evaluation_rejects_out_of_range_score() {
        let response = r#"{"Accuracy": 9, "Helpfulness": 5, "Relevance": 4, "Clarity": 3}"#;
        assert!(matches!(
            parse_self_evaluation(response),
            Err(SelfEvaluationError::ScoreOutOfRange {
                metric: "Accuracy",
                score: 9
            })
        ));
    }

    #[test]
    fn test_self_evaluation_rejects_non_json() {
        assert!(matches!(
            parse_self_evaluation("I would rate these highly."),
            Err(SelfEvaluationError::InvalidResponse(_))
        ));
    }
}

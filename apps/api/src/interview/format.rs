//! Formatting layer: splits generated markdown into display sections.
//!
//! The generator's output is stored untouched; these parsers run only when a
//! response is rendered. Anything that does not match the expected markers is
//! returned raw.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

static QUESTION_SPLIT_RE: OnceLock<Regex> = OnceLock::new();
static QUESTION_FIELD_RE: OnceLock<Regex> = OnceLock::new();
static PROBLEM_SPLIT_RE: OnceLock<Regex> = OnceLock::new();
static PROBLEM_FIELD_RE: OnceLock<Regex> = OnceLock::new();

/// Parsed sections, or the original text when parsing found nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", content = "content", rename_all = "snake_case")]
pub enum Formatted<T> {
    Parsed(Vec<T>),
    Raw(String),
}

impl<T> Formatted<T> {
    fn from_parsed(items: Vec<T>, raw: &str) -> Self {
        if items.is_empty() {
            Formatted::Raw(raw.to_string())
        } else {
            Formatted::Parsed(items)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Quick assessment questions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssessmentQuestion {
    pub question: String,
    pub expected_answer: Option<String>,
    pub warning_signs: Option<String>,
    pub follow_up: Option<String>,
}

#[derive(Clone, Copy)]
enum QuestionField {
    ExpectedAnswer,
    WarningSigns,
    FollowUp,
}

pub fn format_assessment(text: &str) -> Formatted<AssessmentQuestion> {
    Formatted::from_parsed(parse_assessment_questions(text), text)
}

/// Splits on `**Q:**` markers. Each block's first line is the question; labelled
/// lines start a field and unlabelled lines continue the current one.
pub fn parse_assessment_questions(text: &str) -> Vec<AssessmentQuestion> {
    let split_re = QUESTION_SPLIT_RE.get_or_init(|| Regex::new(r"\**Q:\*\*").unwrap());
    let field_re = QUESTION_FIELD_RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\**\s*(expected answer|good answer should include|answer|red flag|warning signs|follow-up|probe further)\s*:\s*\**\s*(.*)$",
        )
        .unwrap()
    });

    split_re
        .split(text)
        .skip(1)
        .filter_map(|block| {
            let mut lines = block.lines().map(str::trim).filter(|l| !l.is_empty());
            let question = lines.next()?.trim_matches('*').trim().to_string();
            if question.is_empty() {
                return None;
            }

            let mut parsed = AssessmentQuestion {
                question,
                ..Default::default()
            };
            let mut current: Option<(QuestionField, Vec<String>)> = None;

            for line in lines {
                if let Some(caps) = field_re.captures(line) {
                    if let Some((field, parts)) = current.take() {
                        parsed.set(field, parts);
                    }
                    let field = match caps[1].to_ascii_lowercase().as_str() {
                        "red flag" | "warning signs" => QuestionField::WarningSigns,
                        "follow-up" | "probe further" => QuestionField::FollowUp,
                        _ => QuestionField::ExpectedAnswer,
                    };
                    current = Some((field, vec![caps[2].trim().to_string()]));
                } else if let Some((_, parts)) = current.as_mut() {
                    parts.push(line.to_string());
                } else {
                    parsed.question.push(' ');
                    parsed.question.push_str(line);
                }
            }
            if let Some((field, parts)) = current {
                parsed.set(field, parts);
            }
            Some(parsed)
        })
        .collect()
}

impl AssessmentQuestion {
    fn set(&mut self, field: QuestionField, parts: Vec<String>) {
        let value = join_parts(parts);
        if value.is_empty() {
            return;
        }
        let slot = match field {
            QuestionField::ExpectedAnswer => &mut self.expected_answer,
            QuestionField::WarningSigns => &mut self.warning_signs,
            QuestionField::FollowUp => &mut self.follow_up,
        };
        *slot = Some(value);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Coding problems
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CodingProblem {
    pub statement: Option<String>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub solution: Option<String>,
    pub explanation: Option<String>,
    pub time_complexity: Option<String>,
}

impl CodingProblem {
    fn is_empty(&self) -> bool {
        self.statement.is_none() && self.solution.is_none()
    }

    fn set(&mut self, field: ProblemField, parts: Vec<String>) {
        let value = join_parts(parts);
        if value.is_empty() {
            return;
        }
        let slot = match field {
            ProblemField::Statement => &mut self.statement,
            ProblemField::Input => &mut self.input,
            ProblemField::Output => &mut self.output,
            ProblemField::Explanation => &mut self.explanation,
            ProblemField::TimeComplexity => &mut self.time_complexity,
        };
        *slot = Some(value);
    }
}

#[derive(Clone, Copy)]
enum ProblemField {
    Statement,
    Input,
    Output,
    Explanation,
    TimeComplexity,
}

pub fn format_coding_problems(text: &str) -> Formatted<CodingProblem> {
    Formatted::from_parsed(parse_coding_problems(text), text)
}

/// Splits on `**Problem N:**` markers; a blob without them is treated as a
/// single problem. The first fenced block in each problem is its solution.
pub fn parse_coding_problems(text: &str) -> Vec<CodingProblem> {
    let split_re = PROBLEM_SPLIT_RE.get_or_init(|| Regex::new(r"\*\*Problem \d+:\*\*").unwrap());

    let blocks: Vec<&str> = if split_re.is_match(text) {
        split_re.split(text).skip(1).collect()
    } else {
        vec![text]
    };

    blocks
        .into_iter()
        .map(parse_problem_block)
        .filter(|p| !p.is_empty())
        .collect()
}

fn parse_problem_block(block: &str) -> CodingProblem {
    let field_re = PROBLEM_FIELD_RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\*\*\s*(problem statement|input|output|explanation|time complexity|[^*]+ solution)\s*:\*\*\s*(.*)$",
        )
        .unwrap()
    });

    let mut problem = CodingProblem::default();
    let mut current: Option<(ProblemField, Vec<String>)> = None;
    let mut code: Vec<&str> = Vec::new();
    let mut in_code = false;

    for raw in block.lines() {
        let line = raw.trim();

        if line.starts_with("```") {
            if in_code {
                if problem.solution.is_none() && !code.is_empty() {
                    problem.solution = Some(code.join("\n"));
                }
                code.clear();
            } else if let Some((field, parts)) = current.take() {
                problem.set(field, parts);
            }
            in_code = !in_code;
            continue;
        }
        if in_code {
            code.push(raw.trim_end());
            continue;
        }
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = field_re.captures(line) {
            if let Some((field, parts)) = current.take() {
                problem.set(field, parts);
            }
            let field = match caps[1].to_ascii_lowercase().as_str() {
                "problem statement" => Some(ProblemField::Statement),
                "input" => Some(ProblemField::Input),
                "output" => Some(ProblemField::Output),
                "explanation" => Some(ProblemField::Explanation),
                "time complexity" => Some(ProblemField::TimeComplexity),
                // "<Language> Solution:" heads the code fence.
                _ => None,
            };
            current = field.map(|f| (f, vec![caps[2].trim().to_string()]));
        } else if let Some((_, parts)) = current.as_mut() {
            parts.push(line.to_string());
        }
    }

    if in_code && problem.solution.is_none() && !code.is_empty() {
        problem.solution = Some(code.join("\n"));
    }
    if let Some((field, parts)) = current {
        problem.set(field, parts);
    }
    problem
}

fn join_parts(parts: Vec<String>) -> String {
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

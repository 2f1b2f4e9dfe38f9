// Prompt templates for interview material generation.
// Placeholders in `{braces}` are replaced before sending.

/// Replace `{experience}` and `{skill}`.
pub const ROUND_QUESTION_TEMPLATE: &str = "Generate an interview question (with answer) for a candidate \
with {experience} years experience in {skill}.";

/// Replace `{question}`.
pub const MODEL_ANSWER_TEMPLATE: &str = "Given the following interview question, provide a model answer \
or solution that a strong candidate would give.\nQuestion: {question}";

/// Replace `{experience}` and `{skill}`.
pub const ROUND_CODING_TEMPLATE: &str = r#"Generate a coding problem for a candidate with {experience} years experience in {skill}.

Provide the response in this EXACT format:

**Problem Statement:** [Clear description of the coding problem]

**Input:** [Sample input format and examples]

**Output:** [Expected output format and examples]

**Python Solution:**
```python
[Complete working Python code solution]
```

**Explanation:** [Brief explanation of the approach and algorithm]

**Time Complexity:** [Big O notation]

Make sure the problem is appropriate for {experience} years of experience and related to {skill}."#;

/// Replace `{name}`, `{domain}`, `{experience}`, `{skills}`, `{projects}`.
pub const QUICK_BRIEF_TEMPLATE: &str = r#"Generate a concise interviewer preparation brief for:

CANDIDATE: {name}
DOMAIN: {domain}
EXPERIENCE: {experience} years
KEY SKILLS: {skills}
PROJECTS: {projects}

Provide:

CANDIDATE SUMMARY:
Brief 2-3 line summary of candidate profile

KEY AREAS TO ASSESS:
List 3-4 main areas to focus on during interview

EXPERIENCE LEVEL EXPECTATION:
What to expect from someone with this experience level

Keep it concise and actionable for interviewer quick prep."#;

/// Replace `{domain}`, `{experience}`, `{skills}`.
pub const QUICK_ASSESSMENT_TEMPLATE: &str = r#"Generate 5 quick assessment questions for {domain} candidate ({experience} years experience).
Skills: {skills}

For each question, use EXACTLY this format:

**Q:** [Your question here]
**Expected Answer:** [What a good candidate should say]
**Red Flag:** [Concerning responses to watch for]
**Follow-up:** [If you need to dig deeper]

Focus on questions that quickly reveal:
- Actual understanding vs resume claims
- Communication skills
- Problem-solving approach
- Technical competency

Make questions practical and easy to evaluate answers. Use the exact format above."#;

/// Replace `{domain}`, `{experience}`, `{skills}`, `{language}`, `{fence}`,
/// `{difficulty}`, `{complexity_note}`.
pub const CODING_PROBLEMS_TEMPLATE: &str = r#"Generate 3 coding problems for a {domain} candidate with {experience} years experience.
Skills: {skills}
Programming Language: {language}
Difficulty Level: {difficulty}

For each problem, use EXACTLY this format:

**Problem 1:**
**Problem Statement:** [Clear problem description]
**Input:** [Sample input format]
**Output:** [Expected output format]
**{language} Solution:**
```{fence}
[Complete working code solution]
```
**Explanation:** [Brief explanation of approach]
**Time Complexity:** [Big O notation]

Requirements:
- {complexity_note}
- Problems should be solvable in 15-30 minutes each
- Include complete, working code solutions in {language}
- Make problems relevant to {domain} if possible
- Provide clear input/output examples
- Include time complexity analysis

Use the exact format above for all 3 problems."#;

/// Replace `{outputs}`.
pub const SELF_EVALUATION_TEMPLATE: &str = r#"Below are all the responses generated for a candidate in an interview prep application.
Evaluate the overall quality of these generated responses.
Rate EACH metric from 1 (poor) to 5 (excellent):
- Accuracy: Are the responses correct and reliable?
- Helpfulness: Do the responses provide valuable and actionable information?
- Relevance: Are the responses on-topic and appropriate?
- Clarity: Are the responses clear and easy to understand?

Respond strictly in valid JSON like this:
{"Accuracy": 4, "Helpfulness": 5, "Relevance": 4, "Clarity": 5}

GENERATED RESPONSES:
{outputs}"#;

pub const SELF_EVALUATION_SYSTEM: &str = "You are an expert evaluator of generated interview material. \
You MUST respond with valid JSON only.";

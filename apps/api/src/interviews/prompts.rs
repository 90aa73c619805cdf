// All LLM prompt templates for the interviews module.
// Reuses the output contract from llm_client::prompts.

use crate::interviews::models::InterviewRequest;
use crate::llm_client::prompts::{fill_template, JSON_ARRAY_ONLY_INSTRUCTION};

/// Number of questions requested per interview.
pub const QUESTION_COUNT: usize = 5;

/// Question generation template.
/// Replace: {count}, {position}, {description}, {experience}, {tech_stack}, {output_contract}
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"As an experienced technical interviewer, generate a JSON array containing {count} technical interview questions along with detailed answers based on the following job information.

Calibrate difficulty and the evaluation standard to the candidate's years of experience and to the job role they are applying for, as well as the rest of the job information. Ask questions relevant to the current job market, of the kind asked in real interviews.

Each object in the array must have exactly the fields "question" and "answer", formatted as follows:

[
  { "question": "<Question text>", "answer": "<Answer text>" },
  ...
]

Job Information:
- Job Position: {position}
- Job Description: {description}
- Years of Experience Required: {experience}
- Tech Stacks: {tech_stack}

The questions should assess skills in {tech_stack} development and best practices, problem-solving, and experience handling complex requirements.

{output_contract}"#;

/// Answer scoring template.
/// Replace: {question}, {reference_answer}, {candidate_answer}, {output_contract}
pub const SCORING_PROMPT_TEMPLATE: &str = r#"You are evaluating a candidate's answer in a mock technical interview.

Question: {question}
Reference Answer: {reference_answer}
Candidate Answer: {candidate_answer}

Compare the candidate answer to the reference answer. Give a score from 0 to 100 reflecting correctness, completeness and clarity, and short feedback (at most three sentences) on how to improve.

Return a JSON array containing exactly one object with the fields "score" (number) and "feedback" (string), formatted as follows:

[
  { "score": <0-100>, "feedback": "<Feedback text>" }
]

{output_contract}"#;

/// Renders the question generation prompt. Request fields are inlined verbatim.
pub fn build_question_prompt(request: &InterviewRequest) -> String {
    let count = QUESTION_COUNT.to_string();
    let experience = request.experience.to_string();
    fill_template(
        QUESTION_PROMPT_TEMPLATE,
        &[
            ("count", count.as_str()),
            ("position", request.position.as_str()),
            ("description", request.description.as_str()),
            ("experience", experience.as_str()),
            ("tech_stack", request.tech_stack.as_str()),
            ("output_contract", JSON_ARRAY_ONLY_INSTRUCTION),
        ],
    )
}

/// Renders the scoring prompt for one question.
pub fn build_scoring_prompt(question: &str, reference_answer: &str, candidate_answer: &str) -> String {
    fill_template(
        SCORING_PROMPT_TEMPLATE,
        &[
            ("question", question),
            ("reference_answer", reference_answer),
            ("candidate_answer", candidate_answer),
            ("output_contract", JSON_ARRAY_ONLY_INSTRUCTION),
        ],
    )
}

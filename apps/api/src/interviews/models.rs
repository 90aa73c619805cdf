use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Job parameters supplied by the user. Validated before any generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRequest {
    pub position: String,
    pub description: String,
    /// Years of experience. Accepts a JSON number or a numeric string.
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub experience: f64,
    /// Comma-separated list, stored as entered.
    pub tech_stack: String,
}

/// One generated question with its reference answer. Only ever produced from model output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QAPair {
    pub question: String,
    pub answer: String,
}

/// The persisted interview. `id`, `user_id` and `created_at` never change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRecord {
    pub id: String,
    pub position: String,
    pub description: String,
    pub experience: f64,
    pub tech_stack: String,
    pub user_id: String,
    pub questions: Vec<QAPair>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Evaluation of one candidate answer.
///
/// `score` is `None` when scoring that question failed; `error` then says why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerScore {
    pub question_index: usize,
    pub score: Option<u8>,
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Scores for one interview, stored under the interview's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewFeedback {
    pub id: String,
    pub interview_id: String,
    pub user_id: String,
    pub scores: Vec<AnswerScore>,
    pub overall_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Accepts a JSON number or a string holding one.
pub(crate) fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("expected a number, got {s:?}"))),
    }
}

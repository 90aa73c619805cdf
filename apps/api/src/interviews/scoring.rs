//! Answer Scoring: compares each candidate answer with its reference answer.
//!
//! One generation call per question, issued concurrently and joined in question order.
//! A failed call degrades only its own entry (`score: None` plus the error); the batch
//! fails as a whole only when no question could be scored, and then nothing is stored.

use futures::future::join_all;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::interviews::models::{
    number_or_numeric_string, AnswerScore, InterviewFeedback, InterviewRecord, QAPair,
};
use crate::interviews::prompts::build_scoring_prompt;
use crate::llm_client::response::decode_records;
use crate::llm_client::{LlmClient, LlmError};
use crate::store::{server_timestamp, DocumentStore, Fields, StoreError};

pub const FEEDBACK_COLLECTION: &str = "InterviewFeedback";

pub const UNAVAILABLE_FEEDBACK: &str =
    "Feedback for this answer is unavailable right now. Please try again later.";

/// Record shape expected back from a scoring prompt.
#[derive(Debug, Deserialize)]
struct ScoreRecord {
    #[serde(deserialize_with = "number_or_numeric_string")]
    score: f64,
    feedback: String,
}

/// Clamps a model score onto 0..=100.
fn normalize_score(raw: f64) -> u8 {
    raw.clamp(0.0, 100.0).round() as u8
}

async fn score_one(
    llm: &LlmClient,
    question_index: usize,
    pair: &QAPair,
    candidate_answer: &str,
) -> Result<AnswerScore, LlmError> {
    let prompt = build_scoring_prompt(&pair.question, &pair.answer, candidate_answer);
    let records = llm.generate(&prompt).await?;

    let record = decode_records::<ScoreRecord>(records)?
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::UnexpectedShape("model returned no score".to_string()))?;

    if !record.score.is_finite() {
        return Err(LlmError::UnexpectedShape("non-finite score".to_string()));
    }

    Ok(AnswerScore {
        question_index,
        score: Some(normalize_score(record.score)),
        feedback: record.feedback.trim().to_string(),
        error: None,
    })
}

fn degraded(question_index: usize, error: &LlmError) -> AnswerScore {
    warn!("Scoring question {question_index} failed: {error}");
    AnswerScore {
        question_index,
        score: None,
        feedback: UNAVAILABLE_FEEDBACK.to_string(),
        error: Some(error.to_string()),
    }
}

/// Scores every answer, keeping per-question outcomes. Output order is question order.
async fn score_each(
    llm: &LlmClient,
    questions: &[QAPair],
    candidate_answers: &[String],
) -> Result<Vec<Result<AnswerScore, LlmError>>, AppError> {
    if questions.is_empty() {
        return Err(AppError::Validation(
            "Interview has no questions to score".to_string(),
        ));
    }
    if questions.len() != candidate_answers.len() {
        return Err(AppError::Validation(format!(
            "Expected {} answers, got {}",
            questions.len(),
            candidate_answers.len()
        )));
    }

    let calls = questions
        .iter()
        .zip(candidate_answers)
        .enumerate()
        .map(|(i, (pair, answer))| score_one(llm, i, pair, answer));

    Ok(join_all(calls).await)
}

/// Scores `candidate_answers[i]` against `questions[i]` for every index.
/// Per-question failures become degraded entries; the result always has one entry per question.
/// Fails with the first error only when no question could be scored.
pub async fn score_answers(
    llm: &LlmClient,
    questions: &[QAPair],
    candidate_answers: &[String],
) -> Result<Vec<AnswerScore>, AppError> {
    let results = score_each(llm, questions, candidate_answers).await?;

    if results.iter().all(Result::is_err) {
        let first = results
            .into_iter()
            .find_map(Result::err)
            .unwrap_or(LlmError::EmptyContent);
        return Err(first.into());
    }

    Ok(results
        .into_iter()
        .enumerate()
        .map(|(i, result)| result.unwrap_or_else(|e| degraded(i, &e)))
        .collect())
}

/// Mean of the scores that were produced.
pub fn overall_score(scores: &[AnswerScore]) -> Option<f64> {
    let produced: Vec<f64> = scores.iter().filter_map(|s| s.score).map(f64::from).collect();
    if produced.is_empty() {
        None
    } else {
        Some(produced.iter().sum::<f64>() / produced.len() as f64)
    }
}

/// Scores the answers for `interview` and stores the result under the interview id.
/// An interview is scored once; a second submission is a `Conflict`.
pub async fn submit_feedback(
    store: &dyn DocumentStore,
    llm: &LlmClient,
    interview: &InterviewRecord,
    owner_id: &str,
    candidate_answers: &[String],
) -> Result<InterviewFeedback, AppError> {
    if interview.user_id != owner_id {
        return Err(AppError::Forbidden);
    }

    // Submitted answers are final.
    if get_feedback(store, &interview.id).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Answers for interview {} were already submitted",
            interview.id
        )));
    }

    let scores = score_answers(llm, &interview.questions, candidate_answers).await?;
    let overall = overall_score(&scores);

    let mut fields = Fields::new();
    fields.insert(
        "interviewId".to_string(),
        Value::String(interview.id.clone()),
    );
    fields.insert("userId".to_string(), Value::String(owner_id.to_string()));
    fields.insert(
        "scores".to_string(),
        serde_json::to_value(&scores).map_err(|e| StoreError::Decode(e.to_string()))?,
    );
    fields.insert(
        "overallScore".to_string(),
        serde_json::to_value(overall).map_err(|e| StoreError::Decode(e.to_string()))?,
    );
    fields.insert("createdAt".to_string(), server_timestamp());

    store
        .set(FEEDBACK_COLLECTION, &interview.id, fields)
        .await?;

    info!(
        "Stored feedback for interview {} ({}/{} answers scored)",
        interview.id,
        scores.iter().filter(|s| s.score.is_some()).count(),
        scores.len()
    );

    let saved = get_feedback(store, &interview.id).await?;
    saved.ok_or_else(|| {
        AppError::Persistence(StoreError::NotFound {
            collection: FEEDBACK_COLLECTION.to_string(),
            id: interview.id.clone(),
        })
    })
}

pub async fn get_feedback(
    store: &dyn DocumentStore,
    interview_id: &str,
) -> Result<Option<InterviewFeedback>, AppError> {
    match store.get(FEEDBACK_COLLECTION, interview_id).await? {
        Some(doc) => Ok(Some(doc.decode()?)),
        None => Ok(None),
    }
}

//! Interview Record Manager: create-or-update of interview records.
//!
//! Flow: validate → generate questions → single persistence call.
//!
//! Nothing is written until generation has fully succeeded, so a failed or abandoned
//! save leaves the stored record exactly as it was. `id`, `userId` and `createdAt`
//! are only ever written by the create path.

use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::interviews::models::{InterviewRecord, InterviewRequest, QAPair};
use crate::interviews::prompts::{build_question_prompt, QUESTION_COUNT};
use crate::interviews::validation::validate_request;
use crate::llm_client::response::decode_records;
use crate::llm_client::{LlmClient, LlmError};
use crate::store::{server_timestamp, to_fields, DocumentStore, StoreError};

pub const INTERVIEWS_COLLECTION: &str = "Interviews";

/// Generates questions for `request`. An empty question list is rejected.
pub async fn generate_questions(
    llm: &LlmClient,
    request: &InterviewRequest,
) -> Result<Vec<QAPair>, AppError> {
    let prompt = build_question_prompt(request);
    let records = llm.generate(&prompt).await?;
    let questions: Vec<QAPair> = decode_records(records)?;

    if questions.is_empty() {
        return Err(LlmError::UnexpectedShape("model returned no questions".to_string()).into());
    }
    if questions.len() != QUESTION_COUNT {
        warn!(
            "Requested {} questions, model returned {}",
            QUESTION_COUNT,
            questions.len()
        );
    }

    Ok(questions)
}

/// Creates a new interview (`existing = None`) or regenerates an existing one.
///
/// Update overwrites the request fields and `questions` and stamps `updatedAt`.
/// Concurrent saves to the same id are last-write-wins.
pub async fn save_interview(
    store: &dyn DocumentStore,
    llm: &LlmClient,
    request: InterviewRequest,
    existing: Option<&InterviewRecord>,
    owner_id: &str,
) -> Result<InterviewRecord, AppError> {
    if let Some(record) = existing {
        if record.user_id != owner_id {
            return Err(AppError::Forbidden);
        }
    }

    validate_request(&request)?;

    let questions = generate_questions(llm, &request).await?;

    let mut fields = to_fields(&request)?;
    fields.insert(
        "questions".to_string(),
        serde_json::to_value(&questions).map_err(|e| StoreError::Decode(e.to_string()))?,
    );

    let id = match existing {
        Some(record) => {
            fields.insert("updatedAt".to_string(), server_timestamp());
            store
                .update(INTERVIEWS_COLLECTION, &record.id, fields)
                .await?;
            info!(
                "Updated interview {} with {} questions for user {}",
                record.id,
                questions.len(),
                owner_id
            );
            record.id.clone()
        }
        None => {
            fields.insert("userId".to_string(), Value::String(owner_id.to_string()));
            fields.insert("createdAt".to_string(), server_timestamp());
            let id = store.create(INTERVIEWS_COLLECTION, fields).await?;
            info!(
                "Created interview {} with {} questions for user {}",
                id,
                questions.len(),
                owner_id
            );
            id
        }
    };

    let saved = get_interview(store, &id).await?;
    saved.ok_or_else(|| {
        AppError::Persistence(StoreError::NotFound {
            collection: INTERVIEWS_COLLECTION.to_string(),
            id,
        })
    })
}

pub async fn get_interview(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<InterviewRecord>, AppError> {
    match store.get(INTERVIEWS_COLLECTION, id).await? {
        Some(doc) => Ok(Some(doc.decode()?)),
        None => Ok(None),
    }
}

/// Loads an interview that must exist and belong to `owner_id`.
pub async fn get_owned_interview(
    store: &dyn DocumentStore,
    id: &str,
    owner_id: &str,
) -> Result<InterviewRecord, AppError> {
    let record = get_interview(store, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))?;

    if record.user_id != owner_id {
        return Err(AppError::Forbidden);
    }
    Ok(record)
}

/// All interviews owned by `owner_id`, newest first.
pub async fn list_interviews(
    store: &dyn DocumentStore,
    owner_id: &str,
) -> Result<Vec<InterviewRecord>, AppError> {
    let docs = store
        .find_by(
            INTERVIEWS_COLLECTION,
            "userId",
            &Value::String(owner_id.to_string()),
        )
        .await?;

    let mut records = docs
        .into_iter()
        .map(|doc| doc.decode::<InterviewRecord>())
        .collect::<Result<Vec<_>, _>>()?;
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(records)
}

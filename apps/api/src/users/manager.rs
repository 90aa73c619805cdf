//! User records: created once on first sign-in, never overwritten afterwards.

use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::store::{server_timestamp, DocumentStore, Fields, StoreError};
use crate::users::models::{UserProfile, UserRecord};

pub const USERS_COLLECTION: &str = "Users";

pub async fn get_user(
    store: &dyn DocumentStore,
    user_id: &str,
) -> Result<Option<UserRecord>, AppError> {
    match store.get(USERS_COLLECTION, user_id).await? {
        Some(doc) => Ok(Some(doc.decode()?)),
        None => Ok(None),
    }
}

/// Returns the stored record for `user_id`, creating it from `profile` if absent.
/// The flag is `true` when this call created it.
///
/// Two first sign-ins racing each other both write; the later one wins.
pub async fn ensure_user(
    store: &dyn DocumentStore,
    user_id: &str,
    profile: &UserProfile,
) -> Result<(UserRecord, bool), AppError> {
    if let Some(existing) = get_user(store, user_id).await? {
        return Ok((existing, false));
    }

    let mut fields = Fields::new();
    fields.insert("id".to_string(), Value::String(user_id.to_string()));
    fields.insert("name".to_string(), Value::String(profile.display_name()));
    fields.insert(
        "email".to_string(),
        Value::String(profile.email_or_placeholder()),
    );
    fields.insert(
        "imageUrl".to_string(),
        profile
            .image_url
            .clone()
            .map(Value::String)
            .unwrap_or(Value::Null),
    );
    fields.insert("createdAt".to_string(), server_timestamp());
    fields.insert("updatedAt".to_string(), server_timestamp());

    store.set(USERS_COLLECTION, user_id, fields).await?;
    info!("Created user record {user_id}");

    let saved = get_user(store, user_id).await?;
    let record = saved.ok_or_else(|| {
        AppError::Persistence(StoreError::NotFound {
            collection: USERS_COLLECTION.to_string(),
            id: user_id.to_string(),
        })
    })?;
    Ok((record, true))
}

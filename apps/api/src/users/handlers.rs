use axum::{extract::State, http::StatusCode, Json};

use crate::auth::OwnerId;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::state::AppState;
use crate::users::manager::{ensure_user, get_user};
use crate::users::models::{UserProfile, UserRecord};

/// PUT /api/v1/users/me
///
/// Called on sign-in. 201 when the record was created, 200 when it already existed.
pub async fn handle_sign_in(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    AppJson(profile): AppJson<UserProfile>,
) -> Result<(StatusCode, Json<UserRecord>), AppError> {
    let (user, created) = ensure_user(state.store.as_ref(), &owner_id, &profile).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(user)))
}

/// GET /api/v1/users/me
pub async fn handle_get_me(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
) -> Result<Json<UserRecord>, AppError> {
    let user = get_user(state.store.as_ref(), &owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {owner_id} not found")))?;
    Ok(Json(user))
}

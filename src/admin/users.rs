// Account administration (admin only)

use axum::{
    extract::{Path, State},
    Json,
};

use crate::auth::models::{UpdateUserRequest, UserResponse};
use crate::error::ApiError;
use crate::validation::ValidatedJson;
use crate::AppState;

/// GET /api/admin/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.auth.list_users().await?;
    tracing::debug!("Retrieved {} users", users.len());
    Ok(Json(users))
}

/// PUT /api/admin/users/:id
///
/// A role change reaches the account's tokens only after it logs in again.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(state.auth.update_user(id, request).await?))
}

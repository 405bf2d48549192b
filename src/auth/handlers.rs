// HTTP handlers for authentication and profile endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::{
    middleware::AuthenticatedUser,
    models::{AuthResponse, LoginRequest, SignupRequest, UpdateProfileRequest, UserResponse},
};
use crate::error::ApiError;
use crate::validation::ValidatedJson;
use crate::AppState;

/// Register a new user
/// POST /api/auth/signup
pub async fn signup_handler(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let response = state.auth.signup(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login a user
/// POST /api/auth/login
pub async fn login_handler(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let response = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(response))
}

/// GET /api/user/profile
pub async fn get_profile_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(state.auth.profile(user.user_id).await?))
}

/// PUT /api/user/profile
pub async fn update_profile_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(state.auth.update_profile(user.user_id, request).await?))
}

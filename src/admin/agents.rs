// Agent directory management
// GET/POST /api/admin/agents, GET/PUT/DELETE /api/admin/agents/:id

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::MySqlPool;

use crate::admin::nothing_to_update;
use crate::auth::models::normalize_email;
use crate::db;
use crate::error::ApiError;
use crate::models::{Agent, CreateAgent, UpdateAgent};
use crate::query::PartialUpdate;
use crate::validation::ValidatedJson;
use crate::AppState;

async fn fetch_agent(pool: &MySqlPool, id: i32) -> Result<Agent, ApiError> {
    sqlx::query_as::<_, Agent>(
        "SELECT id, name, email, phone, designation, created_at FROM agent WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Agent", id))
}

fn duplicate_email(error: sqlx::Error, email: Option<&str>) -> ApiError {
    match email {
        Some(email) if db::is_unique_violation(&error) => ApiError::Conflict {
            message: format!("Agent with email '{}' already exists", email),
        },
        _ => ApiError::from(error),
    }
}

/// GET /api/admin/agents
pub async fn list_agents(State(state): State<AppState>) -> Result<Json<Vec<Agent>>, ApiError> {
    let agents = sqlx::query_as::<_, Agent>(
        "SELECT id, name, email, phone, designation, created_at FROM agent ORDER BY name",
    )
    .fetch_all(&state.db)
    .await?;

    tracing::debug!("Retrieved {} agents", agents.len());
    Ok(Json(agents))
}

/// POST /api/admin/agents
pub async fn create_agent(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAgent>,
) -> Result<(StatusCode, Json<Agent>), ApiError> {
    let email = normalize_email(&payload.email);

    let result = sqlx::query(
        "INSERT INTO agent (name, email, phone, designation) VALUES (?, ?, ?, ?)",
    )
    .bind(payload.name.trim())
    .bind(&email)
    .bind(payload.phone.trim())
    .bind(&payload.designation)
    .execute(&state.db)
    .await
    .map_err(|e| duplicate_email(e, Some(&email)))?;

    let agent = fetch_agent(&state.db, db::inserted_id(&result)?).await?;

    tracing::info!("Created agent id={} ({})", agent.id, agent.email);
    Ok((StatusCode::CREATED, Json(agent)))
}

/// GET /api/admin/agents/:id
pub async fn get_agent(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Agent>, ApiError> {
    Ok(Json(fetch_agent(&state.db, id).await?))
}

/// PUT /api/admin/agents/:id
pub async fn update_agent(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateAgent>,
) -> Result<Json<Agent>, ApiError> {
    let email = payload.email.as_deref().map(normalize_email);

    let mut update = PartialUpdate::new("agent");
    update
        .set("name", payload.name.as_deref().map(str::trim))
        .set("email", email.as_deref())
        .set("phone", payload.phone.as_deref().map(str::trim))
        .set("designation", payload.designation.as_ref().map(Option::as_deref));
    let mut query = update.where_id(id).ok_or_else(nothing_to_update)?;

    query
        .build()
        .execute(&state.db)
        .await
        .map_err(|e| duplicate_email(e, email.as_deref()))?;

    let agent = fetch_agent(&state.db, id).await?;
    tracing::info!("Updated agent id={}", id);
    Ok(Json(agent))
}

/// DELETE /api/admin/agents/:id
///
/// Listings assigned to the agent keep their row with `agent_id` cleared.
pub async fn delete_agent(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("DELETE FROM agent WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Agent", id));
    }

    tracing::info!("Deleted agent id={}", id);
    Ok(StatusCode::NO_CONTENT)
}

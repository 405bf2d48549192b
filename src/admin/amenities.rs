// Amenity management
// GET/POST /api/admin/amenities, GET/PUT/DELETE /api/admin/amenities/:id

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::MySqlPool;

use crate::admin::nothing_to_update;
use crate::db;
use crate::error::ApiError;
use crate::models::{Amenity, CreateAmenity, UpdateAmenity};
use crate::query::PartialUpdate;
use crate::validation::ValidatedJson;
use crate::AppState;

async fn fetch_amenity(pool: &MySqlPool, id: i32) -> Result<Amenity, ApiError> {
    sqlx::query_as::<_, Amenity>(
        "SELECT id, name, category, icon, created_at FROM amenities WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| {
        tracing::debug!("Amenity with id {} not found", id);
        ApiError::not_found("Amenity", id)
    })
}

fn duplicate_name(name: &str) -> ApiError {
    ApiError::Conflict {
        message: format!("Amenity with name '{}' already exists", name),
    }
}

/// Handler for GET /api/admin/amenities
#[utoipa::path(
    get,
    path = "/api/admin/amenities",
    responses(
        (status = 200, description = "All amenities ordered by name", body = Vec<Amenity>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Role not allowed")
    ),
    security(("bearer_auth" = [])),
    tag = "amenities"
)]
pub async fn list_amenities(State(state): State<AppState>) -> Result<Json<Vec<Amenity>>, ApiError> {
    tracing::debug!("Fetching all amenities");

    let amenities = sqlx::query_as::<_, Amenity>(
        "SELECT id, name, category, icon, created_at FROM amenities ORDER BY name",
    )
    .fetch_all(&state.db)
    .await?;

    tracing::debug!("Retrieved {} amenities", amenities.len());
    Ok(Json(amenities))
}

/// Handler for POST /api/admin/amenities
#[utoipa::path(
    post,
    path = "/api/admin/amenities",
    request_body = CreateAmenity,
    responses(
        (status = 201, description = "Amenity created", body = Amenity),
        (status = 400, description = "Invalid input data"),
        (status = 409, description = "Amenity name already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "amenities"
)]
pub async fn create_amenity(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAmenity>,
) -> Result<(StatusCode, Json<Amenity>), ApiError> {
    let name = payload.name.trim();
    tracing::debug!("Creating amenity: {}", name);

    let result = sqlx::query("INSERT INTO amenities (name, category, icon) VALUES (?, ?, ?)")
        .bind(name)
        .bind(&payload.category)
        .bind(&payload.icon)
        .execute(&state.db)
        .await
        .map_err(|e| {
            if db::is_unique_violation(&e) {
                return duplicate_name(name);
            }
            ApiError::from(e)
        })?;

    let amenity = fetch_amenity(&state.db, db::inserted_id(&result)?).await?;

    tracing::info!("Created amenity id={} ({})", amenity.id, amenity.name);
    Ok((StatusCode::CREATED, Json(amenity)))
}

/// Handler for GET /api/admin/amenities/:id
#[utoipa::path(
    get,
    path = "/api/admin/amenities/{id}",
    params(("id" = i32, Path, description = "Amenity ID")),
    responses(
        (status = 200, description = "Amenity found", body = Amenity),
        (status = 404, description = "Amenity not found")
    ),
    security(("bearer_auth" = [])),
    tag = "amenities"
)]
pub async fn get_amenity(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Amenity>, ApiError> {
    Ok(Json(fetch_amenity(&state.db, id).await?))
}

/// Handler for PUT /api/admin/amenities/:id
///
/// Only the supplied fields are written; the stored row is returned.
#[utoipa::path(
    put,
    path = "/api/admin/amenities/{id}",
    params(("id" = i32, Path, description = "Amenity ID")),
    request_body = UpdateAmenity,
    responses(
        (status = 200, description = "Amenity updated", body = Amenity),
        (status = 400, description = "Empty or invalid body"),
        (status = 404, description = "Amenity not found"),
        (status = 409, description = "Amenity name already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "amenities"
)]
pub async fn update_amenity(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateAmenity>,
) -> Result<Json<Amenity>, ApiError> {
    tracing::debug!("Updating amenity with id: {}", id);

    let name = payload.name.as_deref().map(str::trim);
    let mut update = PartialUpdate::new("amenities");
    update
        .set("name", name)
        .set("category", payload.category.as_ref().map(Option::as_deref))
        .set("icon", payload.icon.as_ref().map(Option::as_deref));
    let columns = update.columns().join(", ");
    let mut query = update.where_id(id).ok_or_else(nothing_to_update)?;

    query.build().execute(&state.db).await.map_err(|e| {
        if db::is_unique_violation(&e) {
            return duplicate_name(name.unwrap_or_default());
        }
        ApiError::from(e)
    })?;

    let amenity = fetch_amenity(&state.db, id).await?;
    tracing::info!("Updated amenity id={} ({})", id, columns);
    Ok(Json(amenity))
}

/// Handler for DELETE /api/admin/amenities/:id
#[utoipa::path(
    delete,
    path = "/api/admin/amenities/{id}",
    params(("id" = i32, Path, description = "Amenity ID")),
    responses(
        (status = 204, description = "Amenity deleted"),
        (status = 404, description = "Amenity not found")
    ),
    security(("bearer_auth" = [])),
    tag = "amenities"
)]
pub async fn delete_amenity(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("DELETE FROM amenities WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        tracing::debug!("Amenity with id {} not found for deletion", id);
        return Err(ApiError::not_found("Amenity", id));
    }

    tracing::info!("Deleted amenity id={}", id);
    Ok(StatusCode::NO_CONTENT)
}

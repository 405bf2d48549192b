// Property listing management
// GET/POST /api/admin/properties, GET/PUT/DELETE /api/admin/properties/:id

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::MySqlPool;

use crate::admin::nothing_to_update;
use crate::db;
use crate::error::ApiError;
use crate::models::{CreateProperty, Property, PropertyStatus, UpdateProperty};
use crate::query::PartialUpdate;
use crate::validation::ValidatedJson;
use crate::AppState;

async fn fetch_property(pool: &MySqlPool, id: i32) -> Result<Property, ApiError> {
    sqlx::query_as::<_, Property>(
        r#"
        SELECT id, title, description, location, price, property_type, status,
               bedrooms, area_sqft, agent_id, featured, created_at, updated_at
        FROM properties
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| {
        tracing::debug!("Property with id {} not found", id);
        ApiError::not_found("Property", id)
    })
}

/// Maps a write error, turning a dangling agent reference into a 400
fn write_error(error: sqlx::Error, agent_id: Option<i32>) -> ApiError {
    if db::is_foreign_key_violation(&error) {
        let agent = agent_id.map(|id| id.to_string()).unwrap_or_default();
        return ApiError::BadRequest(format!("Agent with id {} does not exist", agent));
    }
    ApiError::from(error)
}

/// Columns touched by an update; explicit nulls clear nullable columns
fn property_changes(payload: &UpdateProperty) -> PartialUpdate<'_> {
    let mut update = PartialUpdate::new("properties");
    update
        .set("title", payload.title.as_deref().map(str::trim))
        .set("description", payload.description.as_ref().map(Option::as_deref))
        .set("location", payload.location.as_deref().map(str::trim))
        .set("price", payload.price)
        .set("property_type", payload.property_type.map(|t| t.as_str()))
        .set("status", payload.status.map(|s| s.as_str()))
        .set("bedrooms", payload.bedrooms)
        .set("area_sqft", payload.area_sqft)
        .set("agent_id", payload.agent_id)
        .set("featured", payload.featured);
    update
}

/// Handler for GET /api/admin/properties
#[utoipa::path(
    get,
    path = "/api/admin/properties",
    responses(
        (status = 200, description = "All listings, newest first", body = Vec<Property>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Role not allowed")
    ),
    security(("bearer_auth" = [])),
    tag = "properties"
)]
pub async fn list_properties(
    State(state): State<AppState>,
) -> Result<Json<Vec<Property>>, ApiError> {
    tracing::debug!("Fetching all properties");

    let properties = sqlx::query_as::<_, Property>(
        r#"
        SELECT id, title, description, location, price, property_type, status,
               bedrooms, area_sqft, agent_id, featured, created_at, updated_at
        FROM properties
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    tracing::debug!("Retrieved {} properties", properties.len());
    Ok(Json(properties))
}

/// Handler for POST /api/admin/properties
#[utoipa::path(
    post,
    path = "/api/admin/properties",
    request_body = CreateProperty,
    responses(
        (status = 201, description = "Listing created", body = Property),
        (status = 400, description = "Invalid input data or unknown agent")
    ),
    security(("bearer_auth" = [])),
    tag = "properties"
)]
pub async fn create_property(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProperty>,
) -> Result<(StatusCode, Json<Property>), ApiError> {
    tracing::debug!("Creating property: {}", payload.title);

    let result = sqlx::query(
        r#"
        INSERT INTO properties
            (title, description, location, price, property_type, status,
             bedrooms, area_sqft, agent_id, featured)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.title.trim())
    .bind(&payload.description)
    .bind(payload.location.trim())
    .bind(payload.price)
    .bind(payload.property_type.as_str())
    .bind(payload.status.unwrap_or(PropertyStatus::Available).as_str())
    .bind(payload.bedrooms)
    .bind(payload.area_sqft)
    .bind(payload.agent_id)
    .bind(payload.featured.unwrap_or(false))
    .execute(&state.db)
    .await
    .map_err(|e| write_error(e, payload.agent_id))?;

    let property = fetch_property(&state.db, db::inserted_id(&result)?).await?;

    tracing::info!("Created property id={} ({})", property.id, property.title);
    Ok((StatusCode::CREATED, Json(property)))
}

/// Handler for GET /api/admin/properties/:id
#[utoipa::path(
    get,
    path = "/api/admin/properties/{id}",
    params(("id" = i32, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Listing found", body = Property),
        (status = 404, description = "Listing not found")
    ),
    security(("bearer_auth" = [])),
    tag = "properties"
)]
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Property>, ApiError> {
    Ok(Json(fetch_property(&state.db, id).await?))
}

/// Handler for PUT /api/admin/properties/:id
#[utoipa::path(
    put,
    path = "/api/admin/properties/{id}",
    params(("id" = i32, Path, description = "Property ID")),
    request_body = UpdateProperty,
    responses(
        (status = 200, description = "Listing updated", body = Property),
        (status = 400, description = "Empty or invalid body"),
        (status = 404, description = "Listing not found")
    ),
    security(("bearer_auth" = [])),
    tag = "properties"
)]
pub async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateProperty>,
) -> Result<Json<Property>, ApiError> {
    tracing::debug!("Updating property with id: {}", id);

    let update = property_changes(&payload);
    let columns = update.columns().join(", ");
    let mut query = update.where_id(id).ok_or_else(nothing_to_update)?;

    query
        .build()
        .execute(&state.db)
        .await
        .map_err(|e| write_error(e, payload.agent_id.flatten()))?;

    let property = fetch_property(&state.db, id).await?;
    tracing::info!("Updated property id={} ({})", id, columns);
    Ok(Json(property))
}

/// Handler for DELETE /api/admin/properties/:id
///
/// Visits keep their row with the property reference cleared.
#[utoipa::path(
    delete,
    path = "/api/admin/properties/{id}",
    params(("id" = i32, Path, description = "Property ID")),
    responses(
        (status = 204, description = "Listing deleted"),
        (status = 404, description = "Listing not found")
    ),
    security(("bearer_auth" = [])),
    tag = "properties"
)]
pub async fn delete_property(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("DELETE FROM properties WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        tracing::debug!("Property with id {} not found for deletion", id);
        return Err(ApiError::not_found("Property", id));
    }

    tracing::info!("Deleted property id={}", id);
    Ok(StatusCode::NO_CONTENT)
}

// HTTP handlers for visit bookings and lead management

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::db;
use crate::error::ApiError;
use crate::validation::ValidatedJson;
use crate::visits::{
    analytics::{series_start, VisitAnalytics},
    models::{CreateVisitRequest, UpdateVisitStatusRequest, Visit, VisitPage},
    query::{VisitFilter, VisitQueryParams},
};
use crate::AppState;

/// Book a site visit from the public site
/// POST /api/visits
pub async fn create_visit_handler(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateVisitRequest>,
) -> Result<(StatusCode, Json<Visit>), ApiError> {
    request
        .check_date(Utc::now().date_naive())
        .map_err(ApiError::BadRequest)?;

    let visit = state.visits.create(&request).await.map_err(|e| {
        if db::is_foreign_key_violation(&e) {
            let property = request.property_id.map(|id| id.to_string()).unwrap_or_default();
            return ApiError::BadRequest(format!("Property with id {} does not exist", property));
        }
        ApiError::from(e)
    })?;

    tracing::info!(
        "Visit id={} booked for property {:?} on {}",
        visit.id,
        visit.property_id,
        visit.visit_date
    );
    Ok((StatusCode::CREATED, Json(visit)))
}

/// Filtered, paginated lead list
/// GET /api/admin/visits
pub async fn list_visits_handler(
    State(state): State<AppState>,
    Query(params): Query<VisitQueryParams>,
) -> Result<Json<VisitPage>, ApiError> {
    tracing::debug!("Fetching visits with query parameters: {:?}", params);

    let filter = VisitFilter::from_params(params).map_err(|e| ApiError::BadRequest(e.message))?;
    let (visits, total) = state.visits.list(&filter).await?;

    tracing::debug!("Query returned {} of {} visits", visits.len(), total);
    Ok(Json(VisitPage::new(visits, filter.page, filter.limit, total)))
}

/// Move a lead to another status
/// PUT /api/admin/visits/:id
pub async fn update_visit_status_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateVisitStatusRequest>,
) -> Result<Json<Visit>, ApiError> {
    if !state.visits.update_status(id, request.status).await? {
        return Err(ApiError::not_found("Visit", id));
    }

    let visit = state
        .visits
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Visit", id))?;

    tracing::info!("Visit id={} marked {}", id, visit.status);
    Ok(Json(visit))
}

/// GET /api/admin/visits/analytics
pub async fn visit_analytics_handler(
    State(state): State<AppState>,
) -> Result<Json<VisitAnalytics>, ApiError> {
    let today = Utc::now().date_naive();
    let since = series_start(today)
        .ok_or_else(|| ApiError::InternalError(format!("no monthly series for {}", today)))?;

    let status_rows = state.visits.status_counts().await?;
    let monthly_rows = state.visits.monthly_counts(since).await?;
    let top_properties = state.visits.top_properties().await?;

    Ok(Json(VisitAnalytics::assemble(
        status_rows,
        monthly_rows,
        top_properties,
        today,
    )))
}

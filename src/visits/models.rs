// Visit (lead) data models and DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::text_enum;
use crate::validation::{validate_not_blank, validate_phone};

/// Follow-up state of a site-visit booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl VisitStatus {
    pub const ALL: [VisitStatus; 4] = [
        VisitStatus::Pending,
        VisitStatus::Confirmed,
        VisitStatus::Completed,
        VisitStatus::Cancelled,
    ];
}

text_enum!(VisitStatus, "visit status", {
    Pending => "pending",
    Confirmed => "confirmed",
    Completed => "completed",
    Cancelled => "cancelled",
});

/// A visit row joined with the title of the listing it refers to
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Visit {
    pub id: i32,
    pub property_id: Option<i32>,
    pub property_title: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub visit_date: NaiveDate,
    pub message: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: VisitStatus,
    pub created_at: DateTime<Utc>,
}

/// Public booking form
/// POST /api/visits
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateVisitRequest {
    pub property_id: Option<i32>,
    #[validate(length(max = 255), custom = "validate_not_blank")]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom = "validate_phone")]
    pub phone: String,
    pub visit_date: NaiveDate,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

impl CreateVisitRequest {
    /// Bookings for days that have already passed are refused
    pub fn check_date(&self, today: NaiveDate) -> Result<(), String> {
        if self.visit_date < today {
            return Err("Visit date cannot be in the past".to_string());
        }
        Ok(())
    }
}

/// PUT /api/admin/visits/:id
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateVisitStatusRequest {
    pub status: VisitStatus,
}

/// One page of the lead list
#[derive(Debug, Serialize, ToSchema)]
pub struct VisitPage {
    pub visits: Vec<Visit>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl VisitPage {
    pub fn new(visits: Vec<Visit>, page: u32, limit: u32, total: i64) -> Self {
        let limit_i64 = i64::from(limit.max(1));
        Self {
            visits,
            page,
            limit,
            total,
            total_pages: (total + limit_i64 - 1) / limit_i64,
        }
    }
}

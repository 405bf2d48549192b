// Lead analytics assembled from grouped counts

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use sqlx::FromRow;
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::visits::models::VisitStatus;

/// Number of calendar months in the monthly series, current month included
pub const MONTHS_IN_SERIES: u32 = 12;
/// Number of listings in the top-properties ranking
pub const TOP_PROPERTIES: i64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StatusCount {
    pub status: VisitStatus,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlyCount {
    /// YYYY-MM
    pub month: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct PropertyVisitCount {
    pub property_id: i32,
    pub title: String,
    pub visits: i64,
}

/// GET /api/admin/visits/analytics response
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VisitAnalytics {
    pub total_visits: i64,
    /// Every status, including those with no visits
    pub by_status: Vec<StatusCount>,
    /// Share of visits marked completed, in percent with two decimals
    pub conversion_rate: f64,
    /// Visits created per month, oldest first, months without visits as zero
    pub monthly: Vec<MonthlyCount>,
    pub top_properties: Vec<PropertyVisitCount>,
}

/// First day of the oldest month in the series ending with `today`'s month
pub fn series_start(today: NaiveDate) -> Option<NaiveDate> {
    today
        .with_day(1)?
        .checked_sub_months(Months::new(MONTHS_IN_SERIES - 1))
}

fn month_label(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

impl VisitAnalytics {
    /// Build the report from grouped rows
    ///
    /// `status_rows` are `(status, count)` pairs; `monthly_rows` are
    /// `(YYYY-MM, count)` pairs for months starting at [`series_start`].
    pub fn assemble(
        status_rows: Vec<(String, i64)>,
        monthly_rows: Vec<(String, i64)>,
        top_properties: Vec<PropertyVisitCount>,
        today: NaiveDate,
    ) -> Self {
        let total_visits: i64 = status_rows.iter().map(|(_, count)| count).sum();

        let mut per_status: HashMap<VisitStatus, i64> = HashMap::new();
        for (label, count) in status_rows {
            match label.parse::<VisitStatus>() {
                Ok(status) => *per_status.entry(status).or_default() += count,
                Err(e) => tracing::warn!("Skipping visits with {}", e),
            }
        }
        let by_status: Vec<StatusCount> = VisitStatus::ALL
            .iter()
            .map(|status| StatusCount {
                status: *status,
                count: per_status.get(status).copied().unwrap_or(0),
            })
            .collect();

        let completed = per_status.get(&VisitStatus::Completed).copied().unwrap_or(0);
        let conversion_rate = conversion_rate(completed, total_visits);

        let per_month: HashMap<String, i64> = monthly_rows.into_iter().collect();
        let monthly = series_start(today)
            .map(|start| {
                (0..MONTHS_IN_SERIES)
                    .filter_map(|offset| start.checked_add_months(Months::new(offset)))
                    .map(|date| {
                        let month = month_label(date);
                        let count = per_month.get(&month).copied().unwrap_or(0);
                        MonthlyCount { month, count }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            total_visits,
            by_status,
            conversion_rate,
            monthly,
            top_properties,
        }
    }
}

/// Percentage of `completed` in `total`, rounded to two decimals; 0 when empty
pub fn conversion_rate(completed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let rate = completed as f64 / total as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

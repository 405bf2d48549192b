use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::db;
use crate::visits::{
    analytics::{PropertyVisitCount, TOP_PROPERTIES},
    models::{CreateVisitRequest, Visit, VisitStatus},
    query::VisitFilter,
};

/// Repository for the `visit` table
#[derive(Clone)]
pub struct VisitRepository {
    pool: MySqlPool,
}

impl VisitRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// One page of visits matching `filter`, plus the total number of matches
    pub async fn list(&self, filter: &VisitFilter) -> Result<(Vec<Visit>, i64), sqlx::Error> {
        let total: i64 = filter
            .count_query()
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let visits = filter
            .select_query()
            .build_query_as::<Visit>()
            .fetch_all(&self.pool)
            .await?;

        Ok((visits, total))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Visit>, sqlx::Error> {
        sqlx::query_as::<_, Visit>(
            r#"
            SELECT v.id, v.property_id, p.title AS property_title, v.name, v.email, v.phone,
                   v.visit_date, v.message, v.status, v.created_at
            FROM visit v
            LEFT JOIN properties p ON p.id = v.property_id
            WHERE v.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Store a booking as a pending visit and return the stored row
    pub async fn create(&self, request: &CreateVisitRequest) -> Result<Visit, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO visit (property_id, name, email, phone, visit_date, message, status)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.property_id)
        .bind(request.name.trim())
        .bind(request.email.trim().to_lowercase())
        .bind(request.phone.trim())
        .bind(request.visit_date)
        .bind(&request.message)
        .bind(VisitStatus::Pending.as_str())
        .execute(&self.pool)
        .await?;

        let id = db::inserted_id(&result)?;
        self.find_by_id(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    /// Returns false when no visit has the given id
    pub async fn update_status(&self, id: i32, status: VisitStatus) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE visit SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// `(status, count)` for every stored status
    pub async fn status_counts(&self) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) AS count FROM visit GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await
    }

    /// `(YYYY-MM, count)` of visits created on or after `since`
    pub async fn monthly_counts(&self, since: NaiveDate) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT DATE_FORMAT(created_at, '%Y-%m') AS month, COUNT(*) AS count
            FROM visit
            WHERE created_at >= ?
            GROUP BY month
            ORDER BY month
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
    }

    /// Listings with the most visits, most visited first
    pub async fn top_properties(&self) -> Result<Vec<PropertyVisitCount>, sqlx::Error> {
        sqlx::query_as::<_, PropertyVisitCount>(
            r#"
            SELECT p.id AS property_id, p.title, COUNT(*) AS visits
            FROM visit v
            JOIN properties p ON p.id = v.property_id
            GROUP BY p.id, p.title
            ORDER BY visits DESC, p.id
            LIMIT ?
            "#,
        )
        .bind(TOP_PROPERTIES)
        .fetch_all(&self.pool)
        .await
    }
}

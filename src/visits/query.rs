use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::{mysql::MySql, QueryBuilder};

use crate::visits::models::VisitStatus;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Query parameters of GET /api/admin/visits
/// All fields are optional
#[derive(Debug, Default, Deserialize)]
pub struct VisitQueryParams {
    /// Exact status: pending, confirmed, completed or cancelled
    pub status: Option<String>,
    pub property_id: Option<i32>,
    /// Partial match on visitor name, email or phone
    pub search: Option<String>,
    /// Earliest visit date, inclusive (YYYY-MM-DD)
    pub from: Option<String>,
    /// Latest visit date, inclusive (YYYY-MM-DD)
    pub to: Option<String>,
    /// Page number (1-indexed, defaults to 1)
    pub page: Option<u32>,
    /// Items per page (defaults to 10, at most 100)
    pub limit: Option<u32>,
}

/// Validated and normalized listing filter
#[derive(Debug, Clone, PartialEq)]
pub struct VisitFilter {
    pub status: Option<VisitStatus>,
    pub property_id: Option<i32>,
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct QueryError {
    pub message: String,
}

impl QueryError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl VisitFilter {
    /// Validates and normalizes raw query parameters
    pub fn from_params(params: VisitQueryParams) -> Result<Self, QueryError> {
        let status = normalize(params.status)
            .map(|s| {
                s.to_lowercase()
                    .parse::<VisitStatus>()
                    .map_err(|_| QueryError::new(format!(
                        "Invalid status '{}'. Must be one of pending, confirmed, completed, cancelled",
                        s
                    )))
            })
            .transpose()?;

        let from = parse_date(params.from, "from")?;
        let to = parse_date(params.to, "to")?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(QueryError::new("from cannot be later than to"));
            }
        }

        let page = params.page.unwrap_or(DEFAULT_PAGE);
        if page == 0 {
            return Err(QueryError::new("page must be a positive number (greater than 0)"));
        }

        let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
        if limit == 0 || limit > MAX_LIMIT {
            return Err(QueryError::new(format!("limit must be between 1 and {}", MAX_LIMIT)));
        }

        Ok(Self {
            status,
            property_id: params.property_id,
            search: normalize(params.search),
            from,
            to,
            page,
            limit,
        })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// `SELECT` for the requested page, newest visit date first
    pub fn select_query(&self) -> QueryBuilder<'static, MySql> {
        let mut builder = QueryBuilder::new(
            "SELECT v.id, v.property_id, p.title AS property_title, v.name, v.email, v.phone, \
             v.visit_date, v.message, v.status, v.created_at \
             FROM visit v LEFT JOIN properties p ON p.id = v.property_id",
        );
        self.push_filters(&mut builder);
        // limit and offset are validated integers, so they go in the SQL text
        builder.push(format!(
            " ORDER BY v.visit_date DESC, v.id DESC LIMIT {} OFFSET {}",
            self.limit,
            self.offset()
        ));
        builder
    }

    /// `COUNT(*)` over the same filter, ignoring pagination
    pub fn count_query(&self) -> QueryBuilder<'static, MySql> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM visit v");
        self.push_filters(&mut builder);
        builder
    }

    fn push_filters(&self, builder: &mut QueryBuilder<'static, MySql>) {
        let mut separator = " WHERE ";
        let mut next = |builder: &mut QueryBuilder<'static, MySql>| {
            builder.push(separator);
            separator = " AND ";
        };

        if let Some(status) = self.status {
            next(builder);
            builder.push("v.status = ").push_bind(status.as_str());
        }
        if let Some(property_id) = self.property_id {
            next(builder);
            builder.push("v.property_id = ").push_bind(property_id);
        }
        if let Some(ref search) = self.search {
            let pattern = format!("%{}%", escape_like(search));
            next(builder);
            builder
                .push("(v.name LIKE ")
                .push_bind(pattern.clone())
                .push(" OR v.email LIKE ")
                .push_bind(pattern.clone())
                .push(" OR v.phone LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(from) = self.from {
            next(builder);
            builder.push("v.visit_date >= ").push_bind(from);
        }
        if let Some(to) = self.to {
            next(builder);
            builder.push("v.visit_date <= ").push_bind(to);
        }
    }
}

/// Trims a parameter, treating blank values as absent
fn normalize(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_date(value: Option<String>, name: &str) -> Result<Option<NaiveDate>, QueryError> {
    normalize(value)
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map_err(|_| QueryError::new(format!("{} must be a date in YYYY-MM-DD format", name)))
        })
        .transpose()
}

/// Escapes LIKE wildcards so user input matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

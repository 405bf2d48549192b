// Validation utilities module
// Custom field rules and a JSON extractor that runs them

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use std::sync::OnceLock;
use validator::{Validate, ValidationError};

use crate::error::ApiError;

/// JSON body extractor that also runs `validator` rules
///
/// Unparseable bodies and missing required fields become 400s instead of
/// axum's default 422.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

fn phone_pattern() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    // Optional leading +, then 7-15 digits with spaces, dashes or parentheses between
    PHONE.get_or_init(|| Regex::new(r"^\+?[0-9(][0-9 ()\-]{5,18}[0-9]$").expect("phone pattern is valid"))
}

/// Validates a contact phone number
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if phone_pattern().is_match(phone.trim()) && (7..=15).contains(&digits) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_phone"))
    }
}

/// Validates that a listing price is positive
pub fn validate_positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_positive() && !price.is_zero() {
        Ok(())
    } else {
        Err(ValidationError::new("price_must_be_positive"))
    }
}

/// Deserializer for nullable columns in partial updates
///
/// Use with `#[serde(default)]`: an omitted field stays `None`, an explicit
/// `null` becomes `Some(None)`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Rejects strings that are empty once trimmed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("must_not_be_blank"))
    } else {
        Ok(())
    }
}

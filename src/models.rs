use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::{nullable, validate_not_blank, validate_phone, validate_positive_price};

/// A facility that can be attached to listings (pool, gym, clubhouse...)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Amenity {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Swimming Pool")]
    pub name: String,
    #[schema(example = "recreation")]
    pub category: Option<String>,
    #[schema(example = "pool.svg")]
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Used for POST /api/admin/amenities
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAmenity {
    #[validate(length(max = 255), custom = "validate_not_blank")]
    #[schema(example = "Swimming Pool")]
    pub name: String,
    #[validate(length(max = 64))]
    pub category: Option<String>,
    #[validate(length(max = 255))]
    pub icon: Option<String>,
}

/// Used for PUT /api/admin/amenities/{id}; omitted fields are left unchanged,
/// `null` clears `category` or `icon`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAmenity {
    #[validate(length(max = 255), custom = "validate_not_blank")]
    pub name: Option<String>,
    #[validate(length(max = 64))]
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub category: Option<Option<String>>,
    #[validate(length(max = 255))]
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub icon: Option<Option<String>>,
}

/// Kind of listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Apartment,
    Villa,
    Plot,
    Commercial,
}

/// Sales state of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    Available,
    Upcoming,
    Sold,
}

/// Raised when a stored label does not match any known variant
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Text conversions for enums stored as VARCHAR labels
macro_rules! text_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $label,)+
                }
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $ty {
            type Err = $crate::models::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($ty::$variant),)+
                    other => Err($crate::models::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $ty {
            type Error = $crate::models::UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

pub(crate) use text_enum;

text_enum!(PropertyType, "property type", {
    Apartment => "apartment",
    Villa => "villa",
    Plot => "plot",
    Commercial => "commercial",
});

text_enum!(PropertyStatus, "property status", {
    Available => "available",
    Upcoming => "upcoming",
    Sold => "sold",
});

/// A listing managed from the admin panel
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Property {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Lakeside Villa")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "Whitefield, Bengaluru")]
    pub location: String,
    #[schema(value_type = String, example = "12500000.00")]
    pub price: Decimal,
    #[sqlx(try_from = "String")]
    pub property_type: PropertyType,
    #[sqlx(try_from = "String")]
    pub status: PropertyStatus,
    pub bedrooms: Option<i32>,
    pub area_sqft: Option<i32>,
    pub agent_id: Option<i32>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Used for POST /api/admin/properties
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProperty {
    #[validate(length(max = 255), custom = "validate_not_blank")]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(max = 255), custom = "validate_not_blank")]
    pub location: String,
    #[validate(custom = "validate_positive_price")]
    #[schema(value_type = String, example = "12500000.00")]
    pub price: Decimal,
    pub property_type: PropertyType,
    pub status: Option<PropertyStatus>,
    #[validate(range(min = 0, max = 50))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 1))]
    pub area_sqft: Option<i32>,
    pub agent_id: Option<i32>,
    pub featured: Option<bool>,
}

/// Used for PUT /api/admin/properties/{id}; omitted fields are left unchanged,
/// `null` clears a nullable column
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProperty {
    #[validate(length(max = 255), custom = "validate_not_blank")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub description: Option<Option<String>>,
    #[validate(length(max = 255), custom = "validate_not_blank")]
    pub location: Option<String>,
    #[validate(custom = "validate_positive_price")]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub property_type: Option<PropertyType>,
    pub status: Option<PropertyStatus>,
    #[validate(range(min = 0, max = 50))]
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>, nullable)]
    pub bedrooms: Option<Option<i32>>,
    #[validate(range(min = 1))]
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>, nullable)]
    pub area_sqft: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>, nullable)]
    pub agent_id: Option<Option<i32>>,
    pub featured: Option<bool>,
}

/// Sales agent shown on listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Agent {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub designation: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAgent {
    #[validate(length(max = 255), custom = "validate_not_blank")]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom = "validate_phone")]
    pub phone: String,
    #[validate(length(max = 255))]
    pub designation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAgent {
    #[validate(length(max = 255), custom = "validate_not_blank")]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub designation: Option<Option<String>>,
}

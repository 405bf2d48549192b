// Admin panel endpoints
// Every route here sits behind the role gate; see `create_router` for the role sets

pub mod agents;
pub mod amenities;
pub mod properties;
pub mod users;

use crate::error::ApiError;

/// Error for a partial update whose body named no columns
pub(crate) fn nothing_to_update() -> ApiError {
    ApiError::BadRequest("No fields to update".to_string())
}

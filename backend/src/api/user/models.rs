//! Request payloads for the authenticated user endpoints.

use crate::utils::validation::{string_or_number, validate_bvn, validate_phone_number};
use serde::Deserialize;
use validator::Validate;

/// `PATCH /user/update` body. Both values may arrive as strings or numbers.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDetailsRequest {
    #[serde(rename = "BVN", default, deserialize_with = "string_or_number")]
    #[validate(custom(function = "validate_bvn"))]
    pub bvn: Option<String>,

    #[serde(rename = "phoneNumber", default, deserialize_with = "string_or_number")]
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: Option<String>,
}

/// `PATCH /user/update/health_plan` body
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HealthPlanRequest {
    #[serde(default)]
    #[validate(length(
        min = 2,
        max = 100,
        message = "Health plan should have between 2 and 100 characters"
    ))]
    pub health_plan: String,
}

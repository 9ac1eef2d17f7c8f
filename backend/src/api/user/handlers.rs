//! Handler functions for user profile and management API endpoints.
//!
//! Every handler here runs behind `authenticate`, so the caller's claims are
//! already in the request extensions.

use super::models::{HealthPlanRequest, UpdateDetailsRequest};
use crate::api::common::{ApiError, ApiResponse, json_body, service_error_to_http};
use crate::app::AppState;
use crate::database::models::AccountProfile;
use crate::services::user_service::UserService;
use crate::utils::jwt::Claims;
use axum::extract::{Extension, Json, rejection::JsonRejection};

/// Stores BVN and phone number for the caller.
#[axum::debug_handler]
pub async fn update_details(
    Extension(state): Extension<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<UpdateDetailsRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let request = json_body(payload)?;

    UserService::new(state.accounts.as_ref())
        .update_details(&claims, request)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::message("User details updated successfully")))
}

/// Records the caller's health plan.
#[axum::debug_handler]
pub async fn choose_health_plan(
    Extension(state): Extension<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<HealthPlanRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let request = json_body(payload)?;

    UserService::new(state.accounts.as_ref())
        .choose_health_plan(&claims, request)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::message("Health plan added successfully")))
}

/// Deletes the caller's account.
#[axum::debug_handler]
pub async fn delete_account(
    Extension(state): Extension<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    UserService::new(state.accounts.as_ref())
        .delete_account(&claims)
        .await
        .map_err(service_error_to_http)?;

    tracing::info!("Account {} removed itself", claims.sub);
    Ok(Json(ApiResponse::message("Account deleted successfully")))
}

/// Lists every account. Administrators only.
#[axum::debug_handler]
pub async fn list_users(
    Extension(state): Extension<AppState>,
) -> Result<Json<ApiResponse<Vec<AccountProfile>>>, ApiError> {
    let users = UserService::new(state.accounts.as_ref())
        .list_accounts()
        .await
        .map_err(service_error_to_http)?;

    let count = users.len();
    Ok(Json(
        ApiResponse::success(users, "All users retrieved successfully").with_count(count),
    ))
}

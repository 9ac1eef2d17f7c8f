//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for sign-up, email
//! verification and login, unwrap the request data and delegate to
//! `auth::service` for the core business logic.

use crate::api::common::{ApiError, ApiResponse, json_body, path_param, service_error_to_http};
use crate::app::AppState;
use crate::auth::models::*;
use crate::auth::service::{AuthOutcome, AuthService};
use crate::database::models::AccountProfile;
use axum::{
    extract::{
        Extension, Json, Path,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

fn auth_response(outcome: AuthOutcome, message: &str) -> ApiResponse<AuthData> {
    let user = AccountProfile::from(&outcome.account);
    ApiResponse::success(AuthData { user }, message).with_token(outcome.token)
}

/// Handle user sign-up request
#[axum::debug_handler]
pub async fn signup(
    Extension(state): Extension<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AuthData>>), ApiError> {
    let request = json_body(payload)?;

    let outcome = AuthService::new(&state)
        .signup(request)
        .await
        .map_err(service_error_to_http)?;

    Ok((
        StatusCode::CREATED,
        Json(auth_response(
            outcome,
            "Account created successfully! Please check your email to verify your account.",
        )),
    ))
}

/// Handle the link sent in the verification email
#[axum::debug_handler]
pub async fn verify_mail(
    Extension(state): Extension<AppState>,
    email: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let email = path_param(email)?;

    AuthService::new(&state)
        .verify_email(&email)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::message(
        "Email verification successful! You can now login to your account.",
    )))
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(state): Extension<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AuthData>>, ApiError> {
    let request = json_body(payload)?;

    let outcome = AuthService::new(&state)
        .login(request)
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(auth_response(outcome, "Login successful")))
}

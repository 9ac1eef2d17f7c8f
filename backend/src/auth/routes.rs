//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle sign-up, login and email verification and are
//! merged into the main Axum router.

use crate::auth::handlers::*;
use axum::{
    Router,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/user/signup", post(signup))
        .route("/user/login", post(login))
        .route("/user/verify_mail/{email}", get(verify_mail))
}

//! Defines the HTTP routes for user profile and management.
//!
//! These routes provide endpoints for updating and deleting the caller's own
//! account, plus the administrator listing of all accounts.

use super::handlers::{choose_health_plan, delete_account, list_users, update_details};
use crate::auth::middleware::{admin_only, authenticate};
use axum::{
    Router, middleware,
    routing::{delete, get, patch},
};

pub fn user_router() -> Router {
    Router::new()
        .route(
            "/user/update",
            patch(update_details).layer(middleware::from_fn(authenticate)),
        )
        .route(
            "/user/update/health_plan",
            patch(choose_health_plan).layer(middleware::from_fn(authenticate)),
        )
        .route(
            "/user/delete",
            delete(delete_account).layer(middleware::from_fn(authenticate)),
        )
        // Layers run outermost-last, so `authenticate` sees the request first.
        .route(
            "/users",
            get(list_users)
                .layer(middleware::from_fn(admin_only))
                .layer(middleware::from_fn(authenticate)),
        )
}

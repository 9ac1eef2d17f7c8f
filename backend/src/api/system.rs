//! Service-level endpoints: welcome, liveness, route listing and the JSON
//! fallback for unknown paths.

use crate::api::common::{ApiError, ApiResponse, error_response};
use crate::app::AppState;
use crate::auth::middleware::optional_authenticate;
use crate::utils::jwt::Claims;
use axum::{
    Router,
    extract::{Extension, Json},
    http::{StatusCode, Uri},
    middleware,
    routing::get,
};
use serde::Serialize;

const SERVICE_NAME: &str = "Assure Health API";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// One entry of the `/api` route listing.
#[derive(Debug, Serialize)]
pub struct RouteInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub auth: &'static str,
    pub description: &'static str,
}

static ROUTES: [RouteInfo; 10] = [
    RouteInfo {
        method: "POST",
        path: "/user/signup",
        auth: "none",
        description: "Create an account",
    },
    RouteInfo {
        method: "GET",
        path: "/user/verify_mail/{email}",
        auth: "none",
        description: "Verify an email address",
    },
    RouteInfo {
        method: "POST",
        path: "/user/login",
        auth: "none",
        description: "Log in and receive a token",
    },
    RouteInfo {
        method: "PATCH",
        path: "/user/update",
        auth: "bearer",
        description: "Add BVN and phone number",
    },
    RouteInfo {
        method: "PATCH",
        path: "/user/update/health_plan",
        auth: "bearer",
        description: "Choose a health plan",
    },
    RouteInfo {
        method: "DELETE",
        path: "/user/delete",
        auth: "bearer",
        description: "Delete your account",
    },
    RouteInfo {
        method: "GET",
        path: "/users",
        auth: "bearer, Admin or Super Admin",
        description: "List all users",
    },
    RouteInfo {
        method: "GET",
        path: "/",
        auth: "none",
        description: "Welcome message",
    },
    RouteInfo {
        method: "GET",
        path: "/health",
        auth: "none",
        description: "Liveness check",
    },
    RouteInfo {
        method: "GET",
        path: "/api",
        auth: "none",
        description: "This route listing",
    },
];

#[derive(Debug, Serialize)]
pub struct Viewer {
    pub id: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct RouteListing {
    pub service: &'static str,
    pub version: &'static str,
    pub routes: &'static [RouteInfo],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer: Option<Viewer>,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub success: bool,
    pub message: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

pub fn system_router() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(
            "/api",
            get(route_listing).layer(middleware::from_fn(optional_authenticate)),
        )
}

async fn root(Extension(state): Extension<AppState>) -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": SERVICE_NAME,
            "version": VERSION,
            "environment": state.environment,
        }),
        "Welcome to the Assure Health API",
    ))
}

async fn health() -> Json<Health> {
    Json(Health {
        success: true,
        message: "Service is healthy",
        version: VERSION,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn route_listing(
    Extension(claims): Extension<Option<Claims>>,
) -> Json<ApiResponse<RouteListing>> {
    let viewer = claims.map(|claims| Viewer {
        id: claims.sub,
        email: claims.email,
        role: claims.role.to_string(),
    });

    Json(ApiResponse::success(
        RouteListing {
            service: SERVICE_NAME,
            version: VERSION,
            routes: &ROUTES,
            viewer,
        },
        "Available routes",
    ))
}

/// Fallback for paths no router matched.
pub async fn not_found(uri: Uri) -> ApiError {
    error_response(
        StatusCode::NOT_FOUND,
        format!("Route {} not found", uri.path()),
    )
}

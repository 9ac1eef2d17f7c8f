//! Application wiring: shared state and the top-level router.

use crate::api;
use crate::auth;
use crate::config::Config;
use crate::errors::ServiceResult;
use crate::middleware::{log_requests, security_headers};
use crate::repositories::account_repository::{AccountDirectory, AccountRepository};
use crate::services::email_service::{EmailService, Mailer};
use crate::utils::jwt::TokenService;
use crate::utils::password::PasswordHasher;
use axum::{Extension, Router, middleware};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Collaborators shared by every request, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountDirectory>,
    pub tokens: Arc<TokenService>,
    pub hasher: PasswordHasher,
    pub mailer: Arc<dyn Mailer>,
    pub environment: String,
}

impl AppState {
    pub fn new(
        accounts: Arc<dyn AccountDirectory>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            accounts,
            tokens,
            hasher,
            mailer,
            environment: "development".to_string(),
        }
    }

    /// Builds the production collaborators from the loaded configuration.
    pub fn from_config(config: &Config, pool: SqlitePool) -> ServiceResult<Self> {
        let accounts = Arc::new(AccountRepository::new(pool));
        let tokens = Arc::new(TokenService::new(&config.jwt_secret)?);
        let hasher = PasswordHasher::new(config.bcrypt_cost)?;
        let mailer = Arc::new(EmailService::new(config.email_config())?);

        Ok(Self {
            environment: config.environment.to_string(),
            ..Self::new(accounts, tokens, hasher, mailer)
        })
    }
}

/// Assembles every route with the shared middleware stack.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(auth::routes::auth_router())
        .merge(api::user::routes::user_router())
        .merge(api::system::system_router())
        .fallback(api::system::not_found)
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(log_requests))
        .layer(Extension(state))
}

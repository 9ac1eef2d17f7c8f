//! Module for database connection setup and common utilities.
//!
//! This module is responsible for initializing the database connection pool,
//! applying the embedded schema migrations and bootstrapping the first
//! administrator account.

use crate::config::{Config, SeedAdmin};
use crate::database::models::{CreateAccount, Role};
use crate::errors::ServiceResult;
use crate::repositories::account_repository::{AccountDirectory, DirectoryError};
use crate::utils::password::PasswordHasher;
use anyhow::Result;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::time::Duration;

pub mod models;

#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    /// Initializes the database connection pool.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(&config.database_url)
            .await?;

        Ok(Database { pool })
    }

    /// Opens a private in-memory database.
    ///
    /// Every SQLite in-memory connection is its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Ok(Database { pool })
    }

    /// Applies the migrations embedded from `backend/migrations`.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection pool closed.");
    }
}

/// Ensures a verified administrator with the given credentials exists.
///
/// Returns `true` when a new account was created. An existing account with
/// the same email is left untouched, whatever its role.
pub async fn seed_admin(
    accounts: &dyn AccountDirectory,
    hasher: &PasswordHasher,
    seed: &SeedAdmin,
) -> ServiceResult<bool> {
    let email = seed.email.trim().to_lowercase();
    if accounts.find_by_email(&email).await?.is_some() {
        return Ok(false);
    }

    let password_hash = hasher.hash(&seed.password).await?;
    let admin = CreateAccount {
        email: email.clone(),
        first_name: "admin".to_string(),
        last_name: "user".to_string(),
        password_hash,
        verified: true,
        role: Role::Admin,
    };

    match accounts.create(admin).await {
        Ok(_) => {
            tracing::info!("Seeded administrator account {}", email);
            Ok(true)
        }
        // Another instance seeded it first.
        Err(DirectoryError::DuplicateEmail(_)) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

//! Central module for application-wide configuration settings.
//!
//! Configuration is read from the environment exactly once at startup and the
//! resulting [`Config`] is handed to every component that needs a secret or a
//! connection parameter. Missing secrets are a startup failure, never a
//! request-time one.

use anyhow::{Context, Result, bail};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Lowest bcrypt work factor accepted from configuration.
pub const MIN_BCRYPT_COST: u32 = 10;

/// Work factor used when `BCRYPT_COST` is not set.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Deployment environment selected by `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("Invalid environment: {}", other)),
        }
    }
}

/// Settings for the outbound email provider.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_key: String,
    pub sender_email: String,
    pub sender_name: String,
    /// Host prefix for links embedded in emails.
    pub base_url: String,
    /// Provider-side sandbox: mail is accepted but never delivered.
    pub sandbox: bool,
}

/// Credentials for the administrator created at startup.
#[derive(Clone)]
pub struct SeedAdmin {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
    pub server_port: u16,
    pub environment: Environment,
    pub base_url: String,
    pub sendgrid_api_key: String,
    pub sendgrid_email: String,
    pub seed_admin: Option<SeedAdmin>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            let value = lookup(key).with_context(|| format!("{} not set", key))?;
            if value.trim().is_empty() {
                bail!("{} must not be empty", key);
            }
            Ok(value)
        };

        let jwt_secret = required("JWT_SECRET")?;
        let sendgrid_api_key = required("SENDGRID_API_KEY")?;
        let sendgrid_email = required("SENDGRID_EMAIL")?;
        let database_url = required("DATABASE_URL")?;

        let environment = lookup("APP_ENV")
            .unwrap_or_else(|| "development".to_string())
            .parse::<Environment>()
            .map_err(anyhow::Error::msg)
            .context("APP_ENV must be one of development, test, production")?;

        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = lookup("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let bcrypt_cost = lookup("BCRYPT_COST")
            .map(|raw| raw.parse::<u32>())
            .transpose()
            .context("BCRYPT_COST must be a valid number")?
            .unwrap_or(DEFAULT_BCRYPT_COST);
        if bcrypt_cost < MIN_BCRYPT_COST {
            bail!("BCRYPT_COST must be at least {}", MIN_BCRYPT_COST);
        }

        let server_port = lookup("SERVER_PORT")
            .unwrap_or_else(|| "4000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        let base_url = lookup("APP_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://localhost:{}", server_port));

        let seed_admin = match (lookup("SEED_ADMIN_EMAIL"), lookup("SEED_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(SeedAdmin { email, password }),
            (None, None) => None,
            _ => bail!("SEED_ADMIN_EMAIL and SEED_ADMIN_PASSWORD must be set together"),
        };

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            jwt_secret,
            bcrypt_cost,
            server_port,
            environment,
            base_url,
            sendgrid_api_key,
            sendgrid_email,
            seed_admin,
        })
    }

    /// Email settings derived from the loaded configuration.
    pub fn email_config(&self) -> EmailConfig {
        EmailConfig {
            api_key: self.sendgrid_api_key.clone(),
            sender_email: self.sendgrid_email.clone(),
            sender_name: "Assure Health".to_string(),
            base_url: self.base_url.clone(),
            sandbox: !self.environment.is_production(),
        }
    }
}

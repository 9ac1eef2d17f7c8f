//! Core business logic for the authentication system.

use crate::app::AppState;
use crate::auth::models::*;
use crate::database::models::{Account, CreateAccount, Role};
use crate::errors::{ServiceError, ServiceResult};
use crate::utils::validation::validate_request;
use validator::ValidateEmail;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// An account together with the session token just issued for it.
#[derive(Debug)]
pub struct AuthOutcome {
    pub token: String,
    pub account: Account,
}

/// Authentication service for sign-up, email verification and login
pub struct AuthService<'a> {
    state: &'a AppState,
}

impl<'a> AuthService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Registers a new, unverified account and sends the verification email.
    pub async fn signup(&self, request: SignupRequest) -> ServiceResult<AuthOutcome> {
        let request = request.normalized();
        validate_request(&request)?;

        // Advisory only; the unique index decides under concurrent sign-ups.
        if self
            .state
            .accounts
            .find_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(ServiceError::already_exists(
                "An account with this email already exists. Please login or use a different email.",
            ));
        }

        let password_hash = self.state.hasher.hash(&request.password).await?;

        let account = self
            .state
            .accounts
            .create(CreateAccount {
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                password_hash,
                verified: false,
                role: Role::User,
            })
            .await?;

        tracing::info!("Created account {}", account.id);

        if let Err(e) = self
            .state
            .mailer
            .send_verification_email(&account.email, &account.first_name)
            .await
        {
            tracing::warn!(
                "Verification email to account {} was not sent: {}",
                account.id,
                e
            );
        }

        let token = self.state.tokens.issue(&account)?;
        Ok(AuthOutcome { token, account })
    }

    /// Marks the account with this email as verified.
    pub async fn verify_email(&self, email: &str) -> ServiceResult<()> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(ServiceError::validation("Email parameter is required"));
        }
        if !email.validate_email() {
            return Err(ServiceError::validation("Invalid email format"));
        }

        if self.state.accounts.set_verified(&email).await? == 0 {
            return Err(ServiceError::not_found(
                "User not found or already verified",
            ));
        }

        tracing::info!("Verified email {}", email);
        Ok(())
    }

    /// Checks the credentials of a verified account and issues a session token.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthOutcome> {
        let email = request.email.trim().to_lowercase();
        let request = LoginRequest { email, ..request };
        validate_request(&request)?;

        let account = self
            .state
            .accounts
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| ServiceError::not_found(INVALID_CREDENTIALS))?;

        if !self
            .state
            .hasher
            .verify(&request.password, &account.password_hash)
            .await
        {
            return Err(ServiceError::not_found(INVALID_CREDENTIALS));
        }

        if !account.verified {
            return Err(ServiceError::unauthorized(
                "Please verify your email address before logging in",
            ));
        }

        let token = self.state.tokens.issue(&account)?;
        tracing::info!("Account {} logged in", account.id);

        Ok(AuthOutcome { token, account })
    }
}

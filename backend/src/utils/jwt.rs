//! JWT token utilities for authentication and authorization.
//!
//! Provides signed, time-limited bearer tokens carrying the account identity
//! and role. Tokens are stateless: nothing is stored server side, so a token
//! stays valid until it expires even if the account behind it is deleted.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::models::{Account, Role};
use crate::errors::{ServiceError, ServiceResult};

/// Why a presented token was refused.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Session expired. Please login again.")]
    Expired,
    /// Bad signature (including a rotated secret), bad encoding or wrong purpose.
    #[error("Invalid token format.")]
    Malformed,
    #[error("Token not yet valid.")]
    NotYetValid,
}

/// What a token may be used for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    #[default]
    Session,
    PasswordReset,
}

impl TokenKind {
    pub fn ttl(&self) -> Duration {
        match self {
            TokenKind::Session => Duration::days(1),
            TokenKind::PasswordReset => Duration::hours(1),
        }
    }
}

/// JWT Claims structure containing the account identity
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Account ID
    pub sub: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub kind: TokenKind,
    /// Token issued at timestamp
    pub iat: i64,
    pub nbf: i64,
    /// Token expiration timestamp
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Issues and verifies HS256 tokens with a single process-wide secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> ServiceResult<Self> {
        if secret.is_empty() {
            return Err(ServiceError::internal_error("JWT secret must not be empty"));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Ok(TokenService {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Issues a one-day session token for the account.
    pub fn issue(&self, account: &Account) -> ServiceResult<String> {
        self.issue_at(account, TokenKind::Session, Utc::now())
    }

    /// Issues a one-hour password reset token for the account.
    pub fn issue_password_reset(&self, account: &Account) -> ServiceResult<String> {
        self.issue_at(account, TokenKind::PasswordReset, Utc::now())
    }

    /// Issues a token as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        account: &Account,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
    ) -> ServiceResult<String> {
        let claims = Claims {
            sub: account.id.clone(),
            email: account.email.clone(),
            role: account.role,
            kind,
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: (issued_at + kind.ttl()).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }

    /// Validate and decode a JWT token
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::ImmatureSignature => TokenError::NotYetValid,
                _ => TokenError::Malformed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(role: Role) -> Account {
        let now = Utc::now();
        Account {
            id: "0b7f5a3e-0000-4000-8000-000000000001".to_string(),
            email: "a@b.com".to_string(),
            first_name: "a".to_string(),
            last_name: "b".to_string(),
            password_hash: "hash".to_string(),
            verified: true,
            phone_number: None,
            bvn: None,
            health_plan: None,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(TokenService::new("").is_err());
    }

    #[test]
    fn test_issue_then_verify() {
        let service = TokenService::new("test-secret").unwrap();
        let token = service.issue(&account(Role::Admin)).unwrap();

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.kind, TokenKind::Session);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
        assert!(claims.is_admin());
    }

    #[test]
    fn test_password_reset_lifetime() {
        let service = TokenService::new("test-secret").unwrap();
        let token = service.issue_password_reset(&account(Role::User)).unwrap();

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.kind, TokenKind::PasswordReset);
        assert_eq!(claims.exp - claims.iat, 60 * 60);
    }

    #[test]
    fn test_expired_after_one_day() {
        let service = TokenService::new("test-secret").unwrap();
        let two_days_ago = Utc::now() - Duration::days(2);
        let token = service
            .issue_at(&account(Role::User), TokenKind::Session, two_days_ago)
            .unwrap();

        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_expired_seconds_after_one_day() {
        let service = TokenService::new("test-secret").unwrap();
        let just_over_a_day = Utc::now() - Duration::days(1) - Duration::seconds(5);
        let token = service
            .issue_at(&account(Role::User), TokenKind::Session, just_over_a_day)
            .unwrap();

        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_not_yet_valid() {
        let service = TokenService::new("test-secret").unwrap();
        let later = Utc::now() + Duration::hours(2);
        let token = service
            .issue_at(&account(Role::User), TokenKind::Session, later)
            .unwrap();

        assert_eq!(service.verify(&token), Err(TokenError::NotYetValid));
    }

    #[test]
    fn test_rotated_secret_looks_tampered() {
        let old = TokenService::new("old-secret").unwrap();
        let new = TokenService::new("new-secret").unwrap();
        let token = old.issue(&account(Role::User)).unwrap();

        assert_eq!(new.verify(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let service = TokenService::new("test-secret").unwrap();
        assert_eq!(service.verify("not-a-jwt"), Err(TokenError::Malformed));

        let token = service.issue(&account(Role::User)).unwrap();
        let tampered = format!("{}x", token);
        assert_eq!(service.verify(&tampered), Err(TokenError::Malformed));
    }
}

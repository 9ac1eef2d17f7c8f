//! Data structures for authentication-related entities.
//!
//! This module defines the sign-up and login payloads and the data returned
//! alongside a freshly issued token.

use crate::database::models::AccountProfile;
use crate::utils::validation::{validate_email_tld, validate_password_strength};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Sign-up request payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(
        email(message = "Please enter a valid email address"),
        length(max = 255, message = "Email too long"),
        custom(function = "validate_email_tld")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 50,
        message = "First name should have between 1 and 50 characters"
    ))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 50,
        message = "Last name should have between 1 and 50 characters"
    ))]
    pub last_name: String,

    #[serde(default)]
    #[validate(
        length(
            min = 8,
            max = 128,
            message = "Password should have between 8 and 128 characters"
        ),
        custom(function = "validate_password_strength")
    )]
    pub password: String,

    #[serde(default)]
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

impl SignupRequest {
    /// Trims and lower-cases the email and both names.
    pub fn normalized(self) -> Self {
        Self {
            email: self.email.trim().to_lowercase(),
            first_name: self.first_name.trim().to_lowercase(),
            last_name: self.last_name.trim().to_lowercase(),
            ..self
        }
    }
}

/// Login request payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Payload returned by sign-up and login next to the token
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthData {
    pub user: AccountProfile,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::validation_message;

    fn signup(password: &str, confirm: &str) -> SignupRequest {
        SignupRequest {
            email: "a@b.com".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_valid_signup() {
        assert!(signup("Secur3!aa", "Secur3!aa").validate().is_ok());
    }

    #[test]
    fn test_mismatched_confirmation() {
        let errors = signup("Secur3!aa", "Secur3!ab").validate().unwrap_err();
        assert!(validation_message(&errors).contains("Passwords do not match"));
    }

    #[test]
    fn test_weak_password_reports_all_problems() {
        let errors = signup("123", "123").validate().unwrap_err();
        let message = validation_message(&errors);
        assert!(message.contains("between 8 and 128"));
        assert!(message.contains("one uppercase letter"));
    }

    #[test]
    fn test_missing_fields_rejected() {
        let request: SignupRequest = serde_json::from_str(r#"{"email": "a@b.com"}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_normalized_lowercases_and_trims() {
        let mut request = signup("Secur3!aa", "Secur3!aa");
        request.email = "  Mixed@Case.COM ".to_string();
        request.first_name = " Ada ".to_string();
        let request = request.normalized();
        assert_eq!(request.email, "mixed@case.com");
        assert_eq!(request.first_name, "ada");
        assert_eq!(request.last_name, "b");
    }

    #[test]
    fn test_camel_case_fields() {
        let request: SignupRequest = serde_json::from_str(
            r#"{"email":"a@b.com","firstName":"A","lastName":"B","password":"Secur3!aa","confirmPassword":"Secur3!aa"}"#,
        )
        .unwrap();
        assert_eq!(request.first_name, "A");
        assert_eq!(request.confirm_password, "Secur3!aa");
    }

    #[test]
    fn test_login_requires_email_and_password() {
        let request = LoginRequest {
            email: "not-an-email".to_string(),
            password: String::new(),
        };
        let message = validation_message(&request.validate().unwrap_err());
        assert!(message.contains("valid email"));
        assert!(message.contains("Password is required"));
    }
}

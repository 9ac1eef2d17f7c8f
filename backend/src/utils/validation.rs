//! Custom validation rules and helpers shared by the request models.

use crate::errors::{ServiceError, ServiceResult};
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError, ValidationErrors};

/// Top-level domains accepted for new sign-ups.
pub const ALLOWED_TLDS: [&str; 9] = ["com", "net", "org", "edu", "gov", "co", "uk", "ng", "io"];

/// Symbols that satisfy the special-character rule.
pub const PASSWORD_SYMBOLS: &str = "@$!%*?&";

/// Runs `validate()` and flattens all field errors into one message.
pub fn validate_request<T: Validate>(request: &T) -> ServiceResult<()> {
    request
        .validate()
        .map_err(|errors| ServiceError::validation(validation_message(&errors)))
}

/// Joins every distinct field error message, ordered by field name.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut messages: Vec<String> = Vec::new();
    for (field, field_errors) in fields {
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| format!("{}: Invalid value", field));
            if !messages.contains(&message) {
                messages.push(message);
            }
        }
    }
    messages.join(", ")
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Requires lower, upper, digit and symbol characters, and nothing else.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c));
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));

    if allowed && has_lower && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        Err(invalid(
            "password_strength",
            "Password must contain at least one uppercase letter, one lowercase letter, one number, and one special character",
        ))
    }
}

pub fn validate_email_tld(email: &str) -> Result<(), ValidationError> {
    let domain = email.rsplit_once('@').map(|(_, domain)| domain).unwrap_or("");
    let labels: Vec<&str> = domain.split('.').collect();

    let tld_allowed = labels.len() >= 2
        && labels
            .last()
            .is_some_and(|tld| ALLOWED_TLDS.contains(&tld.to_ascii_lowercase().as_str()));

    if tld_allowed {
        Ok(())
    } else {
        Err(invalid("email_tld", "Please enter a valid email address"))
    }
}

/// Bank Verification Number: exactly 11 digits.
pub fn validate_bvn(bvn: &str) -> Result<(), ValidationError> {
    if bvn.len() == 11 && bvn.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(invalid("bvn", "BVN must be exactly 11 digits"))
    }
}

/// Loose E.164: optional `+`, no leading zero, 10 to 15 characters overall.
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    if !(10..=15).contains(&phone.len()) {
        return Err(invalid(
            "phone_length",
            "Phone number must be between 10 and 15 digits",
        ));
    }

    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let well_formed = (2..=15).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0');

    if well_formed {
        Ok(())
    } else {
        Err(invalid("phone_format", "Please enter a valid phone number"))
    }
}

/// Accepts a JSON string or integer and keeps it as text.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => Some(text.trim().to_string()).filter(|text| !text.is_empty()),
        Some(Raw::Unsigned(number)) => Some(number.to_string()),
        Some(Raw::Signed(number)) => Some(number.to_string()),
        None => None,
    })
}
